//! Adapter utilities for the `infinite-grid` crate.
//!
//! The `infinite-grid` crate is UI-agnostic and focuses on the core math and state. This crate
//! provides the framework-neutral pieces a view-system binding needs on top of it:
//!
//! - A [`Controller`] that turns layout passes, scroll ticks and drag/focus callbacks into
//!   engine operations
//! - Exclusive message forwarding between the controller and the host's own data source and
//!   delegate ([`ForwardingProxy`])
//! - Tween-based scrolling, used for `move_to` and for selections that continue across the
//!   loop boundary (adapter-driven)
//!
//! This crate is intentionally framework-agnostic (no toolkit bindings).
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod controller;
mod host;
mod options;
mod proxy;
mod tween;


pub use controller::{Controller, ScrollAlignment, Selection, SelectionOutcome};
pub use host::{CellRequest, DataSource, Delegate};
pub use options::{ControllerOptions, OnCenteredIndexChange};
pub use proxy::{
    DataSourceSelector, DelegateSelector, ForwardingProxy, Responder, Route, Selector,
};
pub use tween::{Easing, Tween};
