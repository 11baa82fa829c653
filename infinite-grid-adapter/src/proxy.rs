//! Exclusive message routing between the controller and the host.
//!
//! A [`ForwardingProxy`] holds an ordered responder list for one protocol role: the core
//! controller always sits first, the host's implementation (if installed) second. Each message
//! selector is statically either *core-reserved* or *host-forwarded*:
//!
//! - reserved messages are answered by the core only, even when the host implements them too
//!   (the core may still call into the host from its own handler),
//! - every other message goes to the host, or nowhere when no host is installed.
//!
//! Exactly one responder is consulted per message.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

/// A message of one protocol role.
pub trait Selector: Copy + fmt::Debug {
    /// Whether only the core may answer this message.
    fn is_core_reserved(self) -> bool;
}

/// Messages of the count-provider role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataSourceSelector {
    NumberOfSections,
    NumberOfItems,
    ConfigureCell,
    ConfigureSupplementary,
}

impl Selector for DataSourceSelector {
    fn is_core_reserved(self) -> bool {
        match self {
            Self::NumberOfSections | Self::NumberOfItems => true,
            Self::ConfigureCell | Self::ConfigureSupplementary => false,
        }
    }
}

/// Messages of the event-receiver role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DelegateSelector {
    DidScroll,
    WillBeginDragging,
    WillEndDragging,
    DidEndDragging,
    DidEndDecelerating,
    DidUpdateFocus,
    PreferredFocusIndexPath,
    DidSelectItem,
    WillDisplay,
}

impl Selector for DelegateSelector {
    fn is_core_reserved(self) -> bool {
        match self {
            Self::DidScroll
            | Self::WillEndDragging
            | Self::DidUpdateFocus
            | Self::PreferredFocusIndexPath => true,
            Self::WillBeginDragging
            | Self::DidEndDragging
            | Self::DidEndDecelerating
            | Self::DidSelectItem
            | Self::WillDisplay => false,
        }
    }
}

/// One entry of a responder list.
pub enum Responder<H: ?Sized> {
    Core,
    Host(Box<H>),
}

impl<H: ?Sized> fmt::Debug for Responder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => f.write_str("Core"),
            Self::Host(_) => f.write_str("Host"),
        }
    }
}

/// Who answers a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Core,
    Host,
    /// Host-forwarded message with no host installed.
    Unhandled,
}

pub struct ForwardingProxy<S, H: ?Sized> {
    responders: Vec<Responder<H>>,
    _selector: PhantomData<fn(S)>,
}

impl<S: Selector, H: ?Sized> Default for ForwardingProxy<S, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Selector, H: ?Sized> ForwardingProxy<S, H> {
    pub fn new() -> Self {
        Self {
            responders: vec![Responder::Core],
            _selector: PhantomData,
        }
    }

    pub fn responders(&self) -> &[Responder<H>] {
        &self.responders
    }

    /// Installs (or removes, with `None`) the host implementation.
    ///
    /// The previous host is detached before the new one is attached and handed back.
    pub fn set_host(&mut self, host: Option<Box<H>>) -> Option<Box<H>> {
        let slot = self
            .responders
            .iter()
            .position(|r| matches!(r, Responder::Host(_)));
        let previous = slot.and_then(|i| match self.responders.remove(i) {
            Responder::Host(previous) => Some(previous),
            Responder::Core => None,
        });
        if let Some(host) = host {
            self.responders.push(Responder::Host(host));
        }
        itrace!(
            replaced = previous.is_some(),
            installed = self.has_host(),
            "ForwardingProxy::set_host"
        );
        previous
    }

    pub fn has_host(&self) -> bool {
        self.host().is_some()
    }

    pub fn host(&self) -> Option<&H> {
        self.responders.iter().find_map(|r| match r {
            Responder::Host(host) => Some(host.as_ref()),
            Responder::Core => None,
        })
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.responders.iter_mut().find_map(|r| match r {
            Responder::Host(host) => Some(host.as_mut()),
            Responder::Core => None,
        })
    }

    pub fn route(&self, selector: S) -> Route {
        if selector.is_core_reserved() {
            Route::Core
        } else if self.has_host() {
            Route::Host
        } else {
            Route::Unhandled
        }
    }

    /// Delivers `selector` to exactly one responder.
    ///
    /// `on_core` runs for reserved messages and also receives the host, so the core can chain
    /// to it. `on_host` runs for forwarded messages. Returns `None` when nobody answered.
    pub fn dispatch<C: ?Sized, R>(
        &mut self,
        selector: S,
        core: &mut C,
        on_core: impl FnOnce(&mut C, Option<&mut H>) -> R,
        on_host: impl FnOnce(&mut H) -> R,
    ) -> Option<R> {
        match self.route(selector) {
            Route::Core => Some(on_core(core, self.host_mut())),
            Route::Host => self.host_mut().map(on_host),
            Route::Unhandled => {
                itrace!(?selector, "dispatch: no responder");
                None
            }
        }
    }

    /// Delivers a host-forwarded message. Reserved selectors are never forwarded.
    pub fn forward<R>(&mut self, selector: S, on_host: impl FnOnce(&mut H) -> R) -> Option<R> {
        match self.route(selector) {
            Route::Host => self.host_mut().map(on_host),
            Route::Core | Route::Unhandled => None,
        }
    }
}

impl<S, H: ?Sized> fmt::Debug for ForwardingProxy<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardingProxy")
            .field("responders", &self.responders)
            .finish()
    }
}
