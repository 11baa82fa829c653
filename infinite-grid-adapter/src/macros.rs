#[cfg(feature = "tracing")]
macro_rules! itrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "infinite_grid_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! itrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! idebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "infinite_grid_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! idebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! iwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "infinite_grid_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! iwarn {
    ($($tt:tt)*) => {};
}
