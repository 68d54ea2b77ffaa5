//! Logging macros used across the workspace.
//!
//! They forward to `tracing`; the CLI formatter picks the prefix symbol from
//! the level and renders [`SUCCESS_TARGET`] events as successes.

/// Target used by [`success!`](crate::success) events.
pub const SUCCESS_TARGET: &str = "nodelink::success";

/// Target used for raw, unprefixed terminal output.
pub const PRINT_TARGET: &str = "nodelink::print";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "nodelink::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}
