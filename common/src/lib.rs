//! # nodelink common
//!
//! Types shared by the scanner engine and the command-line front end.
//!
//! * **[`network`]**: scan ranges, discovered devices and LAN detection.
//! * **[`config`]**: scan tuning knobs and presentation options.
//! * **[`error`]**: the error taxonomy surfaced by the engine.
//! * **[`log`]**: thin logging macros over `tracing`.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing;
