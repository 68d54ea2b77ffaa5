//! # nodelink core
//!
//! The discovery engine: an HTTP [`network::http::Prober`] and the
//! [`scanner::Scanner`] that sweeps a /24 with it.

pub mod network;
pub mod scanner;
