//! End-to-end tests driving the real HTTP prober against loopback responders.

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod utils;
