//! Level crossing status server.
//!
//! Estimates whether a railway level crossing is open or closed from the
//! realtime boards of the stations on either side of it.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod feed;
pub mod status;
pub mod web;

#[cfg(test)]
mod test_support;
