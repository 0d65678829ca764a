//! Crossing status classification.
//!
//! A pure function from (train events, reference instant) to an estimated
//! crossing state. No I/O, no clock reads, no state kept between calls.

mod calculate;
mod config;

pub use calculate::{
    CrossingState, CrossingStatus, MESSAGE_CLOSED, MESSAGE_NO_TRAIN, MESSAGE_OPEN,
    MESSAGE_WARNING, NextTrainInfo, StatusCalculator,
};
pub use config::{InvalidWindows, WindowConfig};
