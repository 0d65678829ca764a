//! Domain types for the crossing status service.
//!
//! Train events as read from station feeds, station codes, and the
//! wall-clock arithmetic used to place events relative to "now".

mod event;
mod station;
mod time;

pub use event::{Delay, EventKind, TrainEvent, UNKNOWN_TIME};
pub use station::{InvalidStationId, StationId};
pub use time::{
    MINUTES_PER_DAY, expected_minutes_of_day, extract_time, minutes_of_day_in,
    parse_delay_minutes, parse_minutes_of_day,
};
