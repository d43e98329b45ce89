pub mod time_utils;

pub use time_utils::{Clock, ManualClock, SystemClock};
