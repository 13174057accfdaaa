pub mod log;
pub mod message;
pub mod runner;

pub use log::{CsvLog, LogError};
pub use runner::{
    AvailabilitySource, Clock, CycleReport, DelaySource, Monitor, PushSink, SystemClock,
    UniformDelay,
};
