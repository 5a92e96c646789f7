//! Logging infrastructure for structured console and file output.

mod logger;
mod memory;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use memory::MemoryLog;
pub use subscriber::init_subscriber;
pub use types::{Level, Log, LogOptions};
