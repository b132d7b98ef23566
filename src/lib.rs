pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod log_store;
pub mod model;
pub mod progress;
pub mod relocate;
pub mod scanner;
pub mod scheduler;

pub use config::AppConfig;
pub use engine::{CleanerEngine, RunReport};
pub use error::{Error, MoveError};
pub use model::{FileEntry, InventorySnapshot};
pub use progress::{RunReporter, SilentReporter};
pub use scheduler::Scheduler;
