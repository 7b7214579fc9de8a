//! Table lifecycle
//!
//! - [`store`] - in-memory records with per-record locking
//! - [`lifecycle`] - pure transition rules and derived countdowns
//! - [`scheduler`] - fire-once timers for timed statuses
//! - [`manager`] - the public entry point tying them together

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod scheduler;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{TableError, TableResult};
pub use lifecycle::{LifecycleEvent, LifecycleTimings};
pub use manager::{ManagerOptions, TableEvent, TableManager, Trigger};
pub use scheduler::AutoAdvanceScheduler;
pub use store::{TableLayout, TableStore};
