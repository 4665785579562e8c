//! Error types for the cronhook protocol layer.

mod scheduler;
mod store;
mod timer;
mod transport;

pub use scheduler::*;
pub use store::*;
pub use timer::*;
pub use transport::*;
