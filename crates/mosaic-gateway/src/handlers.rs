//! Request handlers.

pub mod agents;
pub mod health;
pub mod runs;
pub mod uploads;

pub use agents::*;
pub use health::*;
pub use runs::*;
pub use uploads::*;
