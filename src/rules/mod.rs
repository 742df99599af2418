pub mod conditional;
pub mod describe;
pub mod forced;
pub mod loader;
pub mod order;
pub mod rotation;
pub mod showdown;
pub mod step;

pub use conditional::Conditional;
pub use loader::{Rules, RulesError};
