// Adapters layer: concrete implementations of the domain ports.

pub mod console;
pub mod users;

pub use console::{MemoryConsole, StdoutConsole};
pub use users::SimulatedUserDirectory;
