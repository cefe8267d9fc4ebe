//! Named wall-clock timers for the setup and solve phases.

mod timers;
pub use timers::*;
