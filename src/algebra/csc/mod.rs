mod core;
pub use self::core::*;
mod pattern;
pub use pattern::*;
mod matrix_math;
pub use matrix_math::*;
