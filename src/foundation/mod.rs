pub mod core;
pub mod ease;
pub mod error;
pub mod math;
