//! Operator commands that run outside the server loop.

pub mod doctor;
pub mod tools;

pub use doctor::doctor;
pub use tools::print_tools;
