//! Wizard state module

mod forms;
mod role;

pub use forms::*;
pub use role::*;
