//! Command implementations

mod compare;

pub use compare::{cmd_compare, CompareArgs};
