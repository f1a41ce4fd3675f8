//! Command implementations for the sfconv CLI.

pub mod convert;
pub mod json_output;
