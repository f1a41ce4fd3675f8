//! sfconv CLI library.
//!
//! Argument handling lives in the binary; this crate holds the command
//! implementations so they can be driven from tests.

pub mod commands;
pub mod filetype;
pub mod logging;
