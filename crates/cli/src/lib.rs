//! bugswap CLI
//!
//! Command-line interface for injecting catalogued visual bugs into a
//! working tree and restoring it.

pub mod commands;
pub mod output;
