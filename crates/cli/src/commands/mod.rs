//! CLI Commands

pub mod inject;
pub mod list;
pub mod restore;
pub mod status;
