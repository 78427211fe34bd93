//! CLI command handlers

pub mod ask;
pub mod feedback;
pub mod init;
pub mod recent;
pub mod stats;
