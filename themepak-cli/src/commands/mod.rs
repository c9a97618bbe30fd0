//! CLI command implementations.

pub mod apply;
pub mod backup;
pub mod common;
pub mod config;
pub mod deconstruct;
pub mod export;
pub mod extract;
pub mod import;
pub mod info;
pub mod init;
pub mod list;
pub mod remove;
pub mod status;
