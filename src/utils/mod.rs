//! Shared helpers for reading and parsing pseudo-files

pub mod command;
pub mod file;
pub mod parsing;
