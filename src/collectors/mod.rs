//! Readers and parsers for each data source

pub mod cpu;
pub mod frequency;
pub mod memory;
pub mod system;
