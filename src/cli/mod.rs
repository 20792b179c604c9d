//! CLI command handlers

pub mod commands;
pub mod display;

pub use commands::{convert, export, import, sheets};
