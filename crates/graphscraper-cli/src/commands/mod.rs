//! CLI commands

pub mod demo;
pub mod neighbors;
pub mod spotify;
pub mod store;
