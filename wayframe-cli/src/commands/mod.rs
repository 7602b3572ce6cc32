//! CLI command implementations.

pub mod common;
pub mod config;
pub mod explore;
pub mod route;
