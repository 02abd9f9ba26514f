//! CLI subcommands.

pub mod apply;
pub mod common;
pub mod config;
pub mod inspect;
pub mod plan;
pub mod versions;
