//! Library crate root re-exporting the runner, task, and config modules.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod aws;
pub mod cli;
pub mod config;
pub mod runner;
pub mod task;
