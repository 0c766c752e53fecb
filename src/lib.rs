// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod collect;
pub mod config;
pub mod csv;
pub mod error;
pub mod extract;
pub mod file;
pub mod progress;
pub mod report;
pub mod runner;
pub mod sanitize;
pub mod stats;
