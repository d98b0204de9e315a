//! `brent-eda` library crate.
//!
//! The binary (`brent`) is a thin wrapper around this library so that:
//!
//! - every pipeline stage is testable without spawning processes
//! - the stages can be driven from other hosts (notebooks, schedulers)

pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod domain;
pub mod eda;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod server;
