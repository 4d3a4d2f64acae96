//! Command line tool to list git branches annotated with user-defined properties.

pub mod branch;
pub mod commit_time;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod print;
pub mod repo;
pub mod settings;
