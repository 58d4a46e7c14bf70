//! citriage-core: log triage engine, archive access and configuration.

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod provider;
pub mod triage;
