//! citriage-cli library: flows and argument types, exposed for unit tests.

pub mod app;
pub mod commands;
pub mod flow;
