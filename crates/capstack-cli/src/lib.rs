// Library root for the capstack binary: settings, flags and report output,
// exposed so integration tests can drive them.

pub mod args;
pub mod config;
pub mod report;
