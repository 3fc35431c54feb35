//! SmartCache command line interface
//!
//! Library target behind the `smartcache` binary: configuration, output
//! formatting, error classification and the command orchestrators.

pub mod config;
pub mod error;
pub mod orchestrators;
pub mod output;
pub mod paths;
pub mod terminal;
