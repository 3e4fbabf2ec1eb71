//! Storage infrastructure: the optional TOML configuration file.
//!
//! Only settings about the utility itself live here.  The saved acceleration
//! configuration is deliberately kept in memory.

pub mod config;
