//! Storage infrastructure: configuration file loading.
//!
//! PiScan persists nothing.  The only thing it reads from disk is an optional
//! JSON or TOML config file; `config` owns the schema and the fallback rules.

pub mod config;
