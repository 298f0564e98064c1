//! Configuration management for crd2jsonschema

pub mod config;


pub use config::Config;
