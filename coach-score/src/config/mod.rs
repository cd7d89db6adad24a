//! Configuration module for the Coach Score service.
//! Reads settings from the environment and wires the service's dependencies.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{Config, LogFormat};
