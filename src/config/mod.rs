//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, IrcConfig, SlackConfig)
//! - [`validation`]: startup checks that collect every problem at once
//! - [`sample`]: the annotated sample written by `--sample-config`

mod defaults;
mod sample;
mod types;
mod validation;

pub use sample::SAMPLE_CONFIG;
pub use types::{Config, ConfigError, IrcConfig, SlackConfig};
pub use validation::{ValidationError, validate};
