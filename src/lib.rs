//! # audamo library
//!
//! Internal library for the audamo binary, split out so the decision pipeline
//! can be tested end to end.
//!
//! ## Architecture
//!
//! - **Decision**: `decision` picks LIGHT or DARK from overrides, configuration
//!   and, when needed, the sun's position
//! - **Geographic**: `geo` resolves the location and computes sunrise/sunset
//! - **Applying**: `applier` drives an appearance `backend`, runs the custom
//!   script and records the result in the `state` marker
//! - **Daemon**: `daemon` re-evaluates periodically and on `signals`
//! - **Configuration**: `config` loads and validates the TOML file
//! - **Infrastructure**: logging, errors, constants, installed `assets`

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod applier;
pub mod args;
pub mod assets;
pub mod backend;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod decision;
pub mod error;
pub mod geo;
pub mod signals;
pub mod state;
pub mod time_source;

pub use decision::{Overrides, Theme};
pub use error::{Error, Result};
