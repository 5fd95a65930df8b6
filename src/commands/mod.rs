// src/commands/mod.rs
//! Command handlers for the setup-opentap CLI

mod setup;

pub use setup::cmd_setup;
