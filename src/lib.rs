// src/lib.rs

//! setup-opentap
//!
//! A CI setup step that installs OpenTAP on the runner:
//!
//! - Resolves the platform and architecture and downloads the matching
//!   archive from the package index
//! - Unpacks it into a fixed per-platform directory
//! - Writes the tool's authentication and package repository settings
//! - Installs requested packages through an image manifest
//! - Reports the installed package list
//!
//! The library holds each step; the binary runs them in order.

pub mod actions;
pub mod cli;
mod error;
pub mod extract;
pub mod image;
pub mod install;
pub mod plan;
pub mod platform;
pub mod repository;
pub mod settings;
pub mod tap;
pub mod version;

pub use error::{Error, Result};
pub use image::{ImageManifest, PackageRef};
pub use plan::{Host, SetupPlan};
pub use platform::{Platform, Target};
pub use repository::Repository;
