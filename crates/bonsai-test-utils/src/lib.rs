//! Shared test utilities for the bonsai-cli workspace.
//!
//! This crate provides standardised project fixtures and an in-process fake
//! BRAIN server so that crate test suites do not each reinvent temp-directory
//! and HTTP setup. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for a Bonsai project directory
//! - [`server`]: [`FakeServer`] recording HTTP server

pub mod project;
pub mod server;

pub use project::TestProject;
pub use server::{FakeServer, Recorded, Reply};
