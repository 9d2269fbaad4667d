//! Relay for window-replacement renders
//!
//! Accepts a house photo and a prompt, forwards them to an image-edit model,
//! and returns the edited images as base64. A second endpoint rewrites
//! free-form text into a windows-only edit instruction.

pub mod ai;
pub mod auth;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;
pub mod validation;

pub use error::{Error, Result};
