//! depreview GitHub - GitHub integration for depreview
//!
//! This crate provides the octocrab-backed client used to request reviewers
//! on a pull request.

mod client;
mod error;
mod review;

pub use client::GitHubClient;
pub use error::{Error, Result};
