//! Azure Files REST module.
//!
//! This module provides:
//! - Shared Key request signing
//! - HTTP client implementing the share backend
//! - REST response types

pub mod auth;
pub mod client;
pub mod types;

pub use auth::SharedKeyCredential;
pub use client::{default_endpoint, AzureFileClient, API_VERSION};
