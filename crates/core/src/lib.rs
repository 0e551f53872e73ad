//! Ecom Market Core - Shared types library.
//!
//! This crate provides common types used across all Ecom Market client
//! components:
//! - `storefront` - Typed client and state synchronization for the store API
//! - `cli` - Command-line tools exercising the storefront client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
