// ABOUTME: Core types and constants for the multi-tenant administration console
// ABOUTME: Foundation crate with error handling, domain models, roles, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

#![deny(unsafe_code)]

//! # Tenant Console Core
//!
//! Foundation crate providing shared types for the tenant administration console.
//! This crate is designed to change infrequently, enabling incremental compilation
//! benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Role tokens, OAuth constants, and default routes
//! - **models**: Tenants, cloud providers, project types, projects, and integrations
//! - **permissions**: Role vocabulary used by the route guard

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Console domain models mirrored from the REST backend
pub mod models;

/// Role vocabulary for console and project scoped authorization
pub mod permissions;
