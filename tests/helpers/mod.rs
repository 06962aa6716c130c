// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports router request helpers, session fixtures, and a fake REST backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod backend;
pub mod sessions;
