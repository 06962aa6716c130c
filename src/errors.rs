// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Every console module returns AppResult with an ErrorCode-classified AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

pub use tenant_console_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails,
};
