// ABOUTME: OAuth connection flow state machine with an explicit transition table
// ABOUTME: Tracks step, progress, loading flag, and the terminal error of one connection attempt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::errors::OAuthError;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step of an `OAuth` connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Connection requested, nothing generated yet
    Initialization,
    /// Redirect issued; waiting on the provider
    Authorization,
    /// Redirect-back received
    Callback,
    /// Exchanging the code through the backend
    TokenExchange,
    /// Integration active
    Completion,
    /// Failed
    Error,
}

impl FlowStep {
    /// Progress reported on entering this step; `None` for `Error`, which keeps the last value
    #[must_use]
    pub const fn progress(&self) -> Option<u8> {
        match self {
            Self::Initialization => Some(0),
            Self::Authorization => Some(25),
            Self::Callback => Some(50),
            Self::TokenExchange => Some(75),
            Self::Completion => Some(100),
            Self::Error => None,
        }
    }

    /// Whether the flow is waiting on external work in this step
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Authorization | Self::Callback | Self::TokenExchange)
    }

    /// Whether no further forward transition exists
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completion | Self::Error)
    }

    /// The single step that follows on success
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Initialization => Some(Self::Authorization),
            Self::Authorization => Some(Self::Callback),
            Self::Callback => Some(Self::TokenExchange),
            Self::TokenExchange => Some(Self::Completion),
            Self::Completion | Self::Error => None,
        }
    }

    /// Wire name of the step
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Authorization => "authorization",
            Self::Callback => "callback",
            Self::TokenExchange => "token_exchange",
            Self::Completion => "completion",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one in-flight connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlowState {
    /// Current step
    pub step: FlowStep,
    /// Integration being connected, once known
    pub integration_id: Option<String>,
    /// Terminal error, when `step` is `Error`
    pub error: Option<OAuthError>,
    /// Whether external work is pending
    pub is_loading: bool,
    /// Progress, 0-100
    pub progress: u8,
}

impl Default for OAuthFlowState {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthFlowState {
    /// Fresh flow at `Initialization`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: FlowStep::Initialization,
            integration_id: None,
            error: None,
            is_loading: false,
            progress: 0,
        }
    }

    /// Fresh flow for a known integration
    #[must_use]
    pub fn for_integration(integration_id: impl Into<String>) -> Self {
        Self {
            integration_id: Some(integration_id.into()),
            ..Self::new()
        }
    }

    /// Flow re-entered on the callback route: the redirect was issued earlier
    #[must_use]
    pub const fn awaiting_callback() -> Self {
        Self {
            step: FlowStep::Authorization,
            integration_id: None,
            error: None,
            is_loading: true,
            progress: 25,
        }
    }

    /// Move forward to `next`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `next` is not the successor of the current step
    pub fn advance(&mut self, next: FlowStep) -> AppResult<()> {
        if self.step.next() != Some(next) {
            return Err(AppError::invalid_input(format!(
                "Invalid OAuth flow transition: {} -> {next}",
                self.step
            )));
        }
        self.enter(next);
        Ok(())
    }

    /// Terminate with an error
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the flow already finished
    pub fn fail(&mut self, error: OAuthError) -> AppResult<()> {
        if self.step.is_terminal() {
            return Err(AppError::invalid_input(format!(
                "Cannot fail an OAuth flow in terminal step {}",
                self.step
            )));
        }
        self.error = Some(error);
        self.enter(FlowStep::Error);
        Ok(())
    }

    /// Return a failed flow to `Initialization` for a user-initiated retry
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless the flow is in `Error`
    pub fn restart(&mut self) -> AppResult<()> {
        if self.step != FlowStep::Error {
            return Err(AppError::invalid_input(format!(
                "Only failed OAuth flows can restart, current step is {}",
                self.step
            )));
        }
        self.error = None;
        self.enter(FlowStep::Initialization);
        Ok(())
    }

    /// Whether the flow ended successfully
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.step == FlowStep::Completion
    }

    fn enter(&mut self, step: FlowStep) {
        self.step = step;
        self.is_loading = step.is_loading();
        if let Some(progress) = step.progress() {
            self.progress = progress;
        }
    }
}
