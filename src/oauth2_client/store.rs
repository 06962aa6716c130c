// ABOUTME: Durable storage of pending OAuth flows across the provider redirect
// ABOUTME: Written before the redirect, read-and-cleared on callback entry, keyed per browser
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use super::state::OAuthStateToken;
use crate::errors::AppResult;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// What must survive the redirect: the full state token and the challenge sent out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFlow {
    /// Full state token, verifier included
    pub token: OAuthStateToken,
    /// Challenge placed in the authorization URL
    pub code_challenge: String,
}

/// Storage for pending flows
///
/// A second `save` under the same key replaces the first flow, which then fails
/// correlation on its callback.
#[async_trait]
pub trait FlowStateStore: Send + Sync {
    /// Persist a pending flow before redirecting
    async fn save(&self, flow_key: &str, flow: PendingFlow) -> AppResult<()>;

    /// Remove and return the pending flow; a flow can be taken once
    async fn take(&self, flow_key: &str) -> AppResult<Option<PendingFlow>>;

    /// Drop flows stored longer than `max_age` ago; returns how many were dropped
    async fn purge_expired(&self, max_age: Duration) -> usize;
}

struct StoredFlow {
    encoded_token: String,
    code_challenge: String,
    stored_at: Instant,
}

/// Process-local [`FlowStateStore`]
#[derive(Default)]
pub struct InMemoryFlowStateStore {
    flows: DashMap<String, StoredFlow>,
}

impl InMemoryFlowStateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending flows
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Whether no flow is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[async_trait]
impl FlowStateStore for InMemoryFlowStateStore {
    async fn save(&self, flow_key: &str, flow: PendingFlow) -> AppResult<()> {
        let stored = StoredFlow {
            encoded_token: flow.token.serialize()?,
            code_challenge: flow.code_challenge,
            stored_at: Instant::now(),
        };
        if self.flows.insert(flow_key.to_owned(), stored).is_some() {
            debug!("Pending OAuth flow replaced by a newer attempt");
        }
        Ok(())
    }

    async fn take(&self, flow_key: &str) -> AppResult<Option<PendingFlow>> {
        let Some((_, stored)) = self.flows.remove(flow_key) else {
            return Ok(None);
        };
        let token = OAuthStateToken::deserialize(&stored.encoded_token)?;
        Ok(Some(PendingFlow {
            token,
            code_challenge: stored.code_challenge,
        }))
    }

    async fn purge_expired(&self, max_age: Duration) -> usize {
        let before = self.flows.len();
        self.flows
            .retain(|_, stored| stored.stored_at.elapsed() <= max_age);
        before.saturating_sub(self.flows.len())
    }
}
