// ABOUTME: Role vocabulary shared by identity claims and route declarations
// ABOUTME: Console-wide roles and project-scoped roles with string token conversion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tenant Console Contributors

use crate::constants::roles;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Console-wide role carried by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleRole {
    /// Platform administrator
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    /// Owner of the session's tenant
    #[serde(rename = "TENANT_OWNER")]
    TenantOwner,
}

impl ConsoleRole {
    /// Token used in claims and route declarations
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => roles::SUPERADMIN,
            Self::TenantOwner => roles::TENANT_OWNER,
        }
    }
}

/// Role a user holds inside a single project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectRole {
    /// Project owner
    Owner,
    /// Project deputy
    Deputy,
    /// Project member
    Member,
}

impl ProjectRole {
    /// Token used in claims and route declarations
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => roles::OWNER,
            Self::Deputy => roles::DEPUTY,
            Self::Member => roles::MEMBER,
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            roles::OWNER => Ok(Self::Owner),
            roles::DEPUTY => Ok(Self::Deputy),
            roles::MEMBER => Ok(Self::Member),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for ConsoleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            roles::SUPERADMIN => Ok(Self::SuperAdmin),
            roles::TENANT_OWNER => Ok(Self::TenantOwner),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// A role token outside the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role token '{0}'")]
pub struct UnknownRole(pub String);
