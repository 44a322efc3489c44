// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use understory_view2d::PolicyFlagsError;

/// A rejected configuration value.
///
/// Setters returning this error leave the view's configuration unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A legacy policy flag combination that names no valid policy.
    InvalidPolicyFlags(PolicyFlagsError),
    /// A zoom limit that is negative or not finite.
    InvalidScale {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPolicyFlags(err) => write!(f, "invalid limit policy: {err}"),
            Self::InvalidScale { value } => {
                write!(f, "zoom limit {value} must be finite and not negative")
            }
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidPolicyFlags(err) => Some(err),
            Self::InvalidScale { .. } => None,
        }
    }
}

impl From<PolicyFlagsError> for ConfigError {
    fn from(err: PolicyFlagsError) -> Self {
        Self::InvalidPolicyFlags(err)
    }
}
