// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the classification and highlight components

use ifc_lite_fragments::FragmentError;
use thiserror::Error;

/// Component result type
pub type Result<T> = std::result::Result<T, ComponentError>;

/// Component errors
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Required model data (usually properties) is missing
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A highlight channel with this name is already registered
    #[error("A highlight named {0} already exists")]
    AlreadyExists(String),

    /// No highlight channel with this name is registered
    #[error("Selection {0} does not exist")]
    NotFound(String),

    /// Fragment data error
    #[error(transparent)]
    Fragments(#[from] FragmentError),

    /// Malformed configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl ComponentError {
    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        ComponentError::InvalidState(msg.into())
    }

    /// Create an already exists error
    pub fn already_exists(name: impl Into<String>) -> Self {
        ComponentError::AlreadyExists(name.into())
    }

    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        ComponentError::NotFound(name.into())
    }
}
