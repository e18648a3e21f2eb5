// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for fragment data operations

use thiserror::Error;

/// Result type alias for fragment data operations
pub type Result<T> = std::result::Result<T, FragmentError>;

/// Errors that can occur while building or decoding fragment data
#[derive(Error, Debug)]
pub enum FragmentError {
    /// Malformed JSON model data
    #[error("Invalid model data: {0}")]
    Json(#[from] serde_json::Error),

    /// Fragment not registered
    #[error("Fragment {0} not found")]
    FragmentNotFound(String),

    /// Geometry buffers are inconsistent
    #[error("Invalid fragment geometry: {0}")]
    InvalidGeometry(String),
}

impl FragmentError {
    /// Create a fragment not found error
    pub fn fragment_not_found(id: impl Into<String>) -> Self {
        FragmentError::FragmentNotFound(id.into())
    }

    /// Create an invalid geometry error
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        FragmentError::InvalidGeometry(msg.into())
    }
}
