// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode policy: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed OID: {0}")]
    InvalidOid(String),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("date '{value}' does not match format '{format}'")]
    InvalidDate { value: String, format: String },

    #[error("duplicate expiration entry for digest algorithm {0}")]
    DuplicateDigestEntry(String),
}
