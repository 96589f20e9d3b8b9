// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("failed to read diagnostic data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode diagnostic data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown digest algorithm: {0}")]
    UnknownDigestAlgorithm(String),

    #[error("unknown encryption algorithm: {0}")]
    UnknownEncryptionAlgorithm(String),
}
