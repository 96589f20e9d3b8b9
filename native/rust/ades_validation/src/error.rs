// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation_policy::PolicyError;
use thiserror::Error;

/// Failures that prevent a validation run from producing reports.
///
/// Check failures are never reported through this type; they are part of the reports.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("policy cannot be applied: {0}")]
    Policy(#[from] PolicyError),

    #[error("{kind} `{id}` referenced by `{referenced_by}` is not present in the diagnostic data")]
    DanglingReference {
        kind: &'static str,
        id: String,
        referenced_by: String,
    },
}
