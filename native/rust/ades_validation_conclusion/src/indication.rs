// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    Passed,
    Indeterminate,
    Failed,
    TotalPassed,
    TotalFailed,
}

impl Indication {
    pub fn is_passed(&self) -> bool {
        matches!(self, Indication::Passed | Indication::TotalPassed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Indication::Failed | Indication::TotalFailed)
    }

    pub fn is_indeterminate(&self) -> bool {
        *self == Indication::Indeterminate
    }

    /// Signature-level form: PASSED becomes TOTAL_PASSED and FAILED becomes TOTAL_FAILED.
    pub fn to_total(self) -> Self {
        match self {
            Indication::Passed => Indication::TotalPassed,
            Indication::Failed => Indication::TotalFailed,
            other => other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Indication::Passed => "PASSED",
            Indication::Indeterminate => "INDETERMINATE",
            Indication::Failed => "FAILED",
            Indication::TotalPassed => "TOTAL_PASSED",
            Indication::TotalFailed => "TOTAL_FAILED",
        }
    }

    pub fn semantics(&self) -> &'static str {
        match self {
            Indication::Passed => "The validation process succeeded for this token.",
            Indication::Indeterminate => {
                "The available information is insufficient to ascertain the signature to be TOTAL-PASSED or TOTAL-FAILED."
            }
            Indication::Failed => "The validation process failed for this token.",
            Indication::TotalPassed => {
                "The signature validation process results into TOTAL-PASSED based on all checks of the validation policy."
            }
            Indication::TotalFailed => {
                "The signature validation process results into TOTAL-FAILED because the cryptographic checks failed, \
                 a signed data object was modified, or the signing certificate was revoked before signing."
            }
        }
    }
}

impl fmt::Display for Indication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubIndication {
    FormatFailure,
    HashFailure,
    SigCryptoFailure,
    Revoked,
    SigConstraintsFailure,
    ChainConstraintsFailure,
    CertificateChainGeneralFailure,
    CryptoConstraintsFailure,
    Expired,
    NotYetValid,
    PolicyProcessingError,
    SignaturePolicyNotAvailable,
    TimestampOrderFailure,
    NoSigningCertificateFound,
    NoCertificateChainFound,
    RevokedNoPoe,
    RevokedCaNoPoe,
    OutOfBoundsNoPoe,
    OutOfBoundsNotRevoked,
    RevocationOutOfBoundsNoPoe,
    CryptoConstraintsFailureNoPoe,
    NoPoe,
    TryLater,
    SignedDataNotFound,
    NoCertificateChainFoundNoPoe,
}

impl SubIndication {
    pub fn name(&self) -> &'static str {
        match self {
            SubIndication::FormatFailure => "FORMAT_FAILURE",
            SubIndication::HashFailure => "HASH_FAILURE",
            SubIndication::SigCryptoFailure => "SIG_CRYPTO_FAILURE",
            SubIndication::Revoked => "REVOKED",
            SubIndication::SigConstraintsFailure => "SIG_CONSTRAINTS_FAILURE",
            SubIndication::ChainConstraintsFailure => "CHAIN_CONSTRAINTS_FAILURE",
            SubIndication::CertificateChainGeneralFailure => "CERTIFICATE_CHAIN_GENERAL_FAILURE",
            SubIndication::CryptoConstraintsFailure => "CRYPTO_CONSTRAINTS_FAILURE",
            SubIndication::Expired => "EXPIRED",
            SubIndication::NotYetValid => "NOT_YET_VALID",
            SubIndication::PolicyProcessingError => "POLICY_PROCESSING_ERROR",
            SubIndication::SignaturePolicyNotAvailable => "SIGNATURE_POLICY_NOT_AVAILABLE",
            SubIndication::TimestampOrderFailure => "TIMESTAMP_ORDER_FAILURE",
            SubIndication::NoSigningCertificateFound => "NO_SIGNING_CERTIFICATE_FOUND",
            SubIndication::NoCertificateChainFound => "NO_CERTIFICATE_CHAIN_FOUND",
            SubIndication::RevokedNoPoe => "REVOKED_NO_POE",
            SubIndication::RevokedCaNoPoe => "REVOKED_CA_NO_POE",
            SubIndication::OutOfBoundsNoPoe => "OUT_OF_BOUNDS_NO_POE",
            SubIndication::OutOfBoundsNotRevoked => "OUT_OF_BOUNDS_NOT_REVOKED",
            SubIndication::RevocationOutOfBoundsNoPoe => "REVOCATION_OUT_OF_BOUNDS_NO_POE",
            SubIndication::CryptoConstraintsFailureNoPoe => "CRYPTO_CONSTRAINTS_FAILURE_NO_POE",
            SubIndication::NoPoe => "NO_POE",
            SubIndication::TryLater => "TRY_LATER",
            SubIndication::SignedDataNotFound => "SIGNED_DATA_NOT_FOUND",
            SubIndication::NoCertificateChainFoundNoPoe => "NO_CERTIFICATE_CHAIN_FOUND_NO_POE",
        }
    }

    pub fn semantics(&self) -> &'static str {
        match self {
            SubIndication::FormatFailure => "The signature is not conformant to one of the base standards.",
            SubIndication::HashFailure => "The hash of at least one signed data object does not match.",
            SubIndication::SigCryptoFailure => "The signature value could not be verified with the signer's public key.",
            SubIndication::Revoked => "The signing certificate was revoked and the signature was created after revocation.",
            SubIndication::SigConstraintsFailure => "Signed attributes do not match the validation constraints.",
            SubIndication::ChainConstraintsFailure => {
                "The certificate chain is valid but does not match the validation constraints."
            }
            SubIndication::CertificateChainGeneralFailure => {
                "The certificate chain is invalid for a reason not covered by another sub-indication."
            }
            SubIndication::CryptoConstraintsFailure => {
                "An algorithm or key size is below the required security level at a proven time."
            }
            SubIndication::Expired => "The signature was created after the signing certificate expired.",
            SubIndication::NotYetValid => "The signing time lies before the issuance date of the signing certificate.",
            SubIndication::PolicyProcessingError => "A formal policy file could not be processed.",
            SubIndication::SignaturePolicyNotAvailable => "The required signature policy is not available.",
            SubIndication::TimestampOrderFailure => "Time-stamp tokens do not follow the required order.",
            SubIndication::NoSigningCertificateFound => "The signing certificate cannot be identified.",
            SubIndication::NoCertificateChainFound => "No certificate chain to a trust anchor was found.",
            SubIndication::RevokedNoPoe => {
                "The signing certificate was revoked and no proof of existence before revocation is available."
            }
            SubIndication::RevokedCaNoPoe => {
                "A CA certificate was revoked and no proof of existence before its revocation is available."
            }
            SubIndication::OutOfBoundsNoPoe => {
                "The signing certificate is expired or not yet valid and no proof of existence within its validity exists."
            }
            SubIndication::OutOfBoundsNotRevoked => {
                "The signing certificate is expired but known not to have been revoked before expiry."
            }
            SubIndication::RevocationOutOfBoundsNoPoe => {
                "Revocation data was used without proof of existence within its validity."
            }
            SubIndication::CryptoConstraintsFailureNoPoe => {
                "An algorithm or key size is below the required security level and no earlier proof of existence exists."
            }
            SubIndication::NoPoe => "No proof of existence is available to validate past events.",
            SubIndication::TryLater => "Newer revocation information is needed to conclude.",
            SubIndication::SignedDataNotFound => "A signed data object could not be found.",
            SubIndication::NoCertificateChainFoundNoPoe => {
                "No certificate chain to a trust anchor was found at the proof-of-existence time."
            }
        }
    }
}

impl fmt::Display for SubIndication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
