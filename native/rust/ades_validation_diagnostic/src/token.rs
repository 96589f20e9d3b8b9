// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Facts shared by every signed token (signature, timestamp, revocation, certificate).

use crate::algorithms::{DigestAlgorithm, EncryptionAlgorithm};
use serde::{Deserialize, Serialize};

/// Kind of token a validation block is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Signature,
    Timestamp,
    Revocation,
    Certificate,
}

/// Cryptographic parameters and verification flags of a token signature.
///
/// Intactness is computed upstream; the engine only reads the flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicSignature {
    pub encryption_algorithm: Option<EncryptionAlgorithm>,
    pub digest_algorithm: Option<DigestAlgorithm>,
    pub key_length: Option<u32>,
    pub signature_intact: bool,
    pub signature_valid: bool,
}

impl BasicSignature {
    pub fn new(
        encryption_algorithm: EncryptionAlgorithm,
        digest_algorithm: DigestAlgorithm,
        key_length: u32,
    ) -> Self {
        Self {
            encryption_algorithm: Some(encryption_algorithm),
            digest_algorithm: Some(digest_algorithm),
            key_length: Some(key_length),
            signature_intact: true,
            signature_valid: true,
        }
    }
}

/// Reference from a token to the certificate that signed it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SigningCertificateRef {
    pub certificate_id: Option<String>,
    /// The signed attribute carrying the reference is present.
    pub attribute_present: bool,
    pub digest_value_present: bool,
    pub digest_value_match: bool,
    pub issuer_serial_match: bool,
    pub digest_algorithm: Option<DigestAlgorithm>,
}

impl SigningCertificateRef {
    /// A fully matching reference to `certificate_id`.
    pub fn matching(certificate_id: impl Into<String>, digest_algorithm: DigestAlgorithm) -> Self {
        Self {
            certificate_id: Some(certificate_id.into()),
            attribute_present: true,
            digest_value_present: true,
            digest_value_match: true,
            issuer_serial_match: true,
            digest_algorithm: Some(digest_algorithm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigestMatcherType {
    MessageDigest,
    SignedProperties,
    Reference,
    ObjectReference,
    KeyInfo,
    ManifestEntry,
    MessageImprint,
    ContentDigest,
}

/// A digest computed over one signed part and compared upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestMatcher {
    #[serde(rename = "type")]
    pub matcher_type: DigestMatcherType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub digest_algorithm: Option<DigestAlgorithm>,
    pub data_found: bool,
    pub data_intact: bool,
}

impl DigestMatcher {
    pub fn intact(matcher_type: DigestMatcherType, digest_algorithm: DigestAlgorithm) -> Self {
        Self {
            matcher_type,
            name: None,
            digest_algorithm: Some(digest_algorithm),
            data_found: true,
            data_intact: true,
        }
    }
}
