// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Algorithm identifiers as they appear in diagnostic data and validation policies.

use crate::error::DiagnosticError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[serde(rename = "MD2")]
    Md2,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA224")]
    Sha224,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA384")]
    Sha384,
    #[serde(rename = "SHA512")]
    Sha512,
    #[serde(rename = "SHA3-224")]
    Sha3_224,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
    #[serde(rename = "RIPEMD160")]
    Ripemd160,
    #[serde(rename = "WHIRLPOOL")]
    Whirlpool,
}

impl DigestAlgorithm {
    pub const ALL: &'static [DigestAlgorithm] = &[
        DigestAlgorithm::Md2,
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha3_224,
        DigestAlgorithm::Sha3_256,
        DigestAlgorithm::Sha3_384,
        DigestAlgorithm::Sha3_512,
        DigestAlgorithm::Ripemd160,
        DigestAlgorithm::Whirlpool,
    ];

    /// Name used by policies (`SHA256`, `SHA3-256`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md2 => "MD2",
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha224 => "SHA224",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha384 => "SHA384",
            DigestAlgorithm::Sha512 => "SHA512",
            DigestAlgorithm::Sha3_224 => "SHA3-224",
            DigestAlgorithm::Sha3_256 => "SHA3-256",
            DigestAlgorithm::Sha3_384 => "SHA3-384",
            DigestAlgorithm::Sha3_512 => "SHA3-512",
            DigestAlgorithm::Ripemd160 => "RIPEMD160",
            DigestAlgorithm::Whirlpool => "WHIRLPOOL",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DigestAlgorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiagnosticError::UnknownDigestAlgorithm(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EncryptionAlgorithm {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "RSASSA-PSS")]
    RsassaPss,
    #[serde(rename = "DSA")]
    Dsa,
    #[serde(rename = "ECDSA")]
    Ecdsa,
    #[serde(rename = "PLAIN-ECDSA")]
    PlainEcdsa,
    #[serde(rename = "EdDSA")]
    EdDsa,
    #[serde(rename = "HMAC")]
    Hmac,
}

impl EncryptionAlgorithm {
    pub const ALL: &'static [EncryptionAlgorithm] = &[
        EncryptionAlgorithm::Rsa,
        EncryptionAlgorithm::RsassaPss,
        EncryptionAlgorithm::Dsa,
        EncryptionAlgorithm::Ecdsa,
        EncryptionAlgorithm::PlainEcdsa,
        EncryptionAlgorithm::EdDsa,
        EncryptionAlgorithm::Hmac,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EncryptionAlgorithm::Rsa => "RSA",
            EncryptionAlgorithm::RsassaPss => "RSASSA-PSS",
            EncryptionAlgorithm::Dsa => "DSA",
            EncryptionAlgorithm::Ecdsa => "ECDSA",
            EncryptionAlgorithm::PlainEcdsa => "PLAIN-ECDSA",
            EncryptionAlgorithm::EdDsa => "EdDSA",
            EncryptionAlgorithm::Hmac => "HMAC",
        }
    }

    /// Returns true when `other` names the same key family.
    ///
    /// Policies list `RSA` and `ECDSA` only; the padding/encoding variants share their key sizes.
    pub fn is_equivalent(&self, other: EncryptionAlgorithm) -> bool {
        self.family() == other.family()
    }

    fn family(&self) -> EncryptionAlgorithm {
        match self {
            EncryptionAlgorithm::RsassaPss => EncryptionAlgorithm::Rsa,
            EncryptionAlgorithm::PlainEcdsa => EncryptionAlgorithm::Ecdsa,
            other => *other,
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncryptionAlgorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiagnosticError::UnknownEncryptionAlgorithm(s.to_string()))
    }
}
