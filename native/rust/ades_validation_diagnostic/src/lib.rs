// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Diagnostic-data snapshot for AdES validation.
//!
//! The snapshot is a read-only graph of [`signature`], [`certificate`], [`revocation`],
//! [`timestamp`] and [`trust`] facts keyed by opaque string ids. It is produced upstream
//! (parsing, cryptographic verification, revocation retrieval) and never mutated by the
//! validation engine.

pub mod algorithms;
pub mod certificate;
pub mod data;
pub mod error;
pub mod revocation;
pub mod signature;
pub mod timestamp;
pub mod token;
pub mod trust;

pub use algorithms::{DigestAlgorithm, EncryptionAlgorithm};
pub use certificate::{
    BasicConstraints, Certificate, CertificateExtension, CertificatePolicy, CertificateRevocation,
    CertificateStatus, DistinguishedNameAttributes, KeyUsage, NameConstraints, QcLimitValue,
    QcStatements, QcType, Psd2Info, RevocationReason,
};
pub use data::DiagnosticData;
pub use error::DiagnosticError;
pub use revocation::{Revocation, RevocationType};
pub use signature::{Signature, SignedAttributes};
pub use timestamp::{Timestamp, TimestampType, TimestampedObject, TimestampedObjectCategory};
pub use token::{BasicSignature, DigestMatcher, DigestMatcherType, SigningCertificateRef, TokenKind};
pub use trust::{TrustService, TrustServiceProvider, TrustServiceStatusPeriod, TrustedList};
