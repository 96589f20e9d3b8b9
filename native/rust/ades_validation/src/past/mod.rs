// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Past validation: re-evaluating a token at the times its proofs of existence allow.

pub(crate) mod pcv;
pub(crate) mod psv;
pub(crate) mod vts;

use crate::poe::PoeStore;
use ades_validation_conclusion::{Conclusion, SubIndication};
use std::collections::HashMap;

pub(crate) use psv::{past_signature_validation, PastValidation};

/// What past validation reads besides the validation context.
pub(crate) struct Evidence<'e> {
    pub(crate) poe: &'e PoeStore,
    /// Basic conclusions of the revocation tokens, by id.
    pub(crate) revocation_conclusions: &'e HashMap<String, Conclusion>,
}

/// Sub-indications a proof of existence can resolve.
pub(crate) fn poe_healable(sub_indication: Option<SubIndication>) -> bool {
    matches!(
        sub_indication,
        Some(
            SubIndication::CryptoConstraintsFailureNoPoe
                | SubIndication::RevokedNoPoe
                | SubIndication::RevokedCaNoPoe
                | SubIndication::TryLater
                | SubIndication::OutOfBoundsNoPoe
                | SubIndication::OutOfBoundsNotRevoked
                | SubIndication::RevocationOutOfBoundsNoPoe
                | SubIndication::NoCertificateChainFoundNoPoe
                | SubIndication::NoPoe
        )
    )
}

/// PASSED, or INDETERMINATE for a reason a proof of existence can resolve.
pub(crate) fn passed_or_healable(conclusion: &Conclusion) -> bool {
    conclusion.is_passed() || (conclusion.is_indeterminate() && poe_healable(conclusion.sub_indication))
}
