// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validation levels above the basic building blocks: long-term data and archival data.

pub(crate) mod archival;
pub(crate) mod ltv;

use crate::bbb::BasicBuildingBlocks;
use crate::context::ValidationContext;
use ades_validation_conclusion::{Conclusion, SubIndication};
use ades_validation_diagnostic::{Certificate, Revocation, Signature};
use chrono::{DateTime, Utc};

/// Basic verdicts the long-term level can still improve.
pub(crate) fn ltv_acceptable(conclusion: &Conclusion) -> bool {
    conclusion.is_passed()
        || (conclusion.is_indeterminate()
            && matches!(
                conclusion.sub_indication,
                Some(
                    SubIndication::CryptoConstraintsFailureNoPoe
                        | SubIndication::RevokedNoPoe
                        | SubIndication::RevokedCaNoPoe
                        | SubIndication::TryLater
                        | SubIndication::OutOfBoundsNoPoe
                        | SubIndication::OutOfBoundsNotRevoked
                )
            ))
}

/// Long-term verdicts the archival level can still improve.
pub(crate) fn archival_acceptable(conclusion: &Conclusion) -> bool {
    ltv_acceptable(conclusion)
        || (conclusion.is_indeterminate()
            && matches!(
                conclusion.sub_indication,
                Some(
                    SubIndication::RevocationOutOfBoundsNoPoe
                        | SubIndication::NoCertificateChainFoundNoPoe
                        | SubIndication::NoPoe
                )
            ))
}

/// Best signature time reported for `signature`.
///
/// A valid timestamp that moved `control_time` before `current_time` wins; otherwise the claimed
/// signing time is reported and `control_time` only when the signature claims none.
pub(crate) fn best_signature_time(
    signature: &Signature,
    control_time: DateTime<Utc>,
    current_time: DateTime<Utc>,
) -> DateTime<Utc> {
    if control_time < current_time {
        control_time
    } else {
        signature.claimed_signing_time.unwrap_or(control_time)
    }
}

/// Revocations XCV selected for the chain of `bbb`.
pub(crate) fn selected_revocations<'a>(ctx: &ValidationContext<'a>, bbb: &BasicBuildingBlocks) -> Vec<&'a Revocation> {
    bbb.selected_revocations()
        .into_iter()
        .filter_map(|(_, revocation_id)| ctx.index.revocation(revocation_id))
        .collect()
}

/// Earliest date a non-hold revocation of `certificate` takes effect.
pub(crate) fn revocation_date(certificate: &Certificate) -> Option<DateTime<Utc>> {
    certificate
        .revocations
        .iter()
        .filter(|e| e.is_revoked() && !e.is_on_hold())
        .filter_map(|e| e.revocation_date)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_term_level_accepts_poe_related_verdicts() {
        assert!(ltv_acceptable(&Conclusion::passed()));
        assert!(ltv_acceptable(&Conclusion::indeterminate(SubIndication::TryLater)));
        assert!(!ltv_acceptable(&Conclusion::indeterminate(SubIndication::NoPoe)));
        assert!(!ltv_acceptable(&Conclusion::failed(SubIndication::HashFailure)));
    }

    #[test]
    fn archival_level_accepts_more() {
        assert!(archival_acceptable(&Conclusion::indeterminate(SubIndication::NoPoe)));
        assert!(archival_acceptable(&Conclusion::indeterminate(
            SubIndication::RevocationOutOfBoundsNoPoe
        )));
        assert!(!archival_acceptable(&Conclusion::indeterminate(
            SubIndication::ChainConstraintsFailure
        )));
    }
}
