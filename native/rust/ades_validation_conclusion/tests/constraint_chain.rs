// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation_conclusion::{
    Check, Conclusion, ConstraintChain, Indication, Message, MessageTag, Status, SubIndication,
};
use ades_validation_policy::Level;

#[test]
fn first_fail_decides_sub_indication() {
    let mut chain = ConstraintChain::new();
    assert!(!chain.check(
        Check::new(MessageTag::BBB_ICS_ISCI, false)
            .fail()
            .answer(MessageTag::BBB_ICS_ISCI_ANS)
            .on_failure(Indication::Indeterminate, SubIndication::NoSigningCertificateFound),
    ));
    assert!(!chain.check(
        Check::new(MessageTag::BBB_CV_ISI, false)
            .fail()
            .answer(MessageTag::BBB_CV_ISI_ANS)
            .on_failure(Indication::Failed, SubIndication::SigCryptoFailure),
    ));
    let (constraints, conclusion) = chain.finish();

    assert_eq!(constraints.len(), 2);
    assert_eq!(conclusion.indication, Some(Indication::Indeterminate));
    assert_eq!(conclusion.sub_indication, Some(SubIndication::NoSigningCertificateFound));
    assert!(conclusion.has_error(MessageTag::BBB_ICS_ISCI_ANS));
    assert!(conclusion.has_error(MessageTag::BBB_CV_ISI_ANS));
}

#[test]
fn absent_level_skips_and_ignore_records() {
    let mut chain = ConstraintChain::new();
    assert!(chain.check(Check::new(MessageTag::BBB_SAV_ISQPSTP, false)));
    assert!(chain.check(Check::new(MessageTag::BBB_SAV_ISQPCTP, false).level(Some(Level::Ignore))));
    let (constraints, conclusion) = chain.finish();

    assert_eq!(constraints.len(), 1);
    assert_eq!(constraints[0].status, Status::Ignored);
    assert!(constraints[0].is(MessageTag::BBB_SAV_ISQPCTP));
    assert_eq!(conclusion, Conclusion::passed());
}

#[test]
fn warn_and_inform_keep_the_block_passing() {
    let mut chain = ConstraintChain::new();
    assert!(chain.check(Check::new(MessageTag::BBB_XCV_ICSI, false).warn().answer(MessageTag::BBB_XCV_ICSI_ANS)));
    assert!(chain.check(Check::new(MessageTag::BBB_XCV_ISCGPSEUD, false).inform()));
    let (constraints, conclusion) = chain.finish();

    assert_eq!(constraints[0].status, Status::Warning);
    assert_eq!(constraints[1].status, Status::Information);
    assert!(conclusion.is_passed());
    assert!(conclusion.has_warning(MessageTag::BBB_XCV_ICSI_ANS));
    assert!(conclusion.has_info(MessageTag::BBB_XCV_ISCGPSEUD));
}

#[test]
fn result_check_takes_child_verdict_and_messages() {
    let mut child = Conclusion::indeterminate(SubIndication::OutOfBoundsNoPoe);
    child.add_error(MessageTag::BBB_XCV_ICTIVRSC_ANS.into());
    child.add_warning(MessageTag::BBB_XCV_ICSI_ANS.into());

    let mut chain = ConstraintChain::new();
    assert!(!chain.check(Check::result(MessageTag::BBB_XCV_CCCBB, "XCV-1", &child)));
    let (constraints, conclusion) = chain.finish();

    assert_eq!(constraints[0].block_id.as_deref(), Some("XCV-1"));
    assert_eq!(conclusion.indication, Some(Indication::Indeterminate));
    assert_eq!(conclusion.sub_indication, Some(SubIndication::OutOfBoundsNoPoe));
    assert!(conclusion.has_error(MessageTag::BBB_XCV_ICTIVRSC_ANS));
    assert!(conclusion.has_warning(MessageTag::BBB_XCV_ICSI_ANS));
}

#[test]
fn passing_child_still_contributes_warnings() {
    let mut child = Conclusion::passed();
    child.add_warning(MessageTag::BBB_RFC_NUP_ANS.into());

    let mut chain = ConstraintChain::new();
    assert!(chain.check(Check::result(MessageTag::BBB_XCV_RFC, "RFC-1", &child)));
    assert!(chain.check(Check::result(MessageTag::BBB_XCV_RFC, "RFC-2", &child)));
    let (_, conclusion) = chain.finish();

    assert!(conclusion.is_passed());
    assert_eq!(conclusion.warnings.len(), 1);
}

#[test]
fn success_info_is_recorded_only_on_pass() {
    let info = Message::new(MessageTag::ADEST_ITVPC_INFO_1).with_text("T-1");
    let mut chain = ConstraintChain::new();
    chain.check(Check::new(MessageTag::ADEST_ITVPC, true).fail().info_on_success(info.clone()));
    chain.check(Check::new(MessageTag::ADEST_ITVPC, false).warn().info_on_success(info.clone()));
    let (constraints, conclusion) = chain.finish();

    assert_eq!(constraints[0].info.as_ref(), Some(&info));
    assert!(constraints[1].info.is_none());
    assert_eq!(conclusion.infos, vec![info]);
}

#[test]
fn serialized_constraint_uses_tag_names() {
    let mut chain = ConstraintChain::new();
    chain.check(
        Check::new(MessageTag::ASCCM, false)
            .fail()
            .answer(Message::new(MessageTag::ASCCM_ANS_2).with_text("SHA1").with_tag(MessageTag::ACCM_POS_SIG_SIG))
            .on_failure(Indication::Indeterminate, SubIndication::CryptoConstraintsFailureNoPoe),
    );
    let (constraints, conclusion) = chain.finish();

    let json = serde_json::to_value(&constraints[0]).unwrap();
    assert_eq!(json["name"]["tag"], "ASCCM");
    assert_eq!(json["status"], "NOT_OK");
    assert_eq!(json["error"]["args"][0], "SHA1");
    assert_eq!(json["error"]["args"][1], "ACCM_POS_SIG_SIG");

    let json = serde_json::to_value(&conclusion).unwrap();
    assert_eq!(json["indication"], "INDETERMINATE");
    assert_eq!(json["subIndication"], "CRYPTO_CONSTRAINTS_FAILURE_NO_POE");
}
