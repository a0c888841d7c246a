/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs: email normalization,
/// the password-length gate, and the assignment filter partition.
use proptest::prelude::*;
use student_risk_api::assignments::assessments_for_counselor;
use student_risk_api::auth::{
    find_by_email, normalize_email, CredentialVerifier, PasswordLengthVerifier, MIN_PASSWORD_LEN,
};
use student_risk_api::models::{
    AssessmentMeta, CounselorMeta, CounselorRef, StoreObject,
};

fn counselor(id: &str, email: &str) -> StoreObject<CounselorMeta> {
    StoreObject {
        id: id.to_string(),
        title: format!("Counselor {}", id),
        slug: None,
        metadata: CounselorMeta {
            email: Some(email.to_string()),
            specialization: None,
        },
    }
}

fn assessment(id: usize, counselor_id: Option<&str>) -> StoreObject<AssessmentMeta> {
    StoreObject {
        id: format!("a-{}", id),
        title: format!("Risk Assessment - {}", id),
        slug: None,
        metadata: AssessmentMeta {
            student: None,
            risk_level: None,
            prediction_score: None,
            factors: None,
            assessment_date: None,
            status: None,
            teacher: None,
            assigned_counselor: counselor_id.map(|c| CounselorRef::Id(c.to_string())),
        },
    }
}

// Property: normalization never panics and is idempotent
proptest! {
    #[test]
    fn normalize_email_never_panics(email in "\\PC*") {
        let _ = normalize_email(&email);
    }

    #[test]
    fn normalize_email_is_idempotent(email in "\\PC*") {
        let once = normalize_email(&email);
        prop_assert_eq!(normalize_email(&once), once);
    }
}

// Property: emails differing only in case and surrounding whitespace are equal
proptest! {
    #[test]
    fn case_and_whitespace_variants_match_the_same_counselor(
        local in "[a-z][a-z0-9]{0,12}",
        domain in "[a-z]{2,10}",
        left_pad in " {0,3}",
        right_pad in " {0,3}",
        flip_case in proptest::bool::ANY,
    ) {
        let stored = format!("{}@{}.edu", local, domain);
        let counselors = vec![counselor("c-1", &stored)];

        let mut input = format!("{}{}{}", left_pad, stored, right_pad);
        if flip_case {
            input = input.to_uppercase();
        }

        let found = find_by_email(&counselors, &input);
        prop_assert_eq!(found.map(|c| c.id.as_str()), Some("c-1"));
    }
}

// Property: the password gate depends on character count alone, never on
// content or UTF-8 byte width
proptest! {
    #[test]
    fn short_passwords_always_rejected(password in ".{0,5}") {
        prop_assert!(password.chars().count() < MIN_PASSWORD_LEN);
        let c = counselor("c-1", "a@b.edu");
        prop_assert!(!PasswordLengthVerifier.verify(&c, &password));
    }

    #[test]
    fn long_enough_passwords_always_accepted(password in ".{6,40}") {
        prop_assert!(password.chars().count() >= MIN_PASSWORD_LEN);
        let c = counselor("c-1", "a@b.edu");
        prop_assert!(PasswordLengthVerifier.verify(&c, &password));
    }
}

// Property: the assignment filter selects exactly the matching subset,
// preserves source order, and its counts partition the assigned set
proptest! {
    #[test]
    fn filter_selects_exactly_the_matching_subsequence(
        owners in prop::collection::vec(prop::option::of(0u8..4u8), 0..30),
        wanted in 0u8..4u8,
    ) {
        let assessments: Vec<_> = owners
            .iter()
            .enumerate()
            .map(|(i, owner)| {
                assessment(i, owner.map(|o| format!("c-{}", o)).as_deref())
            })
            .collect();

        let counselor_id = format!("c-{}", wanted);
        let summary = assessments_for_counselor(assessments, &counselor_id);

        // Exactly the indices whose owner matches, in source order
        let expected: Vec<String> = owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner == Some(wanted))
            .map(|(i, _)| format!("a-{}", i))
            .collect();
        let actual: Vec<String> = summary.assigned.iter().map(|a| a.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn counts_partition_the_assigned_set(
        owners in prop::collection::vec(prop::option::of(0u8..2u8), 0..30),
    ) {
        let assessments: Vec<_> = owners
            .iter()
            .enumerate()
            .map(|(i, owner)| {
                assessment(i, owner.map(|o| format!("c-{}", o)).as_deref())
            })
            .collect();

        let summary = assessments_for_counselor(assessments, "c-0");

        // high_risk_count + (len - high_risk_count) partitions assigned with
        // no overlap, and both statistics are bounded by the subset size
        prop_assert!(summary.high_risk_count <= summary.assigned.len());
        prop_assert!(summary.pending_count <= summary.assigned.len());
        let non_high = summary.assigned.len() - summary.high_risk_count;
        prop_assert_eq!(summary.high_risk_count + non_high, summary.assigned.len());
    }
}
