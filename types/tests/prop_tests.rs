use proptest::prelude::*;

use birthright_types::{Birthdate, Proof};

proptest! {
    /// Any existing calendar date survives Display -> FromStr.
    #[test]
    fn birthdate_display_parses_back(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=31) {
        if let Some(date) = Birthdate::from_ymd(year, month, day) {
            let parsed: Birthdate = date.to_string().parse().unwrap();
            prop_assert_eq!(parsed, date);
        }
    }

    /// A proof is complete exactly when none of its required fields is empty.
    #[test]
    fn proof_completeness_matches_empty_fields(
        root in "[ a-f0-9]{0,4}",
        nullifier in "[ a-f0-9]{0,4}",
        blob in "[ a-f0-9]{0,4}",
    ) {
        let proof = Proof {
            merkle_root: root.clone(),
            nullifier_hash: nullifier.clone(),
            proof: blob.clone(),
            verification_level: None,
        };
        let empties = [&root, &nullifier, &blob]
            .iter()
            .filter(|s| s.is_empty())
            .count();
        prop_assert_eq!(proof.missing_fields().len(), empties);
        prop_assert_eq!(proof.is_complete(), empties == 0);
    }
}
