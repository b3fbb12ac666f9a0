use proptest::prelude::*;
use sdk::errors::{EngineError, RosterErrorExt};
use sdk::{Gender, Member, MemberId, QuestionCategory};

proptest! {
    #[test]
    fn test_error_user_hint_completeness(error_str in "\\PC*", id in any::<i64>()) {
        // Hints are static strings and never echo the raw error payload
        let errs = vec![
            EngineError::Config(error_str.clone()),
            EngineError::Database(error_str.clone()),
            EngineError::InvalidInput(error_str.clone()),
            EngineError::UnresolvedMember(id),
            EngineError::Invariant(error_str.clone()),
            EngineError::Import(error_str.clone()),
        ];

        for err in errs {
            let hint = err.user_hint();
            prop_assert!(!hint.is_empty());
            prop_assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_gender_parse_ignores_case_and_padding(
        tag in prop::sample::select(vec!["male", "m", "man", "female", "f", "woman"]),
        upper in any::<bool>(),
        pad in " {0,3}",
    ) {
        let cased = if upper { tag.to_uppercase() } else { tag.to_string() };
        let padded = format!("{pad}{cased}{pad}");
        prop_assert_eq!(Gender::parse(&padded), Gender::parse(tag));
        prop_assert_ne!(Gender::parse(&padded), Gender::Unspecified);
    }

    #[test]
    fn test_gender_parse_is_total(tag in "\\PC*") {
        // Every input maps to some gender, and stored names parse back
        let gender = Gender::parse(&tag);
        prop_assert_eq!(Gender::parse(gender.as_str()), gender);
    }

    #[test]
    fn test_member_json_roundtrip(id in any::<i64>(), name in "[a-zA-Z가-힣]{1,12}", grouped in any::<bool>()) {
        let mut member = Member::new(id, name, Gender::Female);
        member.grouped = grouped;

        let json = serde_json::to_string(&member).unwrap();
        let back: Member = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.id, MemberId(id));
        prop_assert_eq!(back, member);
    }

    #[test]
    fn test_category_strings_roundtrip(index in 0usize..7) {
        let all = [
            QuestionCategory::Leadership,
            QuestionCategory::Personality,
            QuestionCategory::Preference,
            QuestionCategory::Hobby,
            QuestionCategory::Food,
            QuestionCategory::Icebreaker,
            QuestionCategory::General,
        ];
        let category = all[index];
        prop_assert_eq!(QuestionCategory::parse(category.as_str()), Some(category));
    }
}
