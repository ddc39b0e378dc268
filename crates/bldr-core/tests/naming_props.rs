use bldr_core::{capitalize_first, decapitalize, singularize};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

fn arb_identifier() -> impl Strategy<Value = String> {
    // Java-identifier-ish fragments, the only inputs these helpers see.
    "[a-zA-Z][a-zA-Z0-9]{0,14}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn capitalize_and_decapitalize_round_trip_on_the_first_char(s in arb_identifier()) {
        let cap = capitalize_first(&s);
        prop_assert_eq!(capitalize_first(&cap), cap.clone());
        prop_assert_eq!(decapitalize(&decapitalize(&s)), decapitalize(&s));
        // Only the first character changes.
        prop_assert_eq!(&cap[1..], &s[1..]);
    }

    #[test]
    fn singularize_is_idempotent_modulo_trailing_s(s in arb_identifier()) {
        // A singularized name never ends in a bare plural `s` that another
        // pass would strip differently than the first did.
        let once = singularize(&s);
        let twice = singularize(&once);
        prop_assert_eq!(singularize(&twice), twice.clone());
    }

    #[test]
    fn singularize_preserves_leading_case(s in arb_identifier()) {
        let out = singularize(&s);
        prop_assert!(!out.is_empty());
        prop_assert_eq!(
            s.chars().next().unwrap().is_uppercase(),
            out.chars().next().unwrap().is_uppercase()
        );
    }
}

#[test]
fn known_method_name_fragments() {
    for (plural, singular) in [
        ("Items", "Item"),
        ("Properties", "Property"),
        ("Boxes", "Box"),
        ("Branches", "Branch"),
        ("Classes", "Class"),
        ("Children", "Child"),
        ("Status", "Status"),
        ("Address", "Address"),
        ("Data", "Data"),
    ] {
        assert_eq!(singularize(plural), singular, "{plural}");
    }
}
