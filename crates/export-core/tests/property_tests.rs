use export_core::reconcile::PathResolver;
use export_core::slugify;
use export_fs::NormalizedPath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn slugs_are_lowercase_ascii_words(s in "[A-Za-z0-9 &!,.éüß_-]{0,32}") {
        if let Ok(slug) = slugify(&s) {
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }

    #[test]
    fn slugify_is_idempotent(s in "[A-Za-z0-9 &]{1,32}") {
        if let Ok(slug) = slugify(&s) {
            prop_assert_eq!(slugify(&slug).unwrap(), slug);
        }
    }

    #[test]
    fn resolved_paths_stay_inside_the_root(s in "[a-z./]{0,24}") {
        let resolver = PathResolver::new(&NormalizedPath::new("/out"));
        if let Ok(relative) = resolver.resolve(&s) {
            prop_assert!(!relative.is_absolute());
            prop_assert!(relative.as_str().split('/').all(|segment| segment != ".."));
            prop_assert!(resolver.absolute(&relative).starts_with(&NormalizedPath::new("/out")));
        }
    }
}
