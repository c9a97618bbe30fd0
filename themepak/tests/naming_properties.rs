//! Property tests for generated package names.

use std::fs;

use proptest::prelude::*;
use tempfile::TempDir;

use themepak::package::{
    next_sequential_name, unique_name, validate_package_name, PackageType, EXPORT_PREFIX,
};

proptest! {
    #[test]
    fn test_sequential_name_is_one_above_highest(
        numbers in proptest::collection::btree_set(1u32..500, 0..12)
    ) {
        let temp = TempDir::new().unwrap();
        for n in &numbers {
            fs::create_dir_all(temp.path().join(format!("theme_{}.theme", n))).unwrap();
        }
        // Look-alikes that must not count.
        fs::create_dir_all(temp.path().join("theme_999.bg")).unwrap();
        fs::create_dir_all(temp.path().join("mytheme_998.theme")).unwrap();

        let expected = numbers.iter().max().copied().unwrap_or(0) + 1;
        let name = next_sequential_name(temp.path(), EXPORT_PREFIX, PackageType::Theme);
        prop_assert_eq!(name, format!("theme_{}.theme", expected));
    }

    #[test]
    fn test_unique_name_never_collides(
        base in "[A-Za-z][A-Za-z0-9_-]{0,12}",
        taken in 0usize..5
    ) {
        let temp = TempDir::new().unwrap();
        let first = format!("{}.theme", base);
        if taken > 0 {
            fs::create_dir_all(temp.path().join(&first)).unwrap();
        }
        for n in 2..=taken + 1 {
            fs::create_dir_all(temp.path().join(format!("{}_{}.theme", base, n))).unwrap();
        }

        let name = unique_name(temp.path(), &base, PackageType::Theme);
        prop_assert!(!temp.path().join(&name).exists());
        prop_assert!(name.ends_with(".theme"));
        prop_assert!(validate_package_name(&name).is_ok());
        if taken == 0 {
            prop_assert_eq!(name, first);
        }
    }
}
