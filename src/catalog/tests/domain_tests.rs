//! Domain-focused tests for catalog names and practitioners.

use crate::catalog::domain::{CatalogDomainError, CatalogName, Practitioner};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[case("  Caboclo  ", "Caboclo")]
#[case("Ogã", "Ogã")]
#[case("Exu", "Exu")]
fn catalog_name_trims_valid_input(#[case] raw: &str, #[case] expected: &str) {
    let name = CatalogName::new(raw).expect("valid name");
    assert_eq!(name.as_str(), expected);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case(" X ")]
fn catalog_name_rejects_short_input(#[case] raw: &str) {
    assert_eq!(
        CatalogName::new(raw),
        Err(CatalogDomainError::NameTooShort {
            value: raw.to_owned(),
            minimum: 2,
        })
    );
}

#[rstest]
fn catalog_name_rejects_long_input() {
    let raw = "a".repeat(101);
    assert_eq!(
        CatalogName::new(raw),
        Err(CatalogDomainError::NameTooLong {
            maximum: 100,
            actual: 101,
        })
    );
}

#[rstest]
fn registered_practitioner_starts_active_and_can_be_deactivated() {
    let name = CatalogName::new("Mãe Cida").expect("valid name");
    let mut practitioner = Practitioner::register(name, None, &DefaultClock);

    assert!(practitioner.is_active());
    assert_eq!(practitioner.role_id(), None);

    practitioner.deactivate();
    assert!(!practitioner.is_active());
}
