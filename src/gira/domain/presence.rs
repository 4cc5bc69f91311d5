//! The set of practitioners marked present at a gira.

use crate::catalog::domain::PractitionerId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Practitioners present at a gira. Duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PresenceSet(BTreeSet<PractitionerId>);

impl PresenceSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns `true` if the practitioner is present.
    #[must_use]
    pub fn contains(&self, id: PractitionerId) -> bool {
        self.0.contains(&id)
    }

    /// Returns the number of present practitioners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nobody is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PractitionerId> + '_ {
        self.0.iter().copied()
    }

    /// Returns the identifiers as a vector, in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<PractitionerId> {
        self.iter().collect()
    }
}

impl FromIterator<PractitionerId> for PresenceSet {
    fn from_iter<I: IntoIterator<Item = PractitionerId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
