use std::collections::BTreeSet;
use std::collections::btree_set;

/// An opaque claim token held by a [`Principal`](crate::Principal),
/// e.g. a role or permission name such as `"admin"` or `"reports:read"`.
///
/// Claims compare by value; the token carries no structure the gate
/// interprets. Ordering exists only so claim sets iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Claim(String);

impl Claim {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Claim {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for Claim {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for Claim {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The distinct claims held by one principal.
///
/// Backed by a `BTreeSet` so iteration order (and therefore `Debug`
/// output and serialized form) is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeSet<Claim>);

impl ClaimSet {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Insert a claim; returns `false` if it was already present.
    pub fn insert(&mut self, claim: impl Into<Claim>) -> bool {
        self.0.insert(claim.into())
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// `true` when every claim in `required` is held. Vacuously `true`
    /// for an empty `required` set.
    #[must_use]
    pub fn contains_all(&self, required: &ClaimSet) -> bool {
        required.0.is_subset(&self.0)
    }

    /// `true` when at least one claim in `required` is held. `false`
    /// for an empty `required` set.
    #[must_use]
    pub fn contains_any(&self, required: &ClaimSet) -> bool {
        !self.0.is_disjoint(&required.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> btree_set::Iter<'_, Claim> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = btree_set::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ClaimSet {
    type Item = Claim;
    type IntoIter = btree_set::IntoIter<Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Into<Claim>> FromIterator<T> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Claim>> Extend<T> for ClaimSet {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}
