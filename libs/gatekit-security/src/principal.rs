use crate::claim::{Claim, ClaimSet};
use crate::subject::Subject;

/// The requester's identity for the current request.
///
/// A `Principal` is constructed once per request by the host pipeline's
/// authentication step, attached to the request context, and read-only
/// for the remainder of the request. An anonymous principal has no
/// subject and an empty claim set.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<Subject>,
    #[serde(default)]
    claims: ClaimSet,
}

impl Principal {
    /// Create a new `Principal` builder.
    #[must_use]
    pub fn builder() -> PrincipalBuilder {
        PrincipalBuilder::default()
    }

    /// The anonymous principal: no subject, no claims.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            subject: None,
            claims: ClaimSet::new(),
        }
    }

    /// `true` when an authentication step identified a subject.
    ///
    /// Claims attached to a principal without a subject are never
    /// inspected by evaluation: the authentication check runs first.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    #[must_use]
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }
}

#[derive(Default)]
pub struct PrincipalBuilder {
    subject: Option<Subject>,
    claims: ClaimSet,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn claim(mut self, claim: impl Into<Claim>) -> Self {
        self.claims.insert(claim);
        self
    }

    #[must_use]
    pub fn claims<I>(mut self, claims: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Claim>,
    {
        self.claims.extend(claims);
        self
    }

    #[must_use]
    pub fn build(self) -> Principal {
        Principal {
            subject: self.subject,
            claims: self.claims,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn anonymous_has_no_subject_and_no_claims() {
        let principal = Principal::anonymous();
        assert!(!principal.is_authenticated());
        assert!(principal.subject().is_none());
        assert!(principal.claims().is_empty());
    }

    #[test]
    fn builder_full() {
        let id = Uuid::new_v4();
        let principal = Principal::builder()
            .subject(Subject::new(id))
            .claim("test")
            .claims(["test2", "test3"])
            .build();

        assert!(principal.is_authenticated());
        assert_eq!(principal.subject().map(Subject::id), Some(id));
        assert_eq!(principal.claims().len(), 3);
        assert!(principal.claims().contains("test"));
        assert!(principal.claims().contains("test3"));
    }

    #[test]
    fn builder_minimal_is_anonymous() {
        let principal = Principal::builder().build();
        assert!(!principal.is_authenticated());
        assert!(principal.claims().is_empty());
    }

    #[test]
    fn claims_without_subject_stay_unauthenticated() {
        let principal = Principal::builder().claim("test").build();
        assert!(!principal.is_authenticated());
        assert_eq!(principal.claims().len(), 1);
    }

    #[test]
    fn serde_round_trip() {
        let original = Principal::builder()
            .subject(Subject::new(Uuid::new_v4()))
            .claims(["test", "test2"])
            .build();

        let json = serde_json::to_string(&original).unwrap();
        let back: Principal = serde_json::from_str(&json).unwrap();

        assert_eq!(back.subject(), original.subject());
        assert_eq!(back.claims(), original.claims());
    }

    #[test]
    fn anonymous_serializes_without_subject_field() {
        let json = serde_json::to_value(Principal::anonymous()).unwrap();
        assert!(json.get("subject").is_none());
    }
}
