use uuid::Uuid;

/// The identified party behind an authenticated request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Subject {
    id: Uuid,
    // future: kind (user/service), display name
}

impl Subject {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
