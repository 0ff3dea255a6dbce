use gatekit_security::{AccessPolicy, PolicyError};
use http::Method;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while declaring policies, before any request is served.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("route already registered: {method} {path}")]
    DuplicateRoute { method: Method, path: String },

    #[error("scope already registered: {0}")]
    DuplicateScope(String),

    #[error("path must start with '/': {0}")]
    InvalidPath(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Source of declared policies consulted by the route gate.
#[async_trait::async_trait]
pub trait PolicySource: Send + Sync {
    /// Resolve the policy declared for a given method and path.
    async fn resolve(&self, method: &Method, path: &str) -> Option<Arc<AccessPolicy>>;
}

type ScopeEntry = (String, Arc<AccessPolicy>);

/// Immutable policy lookup built once at startup.
///
/// Exact route entries win over scope prefixes, and the longest matching
/// prefix wins among scopes. A miss means the path carries no declared
/// policy.
#[derive(Debug, Default)]
pub struct PolicyTable {
    routes: HashMap<Method, HashMap<String, Arc<AccessPolicy>>>,
    scopes: Vec<ScopeEntry>,
}

impl PolicyTable {
    #[must_use]
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::default()
    }

    /// Look up the policy declared for a concrete method and path.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<Arc<AccessPolicy>> {
        if let Some(policy) = self.routes.get(method).and_then(|by_path| by_path.get(path)) {
            return Some(Arc::clone(policy));
        }

        self.scopes
            .iter()
            .find(|(prefix, _)| scope_matches(prefix, path))
            .map(|(_, policy)| Arc::clone(policy))
    }
}

#[async_trait::async_trait]
impl PolicySource for PolicyTable {
    async fn resolve(&self, method: &Method, path: &str) -> Option<Arc<AccessPolicy>> {
        self.lookup(method, path)
    }
}

/// Fluent registration surface for [`PolicyTable`].
///
/// Malformed declarations are rejected here, at registration time, so a
/// table that builds never errors while serving requests.
#[derive(Debug, Default)]
pub struct PolicyTableBuilder {
    routes: HashMap<Method, HashMap<String, Arc<AccessPolicy>>>,
    scopes: BTreeMap<String, Arc<AccessPolicy>>,
}

impl PolicyTableBuilder {
    /// Declare a policy for one exact method and path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not start with `/`, if the same
    /// method and path were already declared, or if the policy itself is
    /// malformed.
    pub fn route(
        mut self,
        method: Method,
        path: impl Into<String>,
        policy: AccessPolicy,
    ) -> Result<Self, RegistrationError> {
        let path = path.into();
        validate_path(&path)?;
        vet_policy(&policy, &path)?;

        if self
            .routes
            .get(&method)
            .is_some_and(|by_path| by_path.contains_key(&path))
        {
            return Err(RegistrationError::DuplicateRoute { method, path });
        }

        tracing::debug!(method = %method, path = %path, policy = %policy, "Registered route policy");
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Arc::new(policy));
        Ok(self)
    }

    /// Declare a policy for every path under a prefix, any method.
    ///
    /// The prefix matches whole segments only: `/admin` covers `/admin`
    /// and `/admin/users` but not `/administrator`. Trailing slashes are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix does not start with `/`, if the
    /// same prefix was already declared, or if the policy itself is
    /// malformed.
    pub fn scope(
        mut self,
        prefix: impl Into<String>,
        policy: AccessPolicy,
    ) -> Result<Self, RegistrationError> {
        let prefix = normalize_prefix(&prefix.into())?;
        vet_policy(&policy, &prefix)?;

        if self.scopes.contains_key(&prefix) {
            return Err(RegistrationError::DuplicateScope(prefix));
        }

        tracing::debug!(prefix = %prefix, policy = %policy, "Registered scope policy");
        self.scopes.insert(prefix, Arc::new(policy));
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> PolicyTable {
        let route_count: usize = self.routes.values().map(HashMap::len).sum();

        let mut scopes: Vec<ScopeEntry> = self.scopes.into_iter().collect();
        scopes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        tracing::info!(routes = route_count, scopes = scopes.len(), "Policy table built");

        PolicyTable {
            routes: self.routes,
            scopes,
        }
    }
}

fn validate_path(path: &str) -> Result<(), RegistrationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(RegistrationError::InvalidPath(path.to_owned()))
    }
}

fn normalize_prefix(raw: &str) -> Result<String, RegistrationError> {
    validate_path(raw)?;
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_owned())
    } else {
        Ok(trimmed.to_owned())
    }
}

fn vet_policy(policy: &AccessPolicy, entry: &str) -> Result<(), PolicyError> {
    policy.validate()?;
    if let AccessPolicy::AnyClaim(claims) = policy
        && claims.is_empty()
    {
        tracing::warn!(entry = %entry, "Any-claim policy with an empty claim set never authorizes");
    }
    Ok(())
}

/// Segment-aware prefix match: `/admin` covers `/admin` and `/admin/x`,
/// never `/administrator`.
fn scope_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
