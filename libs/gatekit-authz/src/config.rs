use crate::table::{PolicyTable, RegistrationError};
use gatekit_security::AccessPolicy;
use http::Method;
use serde::{Deserialize, Serialize};

/// Declarative gate configuration.
///
/// Covers everything but validated policies, which carry arbitrary code
/// and are registered through [`PolicyTable::builder`] instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Policies for exact method and path pairs
    #[serde(default)]
    pub routes: Vec<RouteRule>,

    /// Policies for whole path prefixes
    #[serde(default)]
    pub scopes: Vec<ScopeRule>,
}

impl GateConfig {
    /// Validate the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns the first registration failure among the declared rules.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        build_policy_table(self).map(|_| ())
    }
}

/// One exact-route policy declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRule {
    /// HTTP method, case-insensitive
    pub method: String,
    pub path: String,
    pub policy: PolicySpec,
}

/// One path-prefix policy declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRule {
    pub prefix: String,
    pub policy: PolicySpec,
}

/// Declarable policy variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicySpec {
    None,
    Authenticated,
    AllClaims {
        #[serde(default)]
        claims: Vec<String>,
    },
    AnyClaim {
        #[serde(default)]
        claims: Vec<String>,
    },
}

impl PolicySpec {
    #[must_use]
    pub fn to_policy(&self) -> AccessPolicy {
        match self {
            Self::None => AccessPolicy::None,
            Self::Authenticated => AccessPolicy::Authenticated,
            Self::AllClaims { claims } => {
                AccessPolicy::require_all(claims.iter().map(String::as_str))
            }
            Self::AnyClaim { claims } => {
                AccessPolicy::require_any(claims.iter().map(String::as_str))
            }
        }
    }
}

/// Build a [`PolicyTable`] from configuration.
///
/// # Errors
///
/// Returns the first registration failure among the declared rules, so a
/// bad rule is caught at startup rather than at request time.
pub fn build_policy_table(config: &GateConfig) -> Result<PolicyTable, RegistrationError> {
    let mut builder = PolicyTable::builder();

    for rule in &config.routes {
        let method = parse_method(&rule.method)?;
        builder = builder.route(method, rule.path.clone(), rule.policy.to_policy())?;
    }

    for rule in &config.scopes {
        builder = builder.scope(rule.prefix.clone(), rule.policy.to_policy())?;
    }

    Ok(builder.build())
}

fn parse_method(raw: &str) -> Result<Method, RegistrationError> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .map_err(|_| RegistrationError::InvalidMethod(raw.to_owned()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_config_declares_nothing() {
        let config = GateConfig::default();
        assert!(config.routes.is_empty());
        assert!(config.scopes.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn policy_specs_parse_from_tagged_json() {
        let spec: PolicySpec = serde_json::from_str(r#"{"type": "none"}"#).unwrap();
        assert!(matches!(spec, PolicySpec::None));

        let spec: PolicySpec = serde_json::from_str(r#"{"type": "authenticated"}"#).unwrap();
        assert!(matches!(spec, PolicySpec::Authenticated));

        let spec: PolicySpec =
            serde_json::from_str(r#"{"type": "all_claims", "claims": ["test", "test2"]}"#).unwrap();
        assert!(matches!(spec, PolicySpec::AllClaims { ref claims } if claims.len() == 2));

        let spec: PolicySpec =
            serde_json::from_str(r#"{"type": "any_claim", "claims": ["test3"]}"#).unwrap();
        assert!(matches!(spec, PolicySpec::AnyClaim { ref claims } if claims.len() == 1));
    }

    #[test]
    fn specs_lower_to_policies() {
        assert!(matches!(PolicySpec::None.to_policy(), AccessPolicy::None));
        assert!(matches!(
            PolicySpec::Authenticated.to_policy(),
            AccessPolicy::Authenticated
        ));

        let spec = PolicySpec::AllClaims {
            claims: vec!["test".to_owned()],
        };
        let AccessPolicy::AllClaims(claims) = spec.to_policy() else {
            panic!("expected an all-claims policy");
        };
        assert!(claims.contains("test"));
    }

    #[test]
    fn methods_parse_case_insensitively() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("DELETE").unwrap(), Method::DELETE);
        assert!(parse_method("").is_err());
    }
}
