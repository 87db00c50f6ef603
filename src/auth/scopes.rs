//! Scope matching for access tokens and remote methods.
//!
//! A token carries a set of granted scopes and every remote method declares the
//! scopes it accepts. The two sets are compared after normalization:
//!
//! - an empty set on either side stands for `{DEFAULT}`,
//! - invocation is authorized when the normalized sets share at least one scope.
//!
//! So a plain login token (no scopes) can call default-scoped methods, a token
//! limited to `read:custom` can only call methods that accept `read:custom`, and
//! a token granted both `DEFAULT` and `read:custom` can call either kind.

use thiserror::Error;

/// Reserved scope representing baseline, unscoped access.
pub const DEFAULT_SCOPE: &str = "DEFAULT";

/// Returned when a scope string cannot be attached to a token or method.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidScope {
    #[error("scope cannot be empty")]
    Empty,
    #[error("scope '{0}' contains whitespace")]
    Whitespace(String),
}

/// Decide whether a caller holding `granted` may invoke a method requiring `required`.
///
/// ```rust
/// use tokenscope::auth::scopes::authorize;
///
/// let none: [&str; 0] = [];
/// assert!(authorize(&none, &["DEFAULT"]));
/// assert!(!authorize(&none, &["read:custom"]));
/// assert!(authorize(&["read", "execute"], &["read", "write"]));
/// assert!(!authorize(&["read:custom"], &none));
/// ```
pub fn authorize<G, R>(granted: &[G], required: &[R]) -> bool
where
    G: AsRef<str>,
    R: AsRef<str>,
{
    let granted_default = granted.is_empty();
    let required_default = required.is_empty();

    match (granted_default, required_default) {
        (true, true) => true,
        (true, false) => required.iter().any(|scope| scope.as_ref() == DEFAULT_SCOPE),
        (false, true) => granted.iter().any(|scope| scope.as_ref() == DEFAULT_SCOPE),
        (false, false) => granted
            .iter()
            .any(|held| required.iter().any(|needed| needed.as_ref() == held.as_ref())),
    }
}

/// Check that a scope is usable as an opaque tag.
pub fn validate_scope(scope: &str) -> Result<(), InvalidScope> {
    if scope.is_empty() {
        return Err(InvalidScope::Empty);
    }
    if scope.chars().any(char::is_whitespace) {
        return Err(InvalidScope::Whitespace(scope.to_string()));
    }
    Ok(())
}

/// Validate and de-duplicate scopes, keeping first-seen order.
pub fn normalize_scopes<I, S>(scopes: I) -> Result<Vec<String>, InvalidScope>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for scope in scopes {
        let scope = scope.into();
        validate_scope(&scope)?;
        if !normalized.contains(&scope) {
            normalized.push(scope);
        }
    }
    Ok(normalized)
}

/// Render a scope list for logs; empty lists show as the implied default.
pub fn summarize<S: AsRef<str>>(scopes: &[S]) -> String {
    if scopes.is_empty() {
        return format!("({})", DEFAULT_SCOPE);
    }
    scopes.iter().map(|scope| scope.as_ref()).collect::<Vec<_>>().join(" ")
}
