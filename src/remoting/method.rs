//! Remote method descriptors.

use std::fmt;

use http::Method;

use crate::auth::models::{AuthContext, AuthError};
use crate::auth::scopes::{authorize, summarize, DEFAULT_SCOPE};
use crate::domain::UserId;

/// Who may invoke a method once its scopes are satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalRule {
    /// Anonymous callers included.
    Everyone,
    /// Any caller presenting a valid token.
    Authenticated,
    /// Only the user addressed by the `{id}` path segment.
    Owner,
}

impl fmt::Display for PrincipalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PrincipalRule::Everyone => "$everyone",
            PrincipalRule::Authenticated => "$authenticated",
            PrincipalRule::Owner => "$owner",
        };
        f.write_str(label)
    }
}

/// A named operation bound to an HTTP verb and path, guarded by access scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMethod {
    name: String,
    verb: Method,
    path: String,
    access_scopes: Vec<String>,
    principal: PrincipalRule,
}

impl RemoteMethod {
    /// New descriptor requiring `DEFAULT` scope, open to everyone.
    pub fn new(name: impl Into<String>, verb: Method, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verb,
            path: path.into(),
            access_scopes: vec![DEFAULT_SCOPE.to_string()],
            principal: PrincipalRule::Everyone,
        }
    }

    pub fn with_access_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_principal(mut self, principal: PrincipalRule) -> Self {
        self.principal = principal;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verb(&self) -> &Method {
        &self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn access_scopes(&self) -> &[String] {
        &self.access_scopes
    }

    pub fn principal(&self) -> PrincipalRule {
        self.principal
    }

    pub(crate) fn set_access_scopes(&mut self, scopes: Vec<String>) {
        self.access_scopes = scopes;
    }

    /// Decide whether `context` may invoke this method.
    ///
    /// `owner` is the user addressed by the request path, when there is one.
    pub fn check(&self, context: &AuthContext, owner: Option<&UserId>) -> Result<(), AuthError> {
        if !authorize(context.scopes(), &self.access_scopes) {
            return Err(AuthError::InsufficientScope);
        }

        match self.principal {
            PrincipalRule::Everyone => Ok(()),
            PrincipalRule::Authenticated if context.is_authenticated() => Ok(()),
            PrincipalRule::Authenticated => Err(AuthError::NotAuthenticated),
            PrincipalRule::Owner if !context.is_authenticated() => {
                Err(AuthError::NotAuthenticated)
            }
            PrincipalRule::Owner => match owner {
                Some(owner) if context.is_owner(owner) => Ok(()),
                _ => Err(AuthError::NotOwner),
            },
        }
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}) scopes=[{}] principal={}",
            self.name,
            self.verb,
            self.path,
            summarize(&self.access_scopes),
            self.principal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::AccessToken;
    use crate::domain::TokenId;
    use chrono::Utc;

    fn context(user: &str, scopes: &[&str]) -> AuthContext {
        AuthContext::from_token(&AccessToken {
            id: TokenId::new(),
            user_id: UserId::from_str_unchecked(user),
            ttl: 60,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            created: Utc::now(),
        })
    }

    #[test]
    fn defaults_to_default_scope_and_everyone() {
        let method = RemoteMethod::new("ping", Method::GET, "/ping");
        assert_eq!(method.access_scopes(), &[DEFAULT_SCOPE.to_string()]);
        assert_eq!(method.principal(), PrincipalRule::Everyone);
        assert!(method.check(&AuthContext::anonymous(), None).is_ok());
    }

    #[test]
    fn scope_check_runs_before_principal_rule() {
        let method = RemoteMethod::new("scoped", Method::GET, "/users/scoped")
            .with_access_scopes(["read:custom"])
            .with_principal(PrincipalRule::Authenticated);

        assert!(matches!(
            method.check(&AuthContext::anonymous(), None),
            Err(AuthError::InsufficientScope)
        ));
        let denied = method.check(&context("u1", &[]), None);
        assert!(matches!(denied, Err(AuthError::InsufficientScope)));
        assert!(method.check(&context("u1", &["read:custom"]), None).is_ok());
    }

    #[test]
    fn authenticated_rule_rejects_anonymous() {
        let method = RemoteMethod::new("logout", Method::POST, "/users/logout")
            .with_principal(PrincipalRule::Authenticated);
        assert!(matches!(
            method.check(&AuthContext::anonymous(), None),
            Err(AuthError::NotAuthenticated)
        ));
        assert!(method.check(&context("u1", &[]), None).is_ok());
    }

    #[test]
    fn owner_rule_compares_path_user() {
        let method = RemoteMethod::new("findById", Method::GET, "/users/{id}")
            .with_principal(PrincipalRule::Owner);
        let owner = UserId::from_str_unchecked("u1");
        let other = UserId::from_str_unchecked("u2");

        assert!(method.check(&context("u1", &[]), Some(&owner)).is_ok());
        let denied = method.check(&context("u1", &[]), Some(&other));
        assert!(matches!(denied, Err(AuthError::NotOwner)));
        assert!(matches!(method.check(&context("u1", &[]), None), Err(AuthError::NotOwner)));
        assert!(matches!(
            method.check(&AuthContext::anonymous(), Some(&owner)),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn display_summarizes_binding() {
        let method = RemoteMethod::new("scoped", Method::GET, "/users/scoped")
            .with_access_scopes(["read", "write"])
            .with_principal(PrincipalRule::Authenticated);
        assert_eq!(
            method.to_string(),
            "scoped (GET /users/scoped) scopes=[read write] principal=$authenticated"
        );
    }
}
