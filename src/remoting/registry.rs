//! Registry of remote method descriptors.
//!
//! Descriptors are collected by a [`MethodRegistryBuilder`] at startup and
//! frozen into a [`MethodRegistry`]; nothing can be added or changed after
//! `build`.

use std::collections::HashSet;
use std::sync::Arc;

use http::Method;

use crate::auth::scopes::{normalize_scopes, DEFAULT_SCOPE};
use crate::errors::{Error, Result};
use crate::remoting::method::{PrincipalRule, RemoteMethod};

/// Names of the built-in `User` remote methods.
pub mod names {
    pub const CREATE: &str = "create";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const FIND_BY_ID: &str = "findById";
    pub const CREATE_ACCESS_TOKEN: &str = "createAccessToken";
    pub const SCOPED: &str = "scoped";
}

#[derive(Debug, Default)]
pub struct MethodRegistryBuilder {
    methods: Vec<RemoteMethod>,
}

impl MethodRegistryBuilder {
    pub fn register(mut self, method: RemoteMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Validate and freeze the registered methods.
    ///
    /// Rejects duplicate names, duplicate verb/path bindings and invalid
    /// scopes. Empty scope lists are stored as `DEFAULT`.
    pub fn build(self) -> Result<MethodRegistry> {
        let mut names = HashSet::new();
        let mut bindings = HashSet::new();
        let mut frozen = Vec::with_capacity(self.methods.len());

        for mut method in self.methods {
            if !names.insert(method.name().to_string()) {
                return Err(Error::config(format!(
                    "Remote method '{}' is registered twice",
                    method.name()
                )));
            }
            if !bindings.insert((method.verb().clone(), method.path().to_string())) {
                return Err(Error::config(format!(
                    "Remote method '{}' reuses binding {} {}",
                    method.name(),
                    method.verb(),
                    method.path()
                )));
            }

            let mut scopes =
                normalize_scopes(method.access_scopes().iter().cloned()).map_err(|err| {
                    Error::config(format!("Remote method '{}': {}", method.name(), err))
                })?;
            if scopes.is_empty() {
                scopes.push(DEFAULT_SCOPE.to_string());
            }
            method.set_access_scopes(scopes);

            frozen.push(Arc::new(method));
        }

        Ok(MethodRegistry { methods: frozen })
    }
}

/// Immutable table of remote methods, shared across request handlers.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    methods: Vec<Arc<RemoteMethod>>,
}

impl MethodRegistry {
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::default()
    }

    /// Built-in `User` methods, with `scoped` requiring `scoped_scopes`.
    pub fn user_methods<S: AsRef<str>>(scoped_scopes: &[S]) -> Result<Self> {
        Self::builder()
            .register(RemoteMethod::new(names::CREATE, Method::POST, "/users"))
            .register(RemoteMethod::new(names::LOGIN, Method::POST, "/users/login"))
            .register(
                RemoteMethod::new(names::LOGOUT, Method::POST, "/users/logout")
                    .with_principal(PrincipalRule::Authenticated),
            )
            .register(
                RemoteMethod::new(names::FIND_BY_ID, Method::GET, "/users/{id}")
                    .with_principal(PrincipalRule::Owner),
            )
            .register(
                RemoteMethod::new(
                    names::CREATE_ACCESS_TOKEN,
                    Method::POST,
                    "/users/{id}/accessTokens",
                )
                .with_principal(PrincipalRule::Owner),
            )
            .register(
                RemoteMethod::new(names::SCOPED, Method::GET, "/users/scoped")
                    .with_access_scopes(scoped_scopes.iter().map(|s| s.as_ref().to_string()))
                    .with_principal(PrincipalRule::Authenticated),
            )
            .build()
    }

    pub fn get(&self, name: &str) -> Option<Arc<RemoteMethod>> {
        self.methods.iter().find(|method| method.name() == name).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Arc<RemoteMethod>> {
        self.get(name)
            .ok_or_else(|| Error::config(format!("Remote method '{}' is not registered", name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RemoteMethod>> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
