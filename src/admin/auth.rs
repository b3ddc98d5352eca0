//! Authorization predicates and middleware for the admin surface.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// The authenticated principal supplied by the embedding host's
/// authentication layer.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    /// Identity name, absent for principals without an identity.
    pub name: Option<String>,
    pub authenticated: bool,
    pub roles: Vec<String>,
    /// Claim type/value pairs.
    pub claims: Vec<(String, String)>,
}

impl Principal {
    /// Case-insensitive role membership check.
    pub fn is_in_role(&self, role: &str) -> bool {
        let role = role.to_lowercase();
        self.roles.iter().any(|r| r.to_lowercase() == role)
    }

    /// Whether the principal carries the exact claim type/value pair.
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|(t, v)| t == claim_type && v == value)
    }
}

/// Predicate deciding whether a principal may access the admin surface.
pub trait AccessFilter: Send + Sync {
    fn authorize(&self, principal: Option<&Principal>) -> bool;
}

/// Allows all authenticated principals, optionally narrowed to user
/// and/or role allow-lists.
///
/// Lists are comma-separated ("Alice, Bob"), whitespace-trimmed and
/// matched case-insensitively. An empty list places no restriction.
#[derive(Debug, Default)]
pub struct AuthorizationFilter {
    users: Vec<String>,
    roles: Vec<String>,
}

impl AuthorizationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict access to the given comma-separated users. An empty
    /// string removes the restriction.
    pub fn users(mut self, users: &str) -> Self {
        self.users = split_list(users);
        self
    }

    /// Restrict access to the given comma-separated roles.
    pub fn roles(mut self, roles: &str) -> Self {
        self.roles = split_list(roles);
        self
    }
}

impl AccessFilter for AuthorizationFilter {
    fn authorize(&self, principal: Option<&Principal>) -> bool {
        let Some(principal) = principal else {
            return false;
        };

        if !principal.authenticated {
            return false;
        }

        if !self.users.is_empty() {
            let name = principal
                .name
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default();
            if !self.users.contains(&name) {
                return false;
            }
        }

        if !self.roles.is_empty() && !self.roles.iter().any(|role| principal.is_in_role(role)) {
            return false;
        }

        true
    }
}

/// Allows only principals that carry a specific claim type/value pair.
#[derive(Debug)]
pub struct ClaimsFilter {
    claim_type: String,
    value: String,
}

impl ClaimsFilter {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

impl AccessFilter for ClaimsFilter {
    fn authorize(&self, principal: Option<&Principal>) -> bool {
        principal
            .map(|p| p.has_claim(&self.claim_type, &self.value))
            .unwrap_or(false)
    }
}

fn split_list(original: &str) -> Vec<String> {
    original
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Axum middleware guarding admin routes with a shared [`AccessFilter`].
///
/// The authentication layer is expected to place a [`Principal`] in the
/// request extensions; its absence is treated as an anonymous request.
/// The filter itself arrives through extensions as well, so one router
/// layer stack can serve differently-guarded admin surfaces.
pub async fn admin_gate(request: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let filter = request
        .extensions()
        .get::<Arc<dyn AccessFilter>>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .clone();

    let principal = request.extensions().get::<Principal>().cloned();

    if filter.authorize(principal.as_ref()) {
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    fn authenticated(name: &str, roles: &[&str]) -> Principal {
        Principal {
            name: Some(name.to_string()),
            authenticated: true,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            claims: Vec::new(),
        }
    }

    #[test]
    fn denies_missing_principal() {
        let filter = AuthorizationFilter::new();
        assert!(!filter.authorize(None));
    }

    #[test]
    fn denies_unauthenticated_principal() {
        let filter = AuthorizationFilter::new();
        let principal = Principal {
            name: Some("admin".into()),
            authenticated: false,
            ..Principal::default()
        };
        assert!(!filter.authorize(Some(&principal)));
    }

    #[test]
    fn allows_any_authenticated_principal_without_restrictions() {
        let filter = AuthorizationFilter::new();
        assert!(filter.authorize(Some(&authenticated("admin", &[]))));
    }

    #[test]
    fn denies_user_outside_the_allow_list() {
        let filter = AuthorizationFilter::new().users("Admin, Root");
        assert!(!filter.authorize(Some(&authenticated("vasya", &[]))));
    }

    #[test]
    fn allows_user_in_the_allow_list_case_insensitively() {
        let filter = AuthorizationFilter::new().users("Admin, Root");
        assert!(filter.authorize(Some(&authenticated("ROOT", &[]))));
    }

    #[test]
    fn empty_user_list_clears_the_restriction() {
        let filter = AuthorizationFilter::new().users("");
        assert!(filter.authorize(Some(&authenticated("anyone", &[]))));
    }

    #[test]
    fn denies_principal_without_a_listed_role() {
        let filter = AuthorizationFilter::new().roles("staff, admin");
        assert!(!filter.authorize(Some(&authenticated("alice", &["guest"]))));
    }

    #[test]
    fn allows_principal_with_a_listed_role() {
        let filter = AuthorizationFilter::new().roles("staff, admin");
        assert!(filter.authorize(Some(&authenticated("alice", &["Admin"]))));
    }

    #[test]
    fn user_and_role_restrictions_are_conjunctive() {
        let filter = AuthorizationFilter::new().users("alice").roles("admin");
        assert!(filter.authorize(Some(&authenticated("alice", &["admin"]))));
        assert!(!filter.authorize(Some(&authenticated("alice", &["staff"]))));
        assert!(!filter.authorize(Some(&authenticated("bob", &["admin"]))));
    }

    #[test]
    fn claims_filter_requires_the_exact_pair() {
        let filter = ClaimsFilter::new("scope", "admin-ui");
        let mut principal = authenticated("alice", &[]);

        assert!(!filter.authorize(Some(&principal)));
        assert!(!filter.authorize(None));

        principal.claims.push(("scope".into(), "admin-ui".into()));
        assert!(filter.authorize(Some(&principal)));
    }

    fn gated_app() -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .layer(middleware::from_fn(admin_gate))
    }

    fn request_with(
        filter: Arc<dyn AccessFilter>,
        principal: Option<Principal>,
    ) -> Request<Body> {
        let mut builder = Request::builder().uri("/admin").extension(filter);
        if let Some(principal) = principal {
            builder = builder.extension(principal);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn gate_rejects_anonymous_requests() {
        let filter: Arc<dyn AccessFilter> = Arc::new(AuthorizationFilter::new());
        let response = gated_app()
            .oneshot(request_with(filter, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn gate_admits_authorized_principals() {
        let filter: Arc<dyn AccessFilter> = Arc::new(AuthorizationFilter::new().roles("admin"));
        let response = gated_app()
            .oneshot(request_with(filter, Some(authenticated("alice", &["admin"]))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_without_a_filter_is_a_server_error() {
        let response = gated_app()
            .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
