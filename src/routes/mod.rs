//! Route table for the client. Each route declares who may view it; the access
//! guard turns that declaration into a render or redirect decision.

mod login;
mod mount;
mod profile;
mod register;

pub use login::{LoginForm, LoginInput};
pub use profile::ProfileForm;
pub use register::{RegisterForm, RegisterInput};

use crate::{
    api::{ApiClient, GENERIC_FAILURE},
    errors::AppError,
    features::auth::{
        guards::{home_for, Access},
        types::{AuthResponse, Identity, Role},
    },
};

/// Outcome of a form submission.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission<T> {
    Completed(T),
    /// The form was unmounted before the response arrived; nothing changed.
    Discarded,
}

/// A committed login or registration.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedIn {
    pub identity: Identity,
    pub redirect: &'static str,
}

/// Commits credentials returned by login or registration and navigates to the
/// role's home. Unrecognized roles land on the public landing page.
fn commit_credentials(api: &ApiClient, response: AuthResponse) -> Result<SignedIn, AppError> {
    let redirect = home_for(&response.user.role).unwrap_or(paths::LANDING);
    api.session()
        .login(response.user.clone(), &response.access_token)?;
    api.navigator().push(redirect);
    Ok(SignedIn {
        identity: response.user,
        redirect,
    })
}

/// Replaces the generic failure text with a screen-specific message.
fn with_fallback(err: AppError, fallback: &str) -> AppError {
    match err {
        AppError::Http { status, message } if message == GENERIC_FAILURE => AppError::Http {
            status,
            message: fallback.to_string(),
        },
        other => other,
    }
}

pub mod paths {
    pub const LANDING: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const PROFILE: &str = "/profile";

    pub const FARMER_DASHBOARD: &str = "/farmer/dashboard";
    pub const FARMER_FIELDS: &str = "/farmer/fields";
    pub const FARMER_SERVICE_REQUESTS: &str = "/farmer/service-requests";
    pub const FARMER_SERVICE_REQUEST_FORM: &str = "/farmer/service-request-form";
    pub const FARMER_NEARBY_OPERATORS: &str = "/farmer/nearby-operators";

    pub const OPERATOR_DASHBOARD: &str = "/operator/dashboard";
    pub const OPERATOR_AVAILABLE_REQUESTS: &str = "/operator/available-requests";
    pub const OPERATOR_ASSIGNED_REQUESTS: &str = "/operator/assigned-requests";
    pub const OPERATOR_PROFILE: &str = "/operator/profile";

    pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
    pub const ADMIN_USERS: &str = "/admin/users";
    pub const ADMIN_USERS_NEW: &str = "/admin/users/new";
    pub const ADMIN_USERS_EDIT: &str = "/admin/users/edit/:userId";
    pub const ADMIN_USERS_FORM: &str = "/admin/users/form";
    pub const ADMIN_REPORTS: &str = "/admin/reports";
    pub const ADMIN_SETTINGS: &str = "/admin/settings";
    pub const ADMIN_SERVICE_REQUESTS: &str = "/admin/service-requests";
}

const FARMER: &[Role] = &[Role::Farmer];
const OPERATOR: &[Role] = &[Role::Operator];
const ADMIN: &[Role] = &[Role::Admin];

/// A route pattern and its access rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: &'static str,
    pub access: Access,
}

const fn route(name: &'static str, pattern: &'static str, access: Access) -> RouteDef {
    RouteDef {
        name,
        pattern,
        access,
    }
}

/// Fallback for unknown paths.
pub const NOT_FOUND: RouteDef = route("not-found", "/*any", Access::Public);

pub const ROUTES: &[RouteDef] = &[
    route("landing", paths::LANDING, Access::Public),
    route("login", paths::LOGIN, Access::GuestOnly),
    route("register", paths::REGISTER, Access::GuestOnly),
    route("profile", paths::PROFILE, Access::ProfileAlias),
    route("farmer-dashboard", paths::FARMER_DASHBOARD, Access::Roles(FARMER)),
    route("farmer-fields", paths::FARMER_FIELDS, Access::Roles(FARMER)),
    route(
        "farmer-service-requests",
        paths::FARMER_SERVICE_REQUESTS,
        Access::Roles(FARMER),
    ),
    route(
        "farmer-service-request-form",
        paths::FARMER_SERVICE_REQUEST_FORM,
        Access::Roles(FARMER),
    ),
    route(
        "farmer-nearby-operators",
        paths::FARMER_NEARBY_OPERATORS,
        Access::Roles(FARMER),
    ),
    route(
        "operator-dashboard",
        paths::OPERATOR_DASHBOARD,
        Access::Roles(OPERATOR),
    ),
    route(
        "operator-available-requests",
        paths::OPERATOR_AVAILABLE_REQUESTS,
        Access::Roles(OPERATOR),
    ),
    route(
        "operator-assigned-requests",
        paths::OPERATOR_ASSIGNED_REQUESTS,
        Access::Roles(OPERATOR),
    ),
    route("operator-profile", paths::OPERATOR_PROFILE, Access::Roles(OPERATOR)),
    route("admin-dashboard", paths::ADMIN_DASHBOARD, Access::Roles(ADMIN)),
    route("admin-users", paths::ADMIN_USERS, Access::Roles(ADMIN)),
    route("admin-user-new", paths::ADMIN_USERS_NEW, Access::Roles(ADMIN)),
    route("admin-user-edit", paths::ADMIN_USERS_EDIT, Access::Roles(ADMIN)),
    route("admin-user-form", paths::ADMIN_USERS_FORM, Access::Roles(ADMIN)),
    route("admin-reports", paths::ADMIN_REPORTS, Access::Roles(ADMIN)),
    route("admin-settings", paths::ADMIN_SETTINGS, Access::Roles(ADMIN)),
    route(
        "admin-service-requests",
        paths::ADMIN_SERVICE_REQUESTS,
        Access::Roles(ADMIN),
    ),
];

/// A path matched against the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route: RouteDef,
    pub path: String,
    pub params: Vec<(&'static str, String)>,
}

impl ResolvedRoute {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Normalizes a location: drops query and fragment, ensures a leading slash and
/// strips trailing slashes.
#[must_use]
pub fn normalize_path(location: &str) -> String {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

/// Resolves a location to its route, falling back to [`NOT_FOUND`].
#[must_use]
pub fn resolve(location: &str) -> ResolvedRoute {
    let path = normalize_path(location);
    for route in ROUTES {
        if let Some(params) = match_pattern(route.pattern, &path) {
            return ResolvedRoute {
                route: *route,
                path,
                params,
            };
        }
    }
    ResolvedRoute {
        route: NOT_FOUND,
        path,
        params: Vec::new(),
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_pattern(pattern: &'static str, path: &str) -> Option<Vec<(&'static str, String)>> {
    let pattern_segments: Vec<&'static str> = segments(pattern).collect();
    let path_segments: Vec<&str> = segments(path).collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.into_iter().zip(path_segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name, actual.to_string()));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}
