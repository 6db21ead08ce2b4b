//! Route access decisions. The guard is a pure function of the session snapshot
//! and the route's access rule; it keeps no state between navigations.
//! UX-only: real access control lives on the API.

use crate::{
    features::auth::{
        state::SessionSnapshot,
        types::{Role, RoleClaim},
    },
    routes::paths,
};

/// Who may view a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// No session check at all.
    Public,
    /// Login and registration; signed-in users are sent to their home.
    GuestOnly,
    /// Any authenticated session.
    Authenticated,
    /// Authenticated sessions whose role is in the list.
    Roles(&'static [Role]),
    /// `/profile`, which forwards to the role's own profile screen.
    ProfileAlias,
}

/// Outcome of a guard evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Session still initializing; show a neutral placeholder.
    Loading,
    Render,
    Redirect(&'static str),
}

/// Default screen for each role.
#[must_use]
pub const fn canonical_home(role: Role) -> &'static str {
    match role {
        Role::Farmer => paths::FARMER_DASHBOARD,
        Role::Operator => paths::OPERATOR_DASHBOARD,
        Role::Admin => paths::ADMIN_DASHBOARD,
    }
}

/// Home for a role claim; unrecognized roles have none.
#[must_use]
pub const fn home_for(claim: &RoleClaim) -> Option<&'static str> {
    match claim.known() {
        Some(role) => Some(canonical_home(role)),
        None => None,
    }
}

const fn profile_target(role: Role) -> &'static str {
    match role {
        Role::Admin => paths::ADMIN_SETTINGS,
        Role::Operator => paths::OPERATOR_PROFILE,
        Role::Farmer => paths::FARMER_DASHBOARD,
    }
}

/// Decides whether a route renders or where to redirect instead.
#[must_use]
pub fn evaluate(snapshot: &SessionSnapshot, access: Access) -> Decision {
    if access == Access::Public {
        return Decision::Render;
    }
    if snapshot.loading {
        return Decision::Loading;
    }

    let claim = snapshot
        .identity()
        .filter(|_| snapshot.is_authenticated())
        .map(|identity| &identity.role);

    match (access, claim) {
        (Access::Public, _) => Decision::Render,
        (Access::GuestOnly, None) => Decision::Render,
        // An unknown role has nowhere to go, so it stays on the guest screen.
        (Access::GuestOnly, Some(claim)) => {
            home_for(claim).map_or(Decision::Render, Decision::Redirect)
        }
        (_, None) => Decision::Redirect(paths::LOGIN),
        (Access::Authenticated, Some(_)) => Decision::Render,
        (Access::ProfileAlias, Some(claim)) => match claim.known() {
            Some(role) => Decision::Redirect(profile_target(role)),
            None => Decision::Redirect(paths::LOGIN),
        },
        (Access::Roles(allowed), Some(claim)) => match claim.known() {
            Some(role) if allowed.contains(&role) => Decision::Render,
            Some(role) => Decision::Redirect(canonical_home(role)),
            None => Decision::Redirect(paths::LOGIN),
        },
    }
}
