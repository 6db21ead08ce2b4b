//! Auth feature module: the session store, its durable storage, the route access
//! guard and the auth endpoint wrappers. It sits on a security boundary and must
//! avoid logging secrets or token material.
//!
//! Flow Overview: login and registration call the API anonymously and, on
//! success, commit `{user, access_token}` into the session store, which writes
//! both entries through to durable storage. On start the store initializes from
//! those entries before any route is evaluated. Any bearer call rejected with
//! 401 clears the session and navigates to `/login`.

pub mod client;
pub mod guards;
pub mod state;
pub mod storage;
pub mod types;

pub use guards::{canonical_home, evaluate, Access, Decision};
pub use state::{Session, SessionSnapshot, SessionStore};
