pub mod auth;
pub mod discover;
pub mod middleware;
pub mod profile;
pub mod projects;
pub mod rest;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the handlers the binary wires into the router.
pub use middleware::require_auth;
pub use rest::dashboard_handler;
