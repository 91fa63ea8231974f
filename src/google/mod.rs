//! # Google integration
//!
//! - [`auth`] - OAuth2 authorization code flow (with PKCE) and refresh-token
//!   exchange against Google's token endpoint.
//! - [`photos`] - Photos Library REST client: album and shared album listing,
//!   album media search and media download.
//!
//! Both talk to the endpoints in [`crate::config::GoogleEndpoints`], so the
//! whole module can be pointed at a mock server.

pub mod auth;
pub mod photos;
