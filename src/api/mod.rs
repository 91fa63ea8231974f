//! # API Module
//!
//! HTTP handlers mounted on the local listener that receives Google's OAuth
//! redirect. There is a single route, [`callback`], which captures the
//! authorization code and hands it to the waiting authorizer over a one-shot
//! channel.
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use albumdav::api::callback;
//!
//! let app = Router::new()
//!     .route("/auth/google/callback", get(callback))
//!     .layer(Extension(sender));
//! ```

mod callback;

pub use callback::{CodeSender, callback};
