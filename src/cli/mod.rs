//! # CLI Module
//!
//! Command implementations behind the `albumdav` binary:
//!
//! - [`auth`] - authorize against Google and persist the refresh token
//! - [`albums`] - list shared (or owned) albums
//! - [`sync`] - copy the media of one shared album into the WebDAV folder
//!
//! Commands return [`crate::Res`]; `main` decides how failures are reported.

mod albums;
mod auth;
mod sync;

use std::path::PathBuf;

pub use albums::albums;
pub use auth::{access_token, auth};
pub use sync::{SyncOptions, SyncReport, run, sync};

/// Locations of the files a command reads or writes.
#[derive(Debug, Clone)]
pub struct Context {
    pub token: PathBuf,
    pub oauth_config: PathBuf,
    pub webdav_config: PathBuf,
}
