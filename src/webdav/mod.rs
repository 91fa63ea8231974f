//! # WebDAV target
//!
//! The remote side of a sync: a flat `PROPFIND` listing of the target folder
//! and one `PUT` per uploaded file, authenticated with HTTP basic auth.

mod client;
mod response;

pub use client::WebDavClient;
pub use response::{Entry, parse_multistatus};
