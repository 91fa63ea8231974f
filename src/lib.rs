//! Shared Google Photos album to WebDAV synchronizer.
//!
//! This library holds everything the `albumdav` binary needs to copy the
//! media of a shared Google Photos album into a WebDAV folder: the OAuth2
//! authorization flow with its local callback listener, the Photos Library
//! REST client, a small WebDAV client and the sequential sync driver.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `cli` - Command implementations (auth, albums, sync)
//! - `config` - Environment, file locations and JSON configuration files
//! - `error` - The crate error type
//! - `google` - OAuth2 authorizer and Photos Library client
//! - `management` - Persisted token record
//! - `server` - Local HTTP listener lifecycle for the OAuth callback
//! - `types` - Data structures and wire types
//! - `utils` - PKCE helpers, remote listing diff and album selection
//! - `webdav` - WebDAV listing and upload client

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod google;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;
pub mod webdav;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports an [`Error`], so callers
/// can propagate with `?` from the HTTP clients up to the command layer.
///
/// # Example
///
/// ```rust,ignore
/// use albumdav::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints a progress line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// ```rust,ignore
/// info!("Listing shared albums...");
/// info!("Found {} media items", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line prefixed with a green check mark.
///
/// ```rust,ignore
/// success!("Uploaded {} files", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits the process with status 1.
///
/// Only the command layer reaches for this; library code returns
/// [`Error`] instead so the caller decides when a failure is fatal.
///
/// ```rust,ignore
/// error!("Cannot read {}: {}", path.display(), e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for recoverable problems.
///
/// ```rust,ignore
/// warning!("Invalid index, try again.");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
