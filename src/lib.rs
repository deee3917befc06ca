//! Spotify Timer API Library
//!
//! This library implements the backend of the Spotify Timer application. It
//! brokers the OAuth authorization-code flow against Spotify, relays playback
//! control and search calls on behalf of the browser frontend, and persists
//! per-user timer settings and track positions on disk.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers of the public API
//! - `config` - Configuration management and environment variables
//! - `error` - Service error taxonomy and HTTP response mapping
//! - `management` - On-disk persistence for settings and positions
//! - `server` - Application state, router and HTTP server
//! - `spotify` - Spotify OAuth and Web API client implementation
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use spotitimer::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotitimer::Res<()> {
//!     config::load_env().await?;
//!     let config = config::AppConfig::from_env()?;
//!     let state = server::AppState::new(config.clone());
//!     server::start_api_server(&config.server_address, state).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for startup code using a boxed
/// dynamic error trait object. Request-path errors use the richer
/// [`error::ServiceError`] instead, which carries an HTTP status.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Used for startup and lifecycle messages on the terminal; request-path
/// logging goes through `tracing` instead.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates with exit code 1, so this is reserved for startup failures
/// where continuing makes no sense: broken configuration, an unbindable
/// address, a dead listener.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
