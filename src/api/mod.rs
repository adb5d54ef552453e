//! # API Module
//!
//! HTTP endpoints served by the temporary local server during the OAuth
//! flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth callback from Spotify's authorization
//!   server and completes the PKCE token exchange.
//! - [`health`] - Liveness probe returning application status and version.
//!
//! Built on [Axum](https://docs.rs/axum); each endpoint is an async handler
//! wired up by [`crate::server::start_api_server`]. The callback shares the
//! PKCE verifier with the CLI flow through an `Arc<Mutex<Option<PkceToken>>>`
//! extension.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
