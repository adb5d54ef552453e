//! # CLI Module
//!
//! This module provides the command-line interface layer for the Spotify
//! song recommender. It implements all user-facing commands and coordinates
//! between the Spotify API layer, the token manager, and the similarity
//! computation.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Initiates the Spotify OAuth authentication flow with PKCE
//!   security, replacing any cached token
//!
//! ### Library Operations
//!
//! - [`list_tracks`] - Fetches and displays the user's saved tracks
//!
//! ### Recommendations
//!
//! - [`recommend`] - Runs the full pipeline: saved tracks, chunked audio
//!   feature retrieval with retry and graceful degradation, feature
//!   standardization, and cosine-similarity ranking
//!
//! ### Information Commands
//!
//! - [`info`] - Current-user profile and saved-track count
//!
//! ## Data Flow
//!
//! ```text
//! CLI Layer (user interaction, progress, tables)
//!     ↓
//! Spotify Layer (HTTP, pagination, chunking, retries)
//!     ↓
//! Recommend Layer (join, standardize, rank)
//! ```
//!
//! ## Error Handling Philosophy
//!
//! - Missing or unreadable tokens terminate with a pointer to
//!   `sporeccli auth`
//! - Feature chunks that fail past the retry budget degrade to null rows
//!   with a warning; the run continues
//! - An unmatched query song or an all-null feature table produces a
//!   "no recommendations" warning, never a process failure

mod auth;
mod info;
mod recommend;
mod tracks;

pub use auth::auth;
pub use info::info;
pub use recommend::recommend;
pub use tracks::list_tracks;
