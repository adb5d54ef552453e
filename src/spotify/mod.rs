//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! recommender: authentication, saved-track retrieval, and batched audio
//! feature lookups. It handles all HTTP communication, OAuth flows, rate
//! limiting, and the partial-failure semantics the feature pipeline relies
//! on.
//!
//! ## Core Modules
//!
//! ### Authentication
//!
//! [`auth`] - OAuth 2.0 PKCE (Proof Key for Code Exchange) flow:
//! - Generates the code verifier/challenge pair
//! - Starts the local callback server and opens the authorization URL
//! - Waits for the callback handler to complete the token exchange
//! - Persists the token through [`crate::management::TokenManager`]
//!
//! ### Saved Tracks
//!
//! [`tracks`] - The user's saved-track library:
//! - Offset pagination over `GET /me/tracks` at a fixed page size
//! - Total-count probe with `limit=1` for status output
//! - Batched `GET /tracks` metadata lookups for display-field fallback
//!
//! ### Audio Features
//!
//! [`features`] - Per-track audio feature vectors:
//! - Partitions track ids into fixed-size chunks, one request per chunk
//! - Bounded retry with a fixed delay on transient failures
//! - Degrades a chunk that exhausts its budget to null-feature rows
//!   instead of aborting the run
//! - The chunk fetcher sits behind the [`features::FeatureSource`] trait so
//!   the partition/retry/degrade logic is testable without network access
//!
//! ### User Profile
//!
//! [`user`] - `GET /me` lookup for the authenticated user's display name.
//!
//! ## Error Handling
//!
//! - 429 Too Many Requests: respects the `Retry-After` header for delays up
//!   to 120 seconds, warns beyond that
//! - 502 Bad Gateway: retried with a 10-second delay on read paths
//! - Expired tokens: refreshed transparently by the token manager with a
//!   4-minute buffer before expiry
//! - Feature-chunk failures: retried a fixed number of times, then reported
//!   with a warning while the run continues with null rows
//!
//! ## API Coverage
//!
//! - `GET /me` - current user profile
//! - `GET /me/tracks` - saved tracks with offset pagination
//! - `GET /tracks` - batch track metadata
//! - `GET /audio-features` - batch audio feature vectors
//! - `POST /api/token` - token exchange and refresh

pub mod auth;
pub mod features;
pub mod tracks;
pub mod user;
