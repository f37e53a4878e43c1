//! # Bannaly Server
//!
//! HTTP backend for the Bannaly digital library frontend. It serves the book
//! and audio catalogs, the curated video collections, view and like counters,
//! and threaded video comments.
//!
//! The binary loads configuration through `bannaly-config`, wires the
//! services from `bannaly-core` in [`infra::wiring`], starts the background
//! collection load via [`infra::startup::StartupHooks`] and serves the router
//! built by [`create_app`].

pub mod app;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use app::create_app;
pub use infra::app_state::AppState;
