//! # Repo Insight Core
//!
//! Pure pipeline logic for Repo Insight: data models, the remote source
//! abstraction, bounded file selection, context sampling, chunking, the
//! embedding trait, the in-memory vector index, retrieval-augmented
//! queries, and the whole-repository orchestrator.
//!
//! This crate contains no tokio runtime, sqlx, or HTTP client. Every
//! external collaborator (code host, embedder, text generator) is reached
//! through a trait supplied by the application.
//!
//! ```text
//! RemoteSource ─▶ select ─┬─▶ sample ─▶ analyze ─▶ TextGenerator
//!                         └─▶ chunk ─▶ index ─▶ query ─▶ TextGenerator
//! ```

pub mod analyze;
pub mod chunk;
pub mod embedding;
pub mod generation;
pub mod index;
pub mod models;
pub mod prompts;
pub mod query;
pub mod repo;
pub mod sample;
pub mod select;
pub mod source;
