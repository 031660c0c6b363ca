//! Gemini API client for the Lumiere generation flows.
//!
//! Wraps the two remote operations the flows need — single-round-trip
//! image editing (`generateContent`) and long-running video generation
//! (`predictLongRunning` plus operation polling and an authenticated
//! result download) — behind typed methods on [`client::GeminiClient`].
//! Startup configuration, response wire types, and the async file
//! encoder live alongside it.

pub mod client;
pub mod config;
pub mod encoder;
pub mod types;
