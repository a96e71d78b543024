//! kavach-server: HTTP surface for the helmet-compliance service
//!
//! Receives camera uploads on `POST /processImage`, runs the two
//! detection collaborators, counts helmeted and unhelmeted riders via
//! kavach-core, and writes the result to the hosted datastore. All
//! collaborators are injected through [`http::AppState`]; nothing is
//! looked up from process globals.

pub mod config;
pub mod http;
pub mod pipeline;
pub mod store;

pub use config::ServerConfig;
pub use http::{router, AppState};
