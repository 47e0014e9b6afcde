//! Test-station monitoring dashboard server.
//!
//! A web application that answers: "which hardware test stations are
//! discoverable right now, and can I reach them?"

pub mod cache;
pub mod directory;
pub mod domain;
pub mod probe;
pub mod web;
