//! AgriGuide dashboard client.
//!
//! A headless model of the AgriGuide farmer dashboard: an in-memory
//! [`dom::Document`] driven by the [`dashboard::Dashboard`] controller, which
//! talks to the backend through [`api::BackendClient`] and persists the
//! language preference in a [`storage::PreferenceStore`].

pub mod api;
pub mod cli;
pub mod config;
pub mod cookies;
pub mod dashboard;
pub mod diagnostics;
pub mod dom;
pub mod languages;
pub mod render;
pub mod storage;
