//! Text-to-house generation: keyword-driven attribute extraction and a
//! seeded procedural scene composer, served over HTTP.

pub mod api;
pub mod app;
pub mod composer;
pub mod config;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
