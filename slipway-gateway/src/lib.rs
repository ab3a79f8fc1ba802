//! HTTP server for the Slipway desktop launcher.
//!
//! Serves the static UI and exposes launch / status / stop of the sibling
//! sub-applications tracked by [`slipway_launcher::Registry`].

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod browser;
pub mod error;
pub mod routes;
