//! ipcompass, a terminal IP location tracker.
//!
//! Resolves your own public IP location and any IPs you look up through a
//! remote geolocation API, plots them on a world-map canvas, and reports
//! the great-circle distance and compass bearing from you to the selected
//! target. See [`geo`] for the distance/bearing math, [`api`] for the
//! remote endpoints, and [`app`] for the UI state machine.

pub mod api;
pub mod app;
pub mod config;
pub mod events;
pub mod geo;
pub mod logging;
pub mod models;
pub mod ui;
