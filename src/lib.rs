//! weatherdash library
//!
//! Exposes the dashboard state, API clients and renderer to the binary and to
//! integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod forecast;
pub mod geolocation;
pub mod refresh;
pub mod service;
pub mod ui;
pub mod units;
