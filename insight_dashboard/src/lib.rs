//! # Insight Dashboard
//!
//! Terminal front end for [`forecast_insight`]: loads the forecast table named
//! in the settings, computes every metric and renders it as text, JSON, a
//! downloadable insight report or chart-data CSV files.

pub mod cli;
pub mod commands;
pub mod render;
pub mod settings;

pub use settings::{ConfigError, Settings};
