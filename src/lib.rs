//! # Forecast Insight Workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`insight_math`]: descriptive statistics and rolling-window indicators
//! - [`forecast_insight`]: forecast table loading and the metrics engine
//! - [`insight_dashboard`]: settings, rendering and command handlers of the
//!   `insight-dashboard` binary
//!
//! ## Example
//!
//! ```
//! use forecast_insight_workspace::forecast_insight::sample::{generate, SampleSpec};
//! use forecast_insight_workspace::forecast_insight::metrics::{insight, Trend};
//!
//! let spec = SampleSpec { days: 30, trend: 10.0, noise: 1.0, ..SampleSpec::default() };
//! let table = generate(&spec).unwrap();
//! assert_eq!(insight(&table, 30).unwrap().trend, Trend::Increasing);
//! ```

pub use forecast_insight;
pub use insight_dashboard;
pub use insight_math;
