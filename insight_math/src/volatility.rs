//! Rolling-window volatility indicator
//!
//! Contains a trailing standard deviation that is updated one observation
//! at a time, in the same fashion as the moving averages it is usually
//! paired with.

use crate::statistics::sample_std_dev;
use crate::{MathError, Result};
use std::collections::VecDeque;

/// Trailing sample standard deviation over a fixed number of observations
#[derive(Debug, Clone)]
pub struct RollingStdDev {
    period: usize,
    values: VecDeque<f64>,
}

impl RollingStdDev {
    /// Create a new rolling standard deviation with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(format!(
                "Period must be at least 2 for a sample standard deviation, got {}",
                period
            )));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Push a new observation into the window
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        // Keep values at period length
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Whether the window holds a full period of observations
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.period
    }

    /// Get the current standard deviation of the window
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data to calculate standard deviation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        let window: Vec<f64> = self.values.iter().copied().collect();
        sample_std_dev(&window).ok_or_else(|| {
            MathError::InsufficientData("Window too small for a standard deviation".to_string())
        })
    }

    /// Push an observation and return the window value when one is defined
    pub fn step(&mut self, value: f64) -> Option<f64> {
        self.update(value);
        self.value().ok()
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the indicator, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}
