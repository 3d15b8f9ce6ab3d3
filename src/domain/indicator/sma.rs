//! Simple Moving Average over a fixed-size ring buffer.
//!
//! The running sum is updated incrementally with Neumaier compensation so
//! long walks do not accumulate drift. When the whole window holds one
//! repeated value the mean is that value exactly, which keeps a constant
//! price series from producing spurious short/long differences.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
    compensation: f64,
    repeat_run: usize,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        RollingMean {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
            compensation: 0.0,
            repeat_run: 0,
        }
    }

    /// Push the next observation and return the mean once the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.window == 0 {
            return None;
        }

        self.repeat_run = match self.values.back() {
            Some(&prev) if prev == value => self.repeat_run + 1,
            _ => 1,
        };

        self.values.push_back(value);
        self.accumulate(value);
        if self.values.len() > self.window {
            if let Some(evicted) = self.values.pop_front() {
                self.accumulate(-evicted);
            }
        }

        if self.values.len() < self.window {
            return None;
        }
        if self.repeat_run >= self.window {
            return Some(value);
        }
        Some((self.sum + self.compensation) / self.window as f64)
    }

    fn accumulate(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }
}

/// Rolling mean aligned with `values`: `None` until the window is full.
pub fn rolling_means(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut mean = RollingMean::new(window);
    values.iter().map(|&v| mean.push(v)).collect()
}

/// Mean of the last `window` values, or `None` with fewer than `window`.
pub fn simple_moving_average(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let mut mean = RollingMean::new(window);
    values[values.len() - window..]
        .iter()
        .map(|&v| mean.push(v))
        .last()
        .flatten()
}
