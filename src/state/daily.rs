// src/state/daily.rs
use chrono::NaiveDate;
use tracing::info;

use crate::analysis::scoring;

/// Running protein total for the day against a fixed goal.
#[derive(Debug, Clone)]
pub struct DailyProtein {
    total: f64,
    goal: f64,
    day: NaiveDate,
    reset_at_day_boundary: bool,
}

impl DailyProtein {
    pub fn new(seed: f64, goal: f64, reset_at_day_boundary: bool, today: NaiveDate) -> Self {
        Self {
            total: seed.max(0.0),
            goal,
            day: today,
            reset_at_day_boundary,
        }
    }

    /// Starts a fresh total on a new calendar day when rollover is enabled.
    /// Returns whether a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today == self.day {
            return false;
        }
        self.day = today;
        if !self.reset_at_day_boundary {
            return false;
        }

        info!("New day {today}, resetting daily protein total from {}g", self.total);
        self.total = 0.0;
        true
    }

    pub fn add(&mut self, grams: f64, today: NaiveDate) {
        self.roll_over(today);
        self.total += grams.max(0.0);
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    pub fn progress_percent(&self) -> u32 {
        scoring::progress_percent(self.total, self.goal)
    }

    pub fn progress_fraction(&self) -> f32 {
        scoring::progress_fraction(self.total, self.goal)
    }

    pub fn remaining(&self) -> f64 {
        scoring::remaining(self.total, self.goal)
    }
}
