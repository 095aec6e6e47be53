use chrono::NaiveDate;
use shared::error::{AppError, AppResult};

/// A half-open stay interval `[start, end)`; the departure day itself is
/// free again, so back-to-back stays can share a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.end <= self.start {
            return Err(AppError::ValidationError(format!(
                "a stay must end after it starts: {} to {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
