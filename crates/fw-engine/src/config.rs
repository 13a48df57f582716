use chrono::NaiveDate;

/// Configuration for a faction engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the engine's dice.
    pub seed: u64,
    /// Calendar date the session starts on. When set, the engine keeps its
    /// date string in step with advanced days; otherwise the caller sets it.
    pub start_date: Option<NaiveDate>,
    /// News lines included in a faction status.
    pub news_in_status: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_date: None,
            news_in_status: 5,
        }
    }
}

impl EngineConfig {
    /// Set the dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the calendar start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set how many news lines a status shows.
    pub fn with_news_in_status(mut self, n: usize) -> Self {
        self.news_in_status = n;
        self
    }
}
