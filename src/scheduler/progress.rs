use serde::Serialize;

use super::Status;

/// Number of cards in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub to_learn: u64,
    pub once_checked: u64,
    pub twice_checked: u64,
    pub fully_memorized: u64,
}

impl StatusCounts {
    pub fn add(&mut self, status: Status, n: u64) {
        match status {
            Status::ToLearn => self.to_learn += n,
            Status::OnceChecked => self.once_checked += n,
            Status::TwiceChecked => self.twice_checked += n,
            Status::FullyMemorized => self.fully_memorized += n,
        }
    }

    pub fn get(&self, status: Status) -> u64 {
        match status {
            Status::ToLearn => self.to_learn,
            Status::OnceChecked => self.once_checked,
            Status::TwiceChecked => self.twice_checked,
            Status::FullyMemorized => self.fully_memorized,
        }
    }

    pub fn total(&self) -> u64 {
        Status::ALL.into_iter().map(|s| self.get(s)).sum()
    }

    /// Overall learning progress in `[0, 1]`: each card contributes the
    /// fraction of the three reviews it has completed.
    pub fn progress(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let max_rank = f64::from(Status::FullyMemorized.rank());
        let done: f64 = Status::ALL
            .into_iter()
            .map(|s| self.get(s) as f64 * f64::from(s.rank()) / max_rank)
            .sum();
        done / total as f64
    }
}

impl FromIterator<Status> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.add(status, 1);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_deck_has_no_progress() {
        let counts = StatusCounts::default();
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.progress(), 0.0);
    }

    #[test]
    fn progress_weights_each_status() {
        let counts: StatusCounts = [
            Status::ToLearn,
            Status::OnceChecked,
            Status::TwiceChecked,
            Status::FullyMemorized,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.total(), 4);
        // (0 + 1/3 + 2/3 + 1) / 4
        assert!((counts.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn fully_memorized_deck_is_complete() {
        let mut counts = StatusCounts::default();
        counts.add(Status::FullyMemorized, 7);
        assert_eq!(counts.get(Status::FullyMemorized), 7);
        assert!((counts.progress() - 1.0).abs() < 1e-9);
    }
}
