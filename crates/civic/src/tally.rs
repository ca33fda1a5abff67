use crate::models::{Bill, SejmVotingResults};

/// Vote breakdown ready for display: counts as the server reported them,
/// percentages rounded to one decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoteTally {
    pub support: u64,
    pub against: u64,
    pub neutral: u64,
    pub total: u64,
    pub support_pct: f64,
    pub against_pct: f64,
    pub neutral_pct: f64,
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

impl VoteTally {
    /// Build a tally from raw counts, deriving every percentage
    pub fn from_counts(support: u64, against: u64, neutral: u64, total: u64) -> Self {
        Self {
            support,
            against,
            neutral,
            total,
            support_pct: percentage(support, total),
            against_pct: percentage(against, total),
            neutral_pct: percentage(neutral, total),
        }
    }

    /// Citizen votes of a bill; server-provided percentages win over derived ones
    pub fn from_bill(bill: &Bill) -> Self {
        let mut tally = Self::from_counts(
            bill.support_votes,
            bill.against_votes,
            bill.neutral_votes,
            bill.total_votes,
        );
        if tally.total == 0 {
            return tally;
        }
        if let Some(pct) = bill.support_percentage {
            tally.support_pct = pct;
        }
        if let Some(pct) = bill.against_percentage {
            tally.against_pct = pct;
        }
        if let Some(pct) = bill.neutral_percentage {
            tally.neutral_pct = pct;
        }
        tally
    }

    /// Sejm result; abstentions take the neutral slot
    pub fn from_sejm(results: &SejmVotingResults) -> Self {
        let total = if results.total_voted > 0 {
            results.total_voted
        } else {
            results.za + results.przeciw + results.wstrzymali
        };
        Self::from_counts(results.za, results.przeciw, results.wstrzymali, total)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
