mod config;
use log::debug;

pub use crate::config::*;

pub mod bar;
pub mod breakdown;
pub mod builder;
pub mod manual;
pub mod pagination;
pub mod store;

/// Divides `num * 100` by `den` and rounds half away from zero.
///
/// Everything is unsigned so rounding half away from zero is rounding half up,
/// which integer arithmetic does exactly.
fn rounded_pct(num: u64, den: u64) -> u8 {
    debug_assert!(den > 0 && num <= den);
    let (num, den) = (num as u128, den as u128);
    ((200 * num + den) / (2 * den)) as u8
}

impl VoteTally {
    pub const EMPTY: VoteTally = VoteTally {
        total_votes: 0,
        for_count: 0,
        against_count: 0,
        abstain_count: 0,
        non_voting_count: 0,
        for_pct: 0,
        against_pct: 0,
        abstain_pct: 0,
    };

    /// Records one ballot.
    ///
    /// `did_not_vote` only moves the non-voting counter: it is not part of the
    /// percentage base. The percentages are not updated.
    pub fn record_ballot(&mut self, position: Position) {
        self.record_ballots(position, 1);
    }

    /// Records `count` identical ballots at once.
    pub fn record_ballots(&mut self, position: Position, count: u64) {
        match position {
            Position::For => self.for_count += count,
            Position::Against => self.against_count += count,
            Position::Abstain => self.abstain_count += count,
            Position::DidNotVote => {
                self.non_voting_count += count;
                return;
            }
        }
        self.total_votes += count;
    }

    /// Records a ballot given by its label, for instance `"against"`.
    pub fn record_label(&mut self, label: &str) -> Result<Position, TallyError> {
        let position: Position = label.parse()?;
        self.record_ballot(position);
        Ok(position)
    }

    /// Derives the three percentages from the counters.
    ///
    /// The abstain share is the residual of the two others, so that the sum is
    /// always 100 when at least one ballot was counted.
    pub fn recompute_percentages(&mut self) {
        if self.total_votes == 0 {
            self.for_pct = 0;
            self.against_pct = 0;
            self.abstain_pct = 0;
            return;
        }
        self.for_pct = rounded_pct(self.for_count, self.total_votes);
        self.against_pct = rounded_pct(self.against_count, self.total_votes);
        // Two halves rounded up may overshoot by one point.
        let rounded = self.for_pct as u16 + self.against_pct as u16;
        if rounded > 100 {
            self.against_pct -= (rounded - 100) as u8;
            self.abstain_pct = 0;
        } else {
            self.abstain_pct = (100 - rounded) as u8;
        }
    }

    pub fn percentage(&self, position: Position) -> u8 {
        match position {
            Position::For => self.for_pct,
            Position::Against => self.against_pct,
            Position::Abstain => self.abstain_pct,
            Position::DidNotVote => 0,
        }
    }

    pub fn count(&self, position: Position) -> u64 {
        match position {
            Position::For => self.for_count,
            Position::Against => self.against_count,
            Position::Abstain => self.abstain_count,
            Position::DidNotVote => self.non_voting_count,
        }
    }

    /// The percentages in allocation order (for, against, abstain).
    pub fn percentages(&self) -> [u8; 3] {
        [self.for_pct, self.against_pct, self.abstain_pct]
    }

    pub fn outcome(&self) -> Outcome {
        if self.total_votes == 0 {
            Outcome::NoVotes
        } else if self.for_count > self.against_count {
            Outcome::Adopted
        } else if self.against_count > self.for_count {
            Outcome::Rejected
        } else {
            Outcome::Tied
        }
    }
}

/// Recounts a tally from scratch.
///
/// The order of the ballots does not matter.
pub fn rebuild_from_ballots<'a, I>(ballots: I) -> VoteTally
where
    I: IntoIterator<Item = &'a Position>,
{
    let mut tally = VoteTally::EMPTY;
    for position in ballots {
        tally.record_ballot(*position);
    }
    tally.recompute_percentages();
    debug!("rebuild_from_ballots: {:?}", tally);
    tally
}

/// Recounts a tally from raw labels. Fails on the first unknown label.
pub fn rebuild_from_labels<S: AsRef<str>>(labels: &[S]) -> Result<VoteTally, TallyError> {
    let positions: Vec<Position> = labels
        .iter()
        .map(|l| l.as_ref().parse::<Position>())
        .collect::<Result<_, _>>()?;
    Ok(rebuild_from_ballots(&positions))
}

/// Compares the outcome of the official vote with the outcome of the shadow vote.
pub fn compare(official: &VoteTally, shadow: &VoteTally) -> Comparison {
    let official_outcome = official.outcome();
    let shadow_outcome = shadow.outcome();
    Comparison {
        official: official_outcome,
        shadow: shadow_outcome,
        agrees: official_outcome == shadow_outcome,
        for_pct_gap: shadow.for_pct as i16 - official.for_pct as i16,
    }
}
