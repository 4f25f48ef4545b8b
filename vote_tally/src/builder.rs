pub use crate::config::*;

use log::debug;

/// A builder for adding ballots.
///
/// Ballots are kept until [`Builder::build`] folds them into a tally, which
/// makes it usable for recounts.
///
/// ```
/// pub use vote_tally::builder::Builder;
/// # use vote_tally::TallyError;
///
/// let mut builder = Builder::new().dimensions(&["age".to_string()]);
///
/// builder.add_ballot_simple("for")?;
/// builder.add_ballot_simple("against")?;
/// builder.add_weighted("for", 2)?;
///
/// let tally = builder.build();
/// assert_eq!(tally.percentages(), [75, 25, 0]);
///
/// # Ok::<(), TallyError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _dimensions: Vec<String>,
    pub(crate) _ballots: Vec<(DemographicBallot, u64)>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// The demographic dimensions kept on the ballots. Anything else is dropped.
    pub fn dimensions(self, dims: &[String]) -> Builder {
        Builder {
            _dimensions: dims.to_vec(),
            _ballots: self._ballots,
        }
    }

    /// Adds one ballot, given by its label.
    pub fn add_ballot_simple(&mut self, label: &str) -> Result<(), TallyError> {
        self.add_weighted(label, 1)
    }

    /// Adds `count` identical ballots, given by their label.
    pub fn add_weighted(&mut self, label: &str, count: u64) -> Result<(), TallyError> {
        let position: Position = label.parse()?;
        self.add_ballot(
            &DemographicBallot {
                position,
                buckets: Vec::new(),
            },
            count,
        );
        Ok(())
    }

    /// Adds a ballot with its demographic buckets.
    ///
    /// Buckets of dimensions that were not declared, or with an empty value,
    /// are dropped.
    pub fn add_ballot(&mut self, ballot: &DemographicBallot, count: u64) {
        if count == 0 {
            debug!("add_ballot: skipping ballot with zero weight {:?}", ballot);
            return;
        }
        let buckets: Vec<(String, String)> = ballot
            .buckets
            .iter()
            .filter(|(dim, b)| !b.is_empty() && self._dimensions.contains(dim))
            .cloned()
            .collect();
        self._ballots.push((
            DemographicBallot {
                position: ballot.position,
                buckets,
            },
            count,
        ));
    }

    pub fn len(&self) -> usize {
        self._ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self._ballots.is_empty()
    }

    /// Recounts all the ballots added so far.
    pub fn build(&self) -> VoteTally {
        let mut tally = VoteTally::EMPTY;
        for (ballot, count) in self._ballots.iter() {
            tally.record_ballots(ballot.position, *count);
        }
        tally.recompute_percentages();
        tally
    }

    /// The ballots added so far, with their weights.
    pub fn ballots(&self) -> &[(DemographicBallot, u64)] {
        &self._ballots
    }

    pub fn breakdown(&self) -> crate::breakdown::Breakdown {
        crate::breakdown::breakdown_weighted(&self._ballots, &self._dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo(position: Position, buckets: &[(&str, &str)]) -> DemographicBallot {
        DemographicBallot {
            position,
            buckets: buckets
                .iter()
                .map(|(d, b)| (d.to_string(), b.to_string()))
                .collect(),
        }
    }

    #[test]
    fn weighted_ballots() {
        let mut b = Builder::new();
        b.add_weighted("abstain", 3).unwrap();
        b.add_weighted("did_not_vote", 4).unwrap();
        b.add_weighted("for", 0).unwrap();
        assert_eq!(b.len(), 2);
        let t = b.build();
        assert_eq!(t.total_votes, 3);
        assert_eq!(t.non_voting_count, 4);
        assert_eq!(t.percentages(), [0, 0, 100]);
    }

    #[test]
    fn invalid_label() {
        let mut b = Builder::new();
        assert!(b.add_ballot_simple("nay").is_err());
        assert!(b.is_empty());
    }

    #[test]
    fn undeclared_dimensions_are_dropped() {
        let mut b = Builder::new().dimensions(&["age".to_string()]);
        b.add_ballot(&demo(Position::For, &[("age", "25-34"), ("shoe", "42")]), 2);
        b.add_ballot(&demo(Position::Against, &[("age", "")]), 1);
        let ballots = b.ballots();
        assert_eq!(ballots.len(), 2);
        assert_eq!(ballots[0].0.buckets, vec![("age".to_string(), "25-34".to_string())]);
        assert_eq!(ballots[0].1, 2);
        assert!(ballots[1].0.buckets.is_empty());

        let bd = b.breakdown();
        assert_eq!(bd.len(), 1);
        assert_eq!(bd["age"]["25-34"].for_count, 2);
        assert_eq!(bd["age"]["unknown"].against_count, 1);
    }

    #[test]
    fn heavy_weights_are_kept_as_weights() {
        let mut b = Builder::new().dimensions(&["age".to_string()]);
        b.add_ballot(&demo(Position::For, &[("age", "65+")]), 5_000_000_000);
        b.add_ballot(&demo(Position::Against, &[("age", "65+")]), 5_000_000_000);
        assert_eq!(b.len(), 2);
        assert_eq!(b.build().percentages(), [50, 50, 0]);
        let bd = b.breakdown();
        assert_eq!(bd["age"]["65+"].total_votes, 10_000_000_000);
    }
}
