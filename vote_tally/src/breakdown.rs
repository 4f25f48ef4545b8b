//! Shadow vote results split by demographic bucket.

use std::collections::BTreeMap;

use log::debug;

pub use crate::config::*;

/// The bucket of ballots that carry no value for a dimension.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// dimension -> bucket -> tally, ordered by name.
pub type Breakdown = BTreeMap<String, BTreeMap<String, VoteTally>>;

/// Tallies the ballots of each bucket, for each of the requested dimensions.
///
/// Every ballot is counted exactly once per dimension, so the buckets of a
/// dimension add up to the overall tally.
pub fn breakdown(ballots: &[DemographicBallot], dimensions: &[String]) -> Breakdown {
    fold_buckets(ballots.iter().map(|b| (b, 1)), dimensions)
}

/// Same as [`breakdown`], for ballots that stand for `count` identical ones.
pub fn breakdown_weighted(ballots: &[(DemographicBallot, u64)], dimensions: &[String]) -> Breakdown {
    fold_buckets(ballots.iter().map(|(b, count)| (b, *count)), dimensions)
}

fn fold_buckets<'a, I>(ballots: I, dimensions: &[String]) -> Breakdown
where
    I: Iterator<Item = (&'a DemographicBallot, u64)> + Clone,
{
    let mut res: Breakdown = BTreeMap::new();
    for dimension in dimensions {
        let mut buckets: BTreeMap<String, VoteTally> = BTreeMap::new();
        for (ballot, count) in ballots.clone() {
            let bucket = ballot.bucket(dimension).unwrap_or(UNKNOWN_BUCKET);
            buckets
                .entry(bucket.to_string())
                .or_insert(VoteTally::EMPTY)
                .record_ballots(ballot.position, count);
        }
        for tally in buckets.values_mut() {
            tally.recompute_percentages();
        }
        debug!(
            "breakdown: dimension {:?}: {} buckets",
            dimension,
            buckets.len()
        );
        res.insert(dimension.clone(), buckets);
    }
    res
}
