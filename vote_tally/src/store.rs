//! Storage of tallies, keyed by vote identifier.
//!
//! Ballots for the same vote may arrive from the bulk import and from live
//! voting at the same time. Every update to a vote goes through
//! [`TallyRepository::update`], which holds the lock of that vote for the whole
//! read-increment-write. Different votes do not share a lock.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use log::{debug, info};
use snafu::ensure;

pub use crate::config::*;

/// The persistence collaborator of the tallies.
pub trait TallyRepository {
    fn load(&self, vote_id: &str) -> Option<VoteTally>;

    /// Replaces the stored tally of a vote.
    fn save(&self, vote_id: &str, tally: VoteTally);

    /// Applies `f` to the tally of a vote (an empty one on first use) while no
    /// other writer can touch it, then recomputes the percentages.
    ///
    /// Returns the tally as stored.
    fn update(
        &self,
        vote_id: &str,
        f: &mut dyn FnMut(&mut VoteTally) -> Result<(), TallyError>,
    ) -> Result<VoteTally, TallyError>;

    fn record_ballot(&self, vote_id: &str, position: Position) -> Result<VoteTally, TallyError> {
        self.update(vote_id, &mut |t| {
            t.record_ballot(position);
            Ok(())
        })
    }

    /// Replaces the tally with a recount of the given ballots.
    fn rebuild(&self, vote_id: &str, ballots: &[Position]) -> Result<VoteTally, TallyError> {
        self.update(vote_id, &mut |t| {
            *t = crate::rebuild_from_ballots(ballots);
            Ok(())
        })
    }
}

#[derive(Debug, Default)]
struct VoteEntry {
    tally: VoteTally,
    // Fingerprints of the visitors who already voted.
    voters: HashSet<String>,
}

/// A tally store kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryTallyStore {
    votes: RwLock<HashMap<String, Arc<Mutex<VoteEntry>>>>,
}

// A poisoned lock only means another writer panicked. The entry itself is
// always left consistent since it is mutated after all fallible steps.
fn lock(entry: &Mutex<VoteEntry>) -> MutexGuard<'_, VoteEntry> {
    entry.lock().unwrap_or_else(|e| e.into_inner())
}

/// The anonymous fingerprint of a visitor for a vote.
pub fn voter_fingerprint(vote_id: &str, voter_key: &str) -> String {
    sha256::digest(format!("{}\u{1f}{}", vote_id, voter_key))
}

impl InMemoryTallyStore {
    pub fn new() -> InMemoryTallyStore {
        InMemoryTallyStore::default()
    }

    fn entry(&self, vote_id: &str) -> Arc<Mutex<VoteEntry>> {
        {
            let votes = self.votes.read().unwrap_or_else(|e| e.into_inner());
            if let Some(e) = votes.get(vote_id) {
                return e.clone();
            }
        }
        let mut votes = self.votes.write().unwrap_or_else(|e| e.into_inner());
        let e = votes.entry(vote_id.to_string()).or_insert_with(|| {
            debug!("entry: new vote {:?}", vote_id);
            Arc::new(Mutex::new(VoteEntry::default()))
        });
        e.clone()
    }

    /// Records the ballot of a visitor, at most once per vote.
    ///
    /// Only a fingerprint of the voter key is kept.
    pub fn cast_shadow_ballot(
        &self,
        vote_id: &str,
        voter_key: &str,
        position: Position,
    ) -> Result<VoteTally, TallyError> {
        let fingerprint = voter_fingerprint(vote_id, voter_key);
        let entry = self.entry(vote_id);
        let mut e = lock(&entry);
        ensure!(
            !e.voters.contains(&fingerprint),
            DuplicateBallotSnafu { vote_id }
        );
        e.voters.insert(fingerprint);
        e.tally.record_ballot(position);
        e.tally.recompute_percentages();
        Ok(e.tally.clone())
    }

    pub fn has_voted(&self, vote_id: &str, voter_key: &str) -> bool {
        let votes = self.votes.read().unwrap_or_else(|e| e.into_inner());
        let voted = match votes.get(vote_id) {
            Some(entry) => lock(entry)
                .voters
                .contains(&voter_fingerprint(vote_id, voter_key)),
            None => false,
        };
        voted
    }

    /// The identifiers of all the votes, sorted.
    pub fn vote_ids(&self) -> Vec<String> {
        let votes = self.votes.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = votes.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl TallyRepository for InMemoryTallyStore {
    fn load(&self, vote_id: &str) -> Option<VoteTally> {
        let votes = self.votes.read().unwrap_or_else(|e| e.into_inner());
        votes.get(vote_id).map(|e| lock(e).tally.clone())
    }

    fn save(&self, vote_id: &str, tally: VoteTally) {
        info!("save: vote {:?}: {} ballots", vote_id, tally.total_votes);
        let entry = self.entry(vote_id);
        lock(&entry).tally = tally;
    }

    fn update(
        &self,
        vote_id: &str,
        f: &mut dyn FnMut(&mut VoteTally) -> Result<(), TallyError>,
    ) -> Result<VoteTally, TallyError> {
        let entry = self.entry(vote_id);
        let mut e = lock(&entry);
        // Work on a copy so that a failure leaves the stored tally untouched.
        let mut tally = e.tally.clone();
        f(&mut tally)?;
        tally.recompute_percentages();
        e.tally = tally.clone();
        Ok(tally)
    }
}
