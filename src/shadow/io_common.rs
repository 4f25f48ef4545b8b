use std::path::Path;

use crate::shadow::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// A label for a line of an input file, used in error messages.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

pub fn parse_position(vote_id: &str, label: &str, entry: &str) -> SResult<Position> {
    label.parse::<Position>().context(InvalidBallotSnafu {
        vote_id,
        entry,
    })
}

/// A shadow ballot standing for `count` identical ones, or nothing when the
/// count is zero. A voter key stands for a single ballot.
pub fn weighted_shadow_ballot(
    vote_id: &str,
    entry: &str,
    voter: Option<String>,
    ballot: DemographicBallot,
    count: u64,
) -> SResult<Option<ShadowBallot>> {
    ensure!(
        voter.is_none() || count <= 1,
        WeightedVoterBallotSnafu {
            vote_id,
            entry,
            count
        }
    );
    if count == 0 {
        debug!("weighted_shadow_ballot: {}: skipping ballot with zero weight", entry);
        return Ok(None);
    }
    Ok(Some(ShadowBallot {
        voter,
        ballot,
        weight: count,
    }))
}

/// Appends the votes of another source. Ballots of a vote that appears in
/// several sources are gathered under the first occurrence.
pub fn merge_votes(acc: &mut Vec<ImportedVote>, votes: Vec<ImportedVote>) {
    for v in votes {
        if let Some(existing) = acc.iter_mut().find(|e| e.id == v.id) {
            debug!("merge_votes: merging ballots of vote {}", v.id);
            existing.title = existing.title.take().or(v.title);
            existing.date = existing.date.take().or(v.date);
            existing.completed = existing.completed.or(v.completed);
            existing.official.extend(v.official);
            existing.shadow.extend(v.shadow);
        } else {
            acc.push(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids() {
        let f = make_default_id("/data/imports/votes.csv");
        assert_eq!(f(12), "votes.csv-00000012");
    }

    #[test]
    fn merging_keeps_first_metadata() {
        let mut a = ImportedVote::new("v1");
        a.official = vec![(Position::For, 3)];
        let mut b = ImportedVote::new("v1");
        b.title = Some("Budget".to_string());
        b.official = vec![(Position::Against, 1)];
        let c = ImportedVote::new("v2");

        let mut acc = vec![a];
        merge_votes(&mut acc, vec![b, c]);
        assert_eq!(acc.len(), 2);
        assert_eq!(acc[0].title.as_deref(), Some("Budget"));
        assert_eq!(
            acc[0].official,
            vec![(Position::For, 3), (Position::Against, 1)]
        );
        assert_eq!(acc[1].id, "v2");
    }

    #[test]
    fn weighted_shadow_ballots() {
        let ballot = DemographicBallot {
            position: Position::For,
            buckets: Vec::new(),
        };
        let anonymous = weighted_shadow_ballot("v1", "line 2", None, ballot.clone(), 7).unwrap();
        assert_eq!(anonymous.map(|b| b.weight), Some(7));
        let empty = weighted_shadow_ballot("v1", "line 2", None, ballot.clone(), 0).unwrap();
        assert_eq!(empty, None);
        let single =
            weighted_shadow_ballot("v1", "line 2", Some("abc".to_string()), ballot.clone(), 1)
                .unwrap();
        assert_eq!(single.map(|b| b.weight), Some(1));
        let res = weighted_shadow_ballot("v1", "line 2", Some("abc".to_string()), ballot, 3);
        assert!(matches!(
            res,
            Err(ShadowError::WeightedVoterBallot { count: 3, .. })
        ));
    }

    #[test]
    fn bad_position() {
        let res = parse_position("v1", "yes", "line 3");
        assert!(matches!(res, Err(ShadowError::InvalidBallot { .. })));
    }
}
