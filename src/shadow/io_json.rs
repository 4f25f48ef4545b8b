// Reader for the payload of the bulk import.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::shadow::{io_common::parse_position, *};

#[derive(Debug, Clone, Deserialize)]
struct ImportPayload {
    votes: Vec<VoteJs>,
}

#[derive(Debug, Clone, Deserialize)]
struct VoteJs {
    id: String,
    title: Option<String>,
    date: Option<String>,
    completed: Option<bool>,
    #[serde(default)]
    official: Vec<OfficialBallotJs>,
    #[serde(default)]
    shadow: Vec<ShadowBallotJs>,
}

#[derive(Debug, Clone, Deserialize)]
struct OfficialBallotJs {
    member: Option<String>,
    position: String,
    count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ShadowBallotJs {
    voter: Option<String>,
    position: String,
    #[serde(default)]
    demographics: BTreeMap<String, String>,
}

pub fn read_json(path: &str) -> SResult<Vec<ImportedVote>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_json(&contents)
}

pub fn parse_json(contents: &str) -> SResult<Vec<ImportedVote>> {
    let payload: ImportPayload = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;

    let mut res: Vec<ImportedVote> = Vec::new();
    for v in payload.votes {
        let mut vote = ImportedVote::new(&v.id);
        vote.title = v.title;
        vote.date = v.date;
        vote.completed = v.completed;

        for (idx, ob) in v.official.iter().enumerate() {
            let entry = match &ob.member {
                Some(m) => format!("official ballot of {}", m),
                None => format!("official ballot #{}", idx + 1),
            };
            let position = parse_position(&v.id, &ob.position, &entry)?;
            let count = ob.count.unwrap_or(1);
            if count > 0 {
                vote.official.push((position, count));
            }
        }

        for (idx, sb) in v.shadow.iter().enumerate() {
            let entry = format!("shadow ballot #{}", idx + 1);
            let position = parse_position(&v.id, &sb.position, &entry)?;
            let buckets: Vec<(String, String)> = sb
                .demographics
                .iter()
                .filter(|(_, b)| !b.is_empty())
                .map(|(d, b)| (d.clone(), b.clone()))
                .collect();
            vote.shadow.push(ShadowBallot {
                voter: sb.voter.clone(),
                ballot: DemographicBallot { position, buckets },
                weight: 1,
            });
        }

        debug!(
            "parse_json: vote {}: {} official entries, {} shadow ballots",
            vote.id,
            vote.official.len(),
            vote.shadow.len()
        );
        res.push(vote);
    }
    Ok(res)
}
