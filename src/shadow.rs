use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use vote_tally::bar;
use vote_tally::breakdown::Breakdown;
use vote_tally::builder::Builder;
use vote_tally::pagination;
use vote_tally::store::{InMemoryTallyStore, TallyRepository};
use vote_tally::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::shadow::config_reader::*;

mod config_reader;
mod feed;
mod io_common;
mod io_csv;
mod io_json;

pub use config_reader::DisplayOverrides;

#[derive(Debug, Snafu)]
pub enum ShadowError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Missing column {column} in {path}"))]
    CsvMissingColumn { column: String, path: String },
    #[snafu(display("Line {lineno}: unknown ballot source {value:?}, expected official or shadow"))]
    InvalidSource { lineno: usize, value: String },
    #[snafu(display("Line {lineno}: invalid ballot count {value:?}"))]
    InvalidCount { lineno: usize, value: String },
    #[snafu(display("Vote {vote_id} ({entry}): a ballot with a voter key cannot count {count} times"))]
    WeightedVoterBallot {
        vote_id: String,
        entry: String,
        count: u64,
    },
    #[snafu(display("Vote {vote_id} ({entry}): {source}"))]
    InvalidBallot {
        source: TallyError,
        vote_id: String,
        entry: String,
    },
    #[snafu(display("Vote listing: {source}"))]
    Listing { source: TallyError },
    #[snafu(display("Provider not implemented: {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SResult<T> = Result<T, ShadowError>;

/// A ballot cast by a visitor, as read by the importers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ShadowBallot {
    /// The (already anonymous) key of the visitor, if the pipeline provides one.
    pub voter: Option<String>,
    pub ballot: DemographicBallot,
    /// The number of identical ballots this entry stands for. Always 1 when
    /// there is a voter key.
    pub weight: u64,
}

/// A vote, as read by the importers.
/// This is before any counting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ImportedVote {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub completed: Option<bool>,
    /// The ballots of the members of parliament, with their weights.
    pub official: Vec<(Position, u64)>,
    pub shadow: Vec<ShadowBallot>,
}

impl ImportedVote {
    pub fn new(id: &str) -> ImportedVote {
        ImportedVote {
            id: id.to_string(),
            title: None,
            date: None,
            completed: None,
            official: Vec::new(),
            shadow: Vec::new(),
        }
    }

    /// Votes are completed once the official result is known, unless the
    /// import says otherwise.
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(!self.official.is_empty())
    }
}

/// Everything computed for one vote.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub completed: bool,
    pub official: VoteTally,
    pub shadow: VoteTally,
    pub official_bar: String,
    pub shadow_bar: String,
    pub comparison: Comparison,
    /// Shadow ballots that were not counted because the voter already voted.
    pub duplicates: u64,
    pub breakdown: Breakdown,
}

fn shadow_key(vote_id: &str) -> String {
    format!("{}/shadow", vote_id)
}

/// Counts the ballots of one vote into the store and summarises them.
fn tally_vote(
    vote: &ImportedVote,
    store: &InMemoryTallyStore,
    dimensions: &[String],
    rules: &DisplayRules,
) -> SResult<VoteSummary> {
    let mut official_builder = Builder::new();
    for (position, count) in vote.official.iter() {
        official_builder.add_ballot(
            &DemographicBallot {
                position: *position,
                buckets: Vec::new(),
            },
            *count,
        );
    }
    let official = official_builder.build();

    let key = shadow_key(&vote.id);
    let mut shadow_builder = Builder::new().dimensions(dimensions);
    let mut duplicates: u64 = 0;
    for sb in vote.shadow.iter() {
        let position = sb.ballot.position;
        let res = match &sb.voter {
            Some(voter) => store
                .cast_shadow_ballot(&key, voter, position)
                .map(|_| 1),
            None => store
                .update(&key, &mut |t| {
                    t.record_ballots(position, sb.weight);
                    Ok(())
                })
                .map(|_| sb.weight),
        };
        match res {
            Ok(weight) => shadow_builder.add_ballot(&sb.ballot, weight),
            Err(TallyError::DuplicateBallot { .. }) => {
                warn!(
                    "tally_vote: vote {}: skipping duplicate ballot of voter {:?}",
                    vote.id, sb.voter
                );
                duplicates += 1;
            }
            Err(e) => {
                return Err(e).context(InvalidBallotSnafu {
                    vote_id: vote.id.clone(),
                    entry: "shadow ballot",
                })
            }
        }
    }
    let shadow = store.load(&key).unwrap_or(VoteTally::EMPTY);
    debug!(
        "tally_vote: vote {}: official {:?} shadow {:?}",
        vote.id, official, shadow
    );

    let render = |t: &VoteTally| {
        bar::render(&bar::allocate_tally(t, rules.bar_slots), &rules.bar_style)
    };
    Ok(VoteSummary {
        id: vote.id.clone(),
        title: vote.title.clone().unwrap_or_else(|| vote.id.clone()),
        date: vote.date.clone(),
        completed: vote.is_completed(),
        official_bar: render(&official),
        shadow_bar: render(&shadow),
        comparison: compare(&official, &shadow),
        duplicates,
        breakdown: shadow_builder.breakdown(),
        official,
        shadow,
    })
}

/// Newest first; votes without a date come last. Ties are broken by id.
fn sort_summaries(summaries: &mut [VoteSummary]) {
    summaries.sort_by(|a, b| match (&a.date, &b.date) {
        (Some(da), Some(db)) => db.cmp(da).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}

/// Builds the summary document for the given page of the listing.
pub fn build_summary_js(
    config: &ReportConfig,
    votes: &[ImportedVote],
    page: u32,
    rules: &DisplayRules,
) -> SResult<JSValue> {
    let store = InMemoryTallyStore::new();
    let dimensions = config.demographics();
    let mut summaries: Vec<VoteSummary> = Vec::new();
    for vote in votes {
        summaries.push(tally_vote(vote, &store, &dimensions, rules)?);
    }
    sort_summaries(&mut summaries);
    info!(
        "Counted {} votes into {} shadow tallies",
        summaries.len(),
        store.vote_ids().len()
    );

    let last_page = pagination::last_page_for(summaries.len(), rules.per_page).context(ListingSnafu)?;
    let markers = pagination::markers(page, last_page, rules.on_each_side).context(ListingSnafu)?;
    let listed = pagination::page_slice(&summaries, page, rules.per_page).context(ListingSnafu)?;

    let feed = feed::feed_entries(&summaries);

    Ok(json!({
        "config": {
            "feedTitle": config.output_settings.feed_title,
            "barSlots": rules.bar_slots,
            "onEachSide": rules.on_each_side,
            "perPage": rules.per_page,
            "demographics": dimensions,
        },
        "pagination": {
            "page": page,
            "lastPage": last_page,
            "totalVotes": summaries.len(),
            "links": markers,
        },
        "votes": listed,
        "feed": feed,
    }))
}

fn read_import_data(root_path: &Path, source: &ImportSource) -> SResult<Vec<ImportedVote>> {
    let p: PathBuf = root_path.join(&source.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read import file {:?}", p2);
    match source.provider.as_str() {
        "json" => io_json::read_json(&p2),
        "csv" => io_csv::read_csv(&p2),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

fn write_summary(out_path: Option<String>, pretty: &str) -> SResult<()> {
    match out_path.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", pretty);
        }
        Some(path) => {
            info!("Writing summary to {}", path);
            fs::write(path, pretty).context(WritingSummarySnafu { path })?;
        }
    }
    Ok(())
}

pub fn run_report(
    config_path: String,
    check_summary_path: Option<String>,
    out_path: Option<String>,
    overrides: &DisplayOverrides,
) -> SResult<()> {
    let config_p = Path::new(config_path.as_str());
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);

    let rules = config.display_rules(overrides);
    debug!("display rules: {:?}", rules);

    if config.import_sources.is_empty() {
        whatever!("No import sources declared in {}", config_path);
    }

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let mut data: Vec<ImportedVote> = Vec::new();
    for source in config.import_sources.iter() {
        let file_data = read_import_data(root_p, source)?;
        io_common::merge_votes(&mut data, file_data);
    }
    info!("Imported {} votes", data.len());

    let summary_js = build_summary_js(&config, &data, overrides.page.unwrap_or(1), &rules)?;
    let pretty_js_summary = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    write_summary(
        out_path.or_else(|| config.output_settings.output_path.clone()),
        &pretty_js_summary,
    )?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(id: &str, date: Option<&str>, official: &[(Position, u64)]) -> ImportedVote {
        let mut v = ImportedVote::new(id);
        v.date = date.map(|d| d.to_string());
        v.official = official.to_vec();
        v
    }

    fn shadow(voter: Option<&str>, position: Position, age: &str) -> ShadowBallot {
        ShadowBallot {
            voter: voter.map(|s| s.to_string()),
            ballot: DemographicBallot {
                position,
                buckets: vec![("age".to_string(), age.to_string())],
            },
            weight: 1,
        }
    }

    fn config() -> ReportConfig {
        serde_json::from_str(
            r#"{
                "outputSettings": { "feedTitle": "Votes" },
                "importSources": [],
                "demographics": ["age"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn duplicate_shadow_ballots_are_skipped() {
        let mut v = vote("v1", Some("2024-01-01"), &[(Position::For, 2)]);
        v.shadow = vec![
            shadow(Some("a"), Position::Against, "18-24"),
            shadow(Some("a"), Position::For, "18-24"),
            shadow(None, Position::For, "65+"),
            shadow(None, Position::For, "65+"),
        ];
        let store = InMemoryTallyStore::new();
        let s = tally_vote(&v, &store, &["age".to_string()], &DisplayRules::default()).unwrap();
        assert_eq!(s.duplicates, 1);
        assert_eq!(s.shadow.total_votes, 3);
        assert_eq!(s.shadow.percentages(), [67, 33, 0]);
        assert_eq!(s.breakdown["age"]["65+"].for_count, 2);
        assert_eq!(s.breakdown["age"]["18-24"].against_count, 1);
        assert_eq!(s.official_bar, "🟩".repeat(10));
        assert_eq!(s.shadow_bar, format!("{}{}", "🟩".repeat(7), "🟥".repeat(3)));
        assert!(s.comparison.agrees);
        assert!(s.completed);
        // Only the shadow tally is kept in the store.
        assert_eq!(store.vote_ids(), vec!["v1/shadow".to_string()]);
    }

    #[test]
    fn weighted_shadow_rows() {
        let data = "\
vote_id,source,voter,position,count,age
v1,official,,for,3,
v1,shadow,,for,2000000,25-34
v1,shadow,,against,1000000,
v1,shadow,abc,against,1,65+
";
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        let votes = io_csv::parse_csv(rdr, "ballots.csv").unwrap();
        assert_eq!(votes[0].shadow.len(), 3);

        let store = InMemoryTallyStore::new();
        let s = tally_vote(&votes[0], &store, &["age".to_string()], &DisplayRules::default()).unwrap();
        assert_eq!(s.duplicates, 0);
        assert_eq!(s.shadow.for_count, 2_000_000);
        assert_eq!(s.shadow.against_count, 1_000_001);
        assert_eq!(s.shadow.percentages(), [67, 33, 0]);
        assert_eq!(s.breakdown["age"]["25-34"].for_count, 2_000_000);
        assert_eq!(s.breakdown["age"]["unknown"].against_count, 1_000_000);
        assert_eq!(s.breakdown["age"]["65+"].against_count, 1);
        assert!(store.has_voted("v1/shadow", "abc"));
    }

    #[test]
    fn weighted_row_with_voter_is_rejected() {
        let data = "vote_id,source,voter,position,count\nv1,shadow,abc,for,3\n";
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_bytes());
        let res = io_csv::parse_csv(rdr, "ballots.csv");
        match res {
            Err(e @ ShadowError::WeightedVoterBallot { .. }) => assert_eq!(
                e.to_string(),
                "Vote v1 (ballots.csv-00000002): a ballot with a voter key cannot count 3 times"
            ),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn listing_is_newest_first_and_paginated() {
        let votes = vec![
            vote("a", Some("2024-01-01"), &[]),
            vote("b", None, &[]),
            vote("c", Some("2024-03-01"), &[]),
            vote("d", Some("2024-03-01"), &[]),
        ];
        let rules = DisplayRules {
            per_page: 1,
            ..DisplayRules::default()
        };
        let js = build_summary_js(&config(), &votes, 2, &rules).unwrap();
        assert_eq!(js["pagination"]["lastPage"], json!(4));
        assert_eq!(js["pagination"]["links"], json!([1, 2, "…", 4]));
        let listed = js["votes"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], json!("d"));
        // No official ballots: nothing completed, nothing in the feed.
        assert_eq!(js["feed"], json!([]));
    }

    #[test]
    fn page_out_of_range() {
        let votes = vec![vote("a", None, &[])];
        let res = build_summary_js(&config(), &votes, 3, &DisplayRules::default());
        assert!(matches!(res, Err(ShadowError::Listing { .. })));
    }

    fn test_data(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn basic_report_matches_reference() {
        let res = run_report(
            test_data("basic/basic_config.json"),
            Some(test_data("basic/basic_expected_summary.json")),
            Some(std::env::temp_dir()
                .join("shadowvote_basic_summary.json")
                .display()
                .to_string()),
            &DisplayOverrides::default(),
        );
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }

    #[test]
    fn unknown_provider() {
        let res = run_report(
            test_data("bad_provider/bad_provider_config.json"),
            None,
            None,
            &DisplayOverrides::default(),
        );
        assert!(matches!(res, Err(ShadowError::UnknownProvider { .. })));
    }
}
