// Primitives for reading CSV exports of ballots.

use std::io::Read;

use crate::shadow::{
    io_common::{make_default_id, merge_votes, parse_position, weighted_shadow_ballot},
    *,
};

const VOTE_ID: &str = "vote_id";
const SOURCE: &str = "source";
const POSITION: &str = "position";
const VOTER: &str = "voter";
const COUNT: &str = "count";
const TITLE: &str = "title";
const DATE: &str = "date";

// Columns that are not demographic dimensions.
const RESERVED: [&str; 7] = [VOTE_ID, SOURCE, POSITION, VOTER, COUNT, TITLE, DATE];

pub fn read_csv(path: &str) -> SResult<Vec<ImportedVote>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    parse_csv(rdr, path)
}

struct Columns {
    vote_id: usize,
    source: usize,
    position: usize,
    voter: Option<usize>,
    count: Option<usize>,
    title: Option<usize>,
    date: Option<usize>,
    dimensions: Vec<(usize, String)>,
}

fn get_columns(headers: &csv::StringRecord, path: &str) -> SResult<Columns> {
    let find = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        find(name).context(CsvMissingColumnSnafu {
            column: name,
            path,
        })
    };
    let dimensions: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty() && !RESERVED.contains(h))
        .map(|(idx, h)| (idx, h.to_string()))
        .collect();
    Ok(Columns {
        vote_id: required(VOTE_ID)?,
        source: required(SOURCE)?,
        position: required(POSITION)?,
        voter: find(VOTER),
        count: find(COUNT),
        title: find(TITLE),
        date: find(DATE),
        dimensions,
    })
}

fn non_empty(line: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| line.get(i))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn parse_csv<R: Read>(mut rdr: csv::Reader<R>, path: &str) -> SResult<Vec<ImportedVote>> {
    let default_id = make_default_id(path);
    let headers = rdr.headers().context(CsvLineParseSnafu { lineno: 1usize })?.clone();
    let cols = get_columns(&headers, path)?;
    debug!("parse_csv: dimensions: {:?}", cols.dimensions);

    let mut res: Vec<ImportedVote> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is on the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let field = |i: usize| line.get(i).unwrap_or("");

        let vote_id = field(cols.vote_id);
        let mut vote = ImportedVote::new(vote_id);
        vote.title = non_empty(&line, cols.title);
        vote.date = non_empty(&line, cols.date);

        let entry = default_id(lineno);
        let position = parse_position(vote_id, field(cols.position), &entry)?;
        let count: u64 = match non_empty(&line, cols.count) {
            Some(s) => s
                .parse::<u64>()
                .ok()
                .context(InvalidCountSnafu { lineno, value: s })?,
            None => 1,
        };

        match field(cols.source) {
            "official" => {
                if count > 0 {
                    vote.official.push((position, count));
                }
            }
            "shadow" => {
                let buckets: Vec<(String, String)> = cols
                    .dimensions
                    .iter()
                    .filter_map(|(i, dim)| non_empty(&line, Some(*i)).map(|b| (dim.clone(), b)))
                    .collect();
                let voter = non_empty(&line, cols.voter);
                let ballot = DemographicBallot { position, buckets };
                if let Some(sb) = weighted_shadow_ballot(vote_id, &entry, voter, ballot, count)? {
                    vote.shadow.push(sb);
                }
            }
            x => {
                return InvalidSourceSnafu { lineno, value: x }.fail();
            }
        }
        debug!("parse_csv: {}: {:?}", entry, vote);
        merge_votes(&mut res, vec![vote]);
    }
    Ok(res)
}
