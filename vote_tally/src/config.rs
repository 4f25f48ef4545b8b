// ********* Input data structures ***********

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// All the positions that can be recorded on a ballot.
///
/// The order of the declaration is significant: `For`, `Against` and `Abstain`
/// is the order in which bars are allocated and ties are broken.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    For,
    Against,
    Abstain,
    /// The member (or visitor) was registered for the vote but did not cast
    /// a ballot. Tracked, but excluded from the percentage base.
    DidNotVote,
}

impl Position {
    /// The three positions that make up the percentage base, in allocation order.
    pub const COUNTED: [Position; 3] = [Position::For, Position::Against, Position::Abstain];

    pub fn label(&self) -> &'static str {
        match self {
            Position::For => "for",
            Position::Against => "against",
            Position::Abstain => "abstain",
            Position::DidNotVote => "did_not_vote",
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Position {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "for" => Ok(Position::For),
            "against" => Ok(Position::Against),
            "abstain" => Ok(Position::Abstain),
            "did_not_vote" => Ok(Position::DidNotVote),
            _ => InvalidPositionSnafu { label: s }.fail(),
        }
    }
}

/// One ballot with its demographic buckets, as cast by a visitor.
///
/// The buckets are free-form: `age -> 25-34`, `region -> north`, etc.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DemographicBallot {
    pub position: Position,
    pub buckets: Vec<(String, String)>,
}

impl DemographicBallot {
    pub fn bucket(&self, dimension: &str) -> Option<&str> {
        self.buckets
            .iter()
            .find(|(dim, _)| dim == dimension)
            .map(|(_, b)| b.as_str())
    }
}

// ******** Output data structures *********

/// Aggregate statistics for one vote.
///
/// `total_votes` only counts the for, against and abstain positions. The
/// percentages are only meaningful after a call to
/// [`VoteTally::recompute_percentages`].
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub total_votes: u64,
    pub for_count: u64,
    pub against_count: u64,
    pub abstain_count: u64,
    pub non_voting_count: u64,
    pub for_pct: u8,
    pub against_pct: u8,
    pub abstain_pct: u8,
}

/// Number of segments given to each position in a fixed-width bar.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarAllocation {
    pub for_segments: u32,
    pub against_segments: u32,
    pub abstain_segments: u32,
}

impl BarAllocation {
    pub fn segments(&self, position: Position) -> u32 {
        match position {
            Position::For => self.for_segments,
            Position::Against => self.against_segments,
            Position::Abstain => self.abstain_segments,
            Position::DidNotVote => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.for_segments + self.against_segments + self.abstain_segments
    }
}

/// A marker in a compressed list of page links.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PageMarker {
    Page(u32),
    Ellipsis,
}

// Pages are written as numbers and the ellipsis as a string, the way page
// links are handed to templates.
impl Serialize for PageMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(p) => serializer.serialize_u32(*p),
            PageMarker::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

impl Display for PageMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageMarker::Page(p) => write!(f, "{}", p),
            PageMarker::Ellipsis => write!(f, "{}", ELLIPSIS),
        }
    }
}

pub const ELLIPSIS: &str = "…";

/// The result of a vote, derived from its tally.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Adopted,
    Rejected,
    Tied,
    NoVotes,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub official: Outcome,
    pub shadow: Outcome,
    pub agrees: bool,
    /// Shadow minus official share of the for position, in percentage points.
    pub for_pct_gap: i16,
}

/// Errors returned by the tally operations.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TallyError {
    #[snafu(display("invalid ballot position {label:?}"))]
    InvalidPosition { label: String },
    #[snafu(display("invalid argument: {message}"))]
    InvalidArgument { message: String },
    #[snafu(display("a ballot was already cast by this voter for vote {vote_id}"))]
    DuplicateBallot { vote_id: String },
}

// ********* Configuration **********

/// The display options for bars and page links.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DisplayRules {
    pub bar_slots: u32,
    pub on_each_side: u32,
    pub per_page: usize,
    pub bar_style: BarStyle,
}

/// The symbols used to render an allocation as text.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BarStyle {
    pub for_symbol: String,
    pub against_symbol: String,
    pub abstain_symbol: String,
}

impl Default for BarStyle {
    fn default() -> Self {
        BarStyle {
            for_symbol: "🟩".to_string(),
            against_symbol: "🟥".to_string(),
            abstain_symbol: "⬜".to_string(),
        }
    }
}

impl DisplayRules {
    pub const DEFAULT_BAR_SLOTS: u32 = 10;
    pub const DEFAULT_ON_EACH_SIDE: u32 = 0;
    pub const DEFAULT_PER_PAGE: usize = 20;
}

impl Default for DisplayRules {
    fn default() -> Self {
        DisplayRules {
            bar_slots: DisplayRules::DEFAULT_BAR_SLOTS,
            on_each_side: DisplayRules::DEFAULT_ON_EACH_SIDE,
            per_page: DisplayRules::DEFAULT_PER_PAGE,
            bar_style: BarStyle::default(),
        }
    }
}
