// Entries of the feed of completed votes. Only the content is built here, the
// XML of the feed is written by the web layer.

use crate::shadow::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub summary: String,
}

fn result_line(label: &str, tally: &VoteTally, bar: &str) -> String {
    if tally.total_votes == 0 {
        return format!("{}: no votes yet", label);
    }
    format!(
        "{}: {} {}% for · {}% against · {}% abstain",
        label, bar, tally.for_pct, tally.against_pct, tally.abstain_pct
    )
}

/// One entry per completed vote, in the order of the summaries.
pub fn feed_entries(summaries: &[VoteSummary]) -> Vec<FeedEntry> {
    summaries
        .iter()
        .filter(|s| s.completed)
        .map(|s| FeedEntry {
            id: s.id.clone(),
            title: s.title.clone(),
            date: s.date.clone(),
            summary: format!(
                "{}\n{}",
                result_line("Parliament", &s.official, &s.official_bar),
                result_line("Visitors", &s.shadow, &s.shadow_bar)
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(f: u64, a: u64, b: u64) -> VoteTally {
        let mut t = VoteTally::EMPTY;
        t.record_ballots(Position::For, f);
        t.record_ballots(Position::Against, a);
        t.record_ballots(Position::Abstain, b);
        t.recompute_percentages();
        t
    }

    fn summary(id: &str, completed: bool, official: VoteTally, shadow: VoteTally) -> VoteSummary {
        let style = BarStyle::default();
        VoteSummary {
            id: id.to_string(),
            title: format!("Vote {}", id),
            date: None,
            completed,
            official_bar: bar::render(&bar::allocate_tally(&official, 10), &style),
            shadow_bar: bar::render(&bar::allocate_tally(&shadow, 10), &style),
            comparison: compare(&official, &shadow),
            duplicates: 0,
            breakdown: Breakdown::new(),
            official,
            shadow,
        }
    }

    #[test]
    fn entries_of_completed_votes() {
        let summaries = vec![
            summary("v1", true, tally(6, 3, 1), VoteTally::EMPTY),
            summary("v2", false, tally(1, 0, 0), tally(1, 0, 0)),
            summary("v3", true, tally(1, 1, 0), tally(0, 1, 0)),
        ];
        let entries = feed_entries(&summaries);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].summary,
            "Parliament: 🟩🟩🟩🟩🟩🟩🟥🟥🟥⬜ 60% for · 30% against · 10% abstain\nVisitors: no votes yet"
        );
        assert_eq!(entries[1].id, "v3");
        assert_eq!(
            entries[1].summary,
            "Parliament: 🟩🟩🟩🟩🟩🟥🟥🟥🟥🟥 50% for · 50% against · 0% abstain\nVisitors: 🟥🟥🟥🟥🟥🟥🟥🟥🟥🟥 0% for · 100% against · 0% abstain"
        );
    }
}
