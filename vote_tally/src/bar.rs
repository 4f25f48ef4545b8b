//! Discretisation of vote percentages into a fixed number of bar segments.
//!
//! ```
//! use vote_tally::bar::{allocate, render};
//! use vote_tally::BarStyle;
//!
//! let bar = allocate([33, 33, 34], 10);
//! assert_eq!(bar.total(), 10);
//! assert_eq!(render(&bar, &BarStyle::default()), "🟩🟩🟩🟥🟥🟥⬜⬜⬜⬜");
//! ```

use log::debug;

pub use crate::config::*;

/// `round(pct / (100 / slots))`, rounding half away from zero.
///
/// Computed as `pct * slots / 100` to stay in exact arithmetic.
fn scaled_blocks(pct: u32, slots: u32) -> u32 {
    let num = pct as u64 * slots as u64;
    ((2 * num + 100) / 200) as u32
}

/// Allocates `slots` segments between the for, against and abstain percentages.
///
/// Each position gets its rounded share in order, capped by what is left. If
/// rounding left some slots unassigned, all of them go to the position with the
/// strictly largest percentage, the first one in order winning ties. With only
/// zeros, everything goes to `for`.
pub fn allocate(percentages: [u8; 3], slots: u32) -> BarAllocation {
    let mut remaining = slots;
    let mut blocks = [0u32; 3];
    for (idx, pct) in percentages.iter().enumerate() {
        let b = scaled_blocks(*pct as u32, slots).min(remaining);
        blocks[idx] = b;
        remaining -= b;
    }

    if remaining > 0 {
        let mut winner = 0;
        for (idx, pct) in percentages.iter().enumerate() {
            if *pct > percentages[winner] {
                winner = idx;
            }
        }
        debug!(
            "allocate: {:?}: {} slots left to {:?}",
            percentages,
            remaining,
            Position::COUNTED[winner]
        );
        blocks[winner] += remaining;
    }

    BarAllocation {
        for_segments: blocks[0],
        against_segments: blocks[1],
        abstain_segments: blocks[2],
    }
}

/// Allocates the bar of a tally.
pub fn allocate_tally(tally: &VoteTally, slots: u32) -> BarAllocation {
    allocate(tally.percentages(), slots)
}

/// Renders an allocation as a string of symbols, in allocation order.
pub fn render(bar: &BarAllocation, style: &BarStyle) -> String {
    let mut s = String::new();
    for position in Position::COUNTED {
        let symbol = match position {
            Position::For => &style.for_symbol,
            Position::Against => &style.against_symbol,
            _ => &style.abstain_symbol,
        };
        s.push_str(&symbol.repeat(bar.segments(position) as usize));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(bar: BarAllocation) -> (u32, u32, u32) {
        (bar.for_segments, bar.against_segments, bar.abstain_segments)
    }

    #[test]
    fn always_sums_to_slots() {
        for f in 0..=100u8 {
            for a in 0..=(100 - f) {
                let b = 100 - f - a;
                assert_eq!(allocate([f, a, b], 10).total(), 10, "{} {} {}", f, a, b);
                assert_eq!(allocate([f, a, b], 7).total(), 7, "{} {} {}", f, a, b);
            }
        }
        // Inputs that do not sum to 100 are fine as well.
        assert_eq!(allocate([100, 100, 100], 10).total(), 10);
        assert_eq!(allocate([4, 4, 4], 10).total(), 10);
    }

    #[test]
    fn zeros_go_to_for() {
        assert_eq!(blocks(allocate([0, 0, 0], 10)), (10, 0, 0));
    }

    #[test]
    fn full_share_in_first_pass() {
        assert_eq!(blocks(allocate([100, 0, 0], 10)), (10, 0, 0));
        assert_eq!(blocks(allocate([0, 100, 0], 10)), (0, 10, 0));
        assert_eq!(blocks(allocate([0, 0, 100], 10)), (0, 0, 10));
    }

    #[test]
    fn remainder_to_strictly_largest() {
        assert_eq!(blocks(allocate([33, 33, 34], 10)), (3, 3, 4));
        // 44 -> 4, 44 -> 4, 12 -> 1: one slot left, tie between for and against.
        assert_eq!(blocks(allocate([44, 44, 12], 10)), (5, 4, 1));
    }

    #[test]
    fn halves_round_up_and_are_capped() {
        // 45 -> 5, 45 -> 5, 10 -> capped at 0.
        assert_eq!(blocks(allocate([45, 45, 10], 10)), (5, 5, 0));
        // 55 -> 6, 35 -> 4, 10 -> 0 left.
        assert_eq!(blocks(allocate([55, 35, 10], 10)), (6, 4, 0));
    }

    #[test]
    fn zero_slots() {
        assert_eq!(blocks(allocate([50, 25, 25], 0)), (0, 0, 0));
    }

    #[test]
    fn render_with_custom_style() {
        let style = BarStyle {
            for_symbol: "+".to_string(),
            against_symbol: "-".to_string(),
            abstain_symbol: ".".to_string(),
        };
        let bar = allocate([60, 30, 10], 10);
        assert_eq!(render(&bar, &style), "++++++---.");
    }

    #[test]
    fn allocate_from_tally() {
        let mut t = VoteTally::EMPTY;
        t.record_ballots(Position::For, 3);
        t.record_ballots(Position::Against, 1);
        t.recompute_percentages();
        assert_eq!(blocks(allocate_tally(&t, 4)), (3, 1, 0));
    }
}
