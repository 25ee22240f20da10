use super::entry::Entry;
use super::entry::Kind;
use super::round::Player;
use crate::Kamas;
use std::collections::BTreeMap;

/// Rolling unclaimed balance: everything paid in minus everything paid out,
/// never negative. Accumulates in i64 so large histories cannot overflow
/// before the clamp.
pub fn carry_over(entries: &[Entry]) -> Kamas {
    let mut incoming = 0i64;
    let mut outgoing = 0i64;
    for entry in entries {
        match entry.kind {
            Kind::Don | Kind::Bonus => incoming += entry.amount as i64,
            Kind::Payout => outgoing += entry.amount as i64,
        }
    }
    (incoming - outgoing).clamp(0, Kamas::MAX as i64) as Kamas
}

/// Total donated per player across all rounds, case-insensitive.
pub fn cumulative_by_player(entries: &[Entry]) -> BTreeMap<Player, Kamas> {
    let mut totals = BTreeMap::<Player, Kamas>::new();
    for entry in entries {
        if entry.kind == Kind::Don {
            totals
                .entry(Player(entry.player.clone()))
                .and_modify(|total| *total = total.saturating_add(entry.amount))
                .or_insert(entry.amount);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono::NaiveDateTime;

    fn ts(s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(20, 0, s)
            .unwrap()
    }

    fn entry(kind: Kind, player: &str, amount: Kamas) -> Entry {
        Entry::new(ts(0), 1, kind, player, amount)
    }

    #[test]
    fn carry_is_incoming_minus_outgoing() {
        let entries = vec![
            entry(Kind::Don, "Alice", 1000),
            entry(Kind::Bonus, crate::BONUS_MARKER, 500),
            entry(Kind::Payout, "Bob", 600),
        ];
        assert_eq!(carry_over(&entries), 900);
    }

    #[test]
    fn carry_never_goes_negative() {
        let entries = vec![
            entry(Kind::Don, "Alice", 100),
            entry(Kind::Payout, "Bob", 5000),
        ];
        assert_eq!(carry_over(&entries), 0);
    }

    #[test]
    fn carry_clamps_at_i32_max() {
        let entries = vec![
            entry(Kind::Don, "Alice", Kamas::MAX),
            entry(Kind::Bonus, crate::BONUS_MARKER, Kamas::MAX),
        ];
        assert_eq!(carry_over(&entries), Kamas::MAX);
    }

    #[test]
    fn empty_history_carries_nothing() {
        assert_eq!(carry_over(&[]), 0);
    }

    #[test]
    fn cumulative_sums_across_rounds_and_casings() {
        let mut alice = entry(Kind::Don, "Alice", 1000);
        alice.round = 1;
        let mut upper = entry(Kind::Don, "ALICE", 250);
        upper.round = 2;
        let bonus = entry(Kind::Bonus, crate::BONUS_MARKER, 9000);
        let totals = cumulative_by_player(&[alice, upper, bonus]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&Player("alice".into())], 1250);
    }
}
