use super::entry::Entry;
use super::entry::Kind;
use crate::Kamas;
use crate::RoundId;
use chrono::NaiveDateTime;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Player name ordered and compared without regard to case, so that one
/// donations map slot exists per player however the operator typed the name.
/// The first casing seen is the one kept for display.
#[derive(Debug, Clone, Eq)]
pub struct Player(pub String);

impl Player {
    fn folded(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}
impl PartialOrd for Player {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Player {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded().cmp(&other.folded())
    }
}
impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Materialized view of one round, rebuilt on demand from the entry stream.
/// Never persisted as its own record.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round: RoundId,
    pub at: NaiveDateTime,
    pub donations: BTreeMap<Player, Kamas>,
    pub bonus: Kamas,
    pub winner: Option<String>,
    pub payout: Kamas,
}

impl RoundRecord {
    pub fn pot(&self) -> Kamas {
        self.donations
            .values()
            .fold(self.bonus, |pot, v| pot.saturating_add(*v))
    }

    pub fn has_winner(&self) -> bool {
        self.winner.as_deref().is_some_and(|w| !w.trim().is_empty())
    }
}

impl Display for RoundRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "#{:<4}{}  pot {:>12}",
            self.round,
            self.at.format("%Y-%m-%d %H:%M:%S"),
            format!("{} k", crate::kamas::format(self.pot())),
        )?;
        match &self.winner {
            Some(winner) if self.has_winner() => {
                let reward = format!("+{} k", crate::kamas::format(self.payout)).green();
                write!(f, "  {} {}", winner.as_str().bold(), reward)
            }
            _ => write!(f, "  {}", "carried".red()),
        }
    }
}

/// Per-round fold state. Last write wins everywhere: a snapshot upsert
/// supersedes a round's DON/BONUS set as a whole, so duplicates only appear
/// in degenerate files, and there the most recent entry wins.
#[derive(Debug)]
struct Accumulator {
    round: RoundId,
    at: Option<NaiveDateTime>,
    donations: BTreeMap<Player, Kamas>,
    bonus: Kamas,
    winner: Option<String>,
    payout: Kamas,
}

impl Accumulator {
    fn new(round: RoundId) -> Self {
        Self {
            round,
            at: None,
            donations: BTreeMap::new(),
            bonus: 0,
            winner: None,
            payout: 0,
        }
    }

    fn touch(&mut self, entry: &Entry) {
        if self.at.is_none_or(|at| entry.at > at) {
            self.at = Some(entry.at);
        }
        match entry.kind {
            Kind::Don => {
                self.donations
                    .insert(Player(entry.player.clone()), entry.amount);
            }
            Kind::Bonus => self.bonus = entry.amount,
            Kind::Payout => {
                self.winner = Some(entry.player.clone());
                self.payout = entry.amount;
            }
        }
    }

    fn record(self) -> RoundRecord {
        RoundRecord {
            round: self.round,
            at: self.at.unwrap_or_else(super::entry::now),
            donations: self.donations,
            bonus: self.bonus.max(0),
            winner: self.winner,
            payout: self.payout.max(0),
        }
    }
}

/// Fold the flat entry list into per-round records, ascending by round id.
pub fn aggregate(entries: &[Entry]) -> Vec<RoundRecord> {
    let mut rounds = BTreeMap::<RoundId, Accumulator>::new();
    for entry in entries {
        rounds
            .entry(entry.round)
            .or_insert_with(|| Accumulator::new(entry.round))
            .touch(entry);
    }
    rounds.into_values().map(Accumulator::record).collect()
}

/// The aggregation filtered to a single round id.
pub fn find_round_record(entries: &[Entry], round: RoundId) -> Option<RoundRecord> {
    let entries = entries
        .iter()
        .filter(|e| e.round == round)
        .cloned()
        .collect::<Vec<_>>();
    aggregate(&entries).pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(20, 0, s)
            .unwrap()
    }

    fn don(s: u32, round: RoundId, player: &str, amount: Kamas) -> Entry {
        Entry::new(ts(s), round, Kind::Don, player, amount)
    }

    #[test]
    fn last_don_wins_per_player() {
        let entries = vec![don(0, 1, "Alice", 1000), don(5, 1, "Alice", 2500)];
        let record = find_round_record(&entries, 1).unwrap();
        assert_eq!(record.donations.len(), 1);
        assert_eq!(record.donations[&Player("Alice".into())], 2500);
    }

    #[test]
    fn players_fold_case_insensitively() {
        let entries = vec![don(0, 1, "Alice", 1000), don(5, 1, "ALICE", 700)];
        let record = find_round_record(&entries, 1).unwrap();
        assert_eq!(record.donations.len(), 1);
        assert_eq!(record.donations[&Player("alice".into())], 700);
        assert_eq!(record.donations.keys().next().unwrap().0, "Alice");
    }

    #[test]
    fn pot_sums_donations_and_bonus() {
        let mut entries = vec![don(0, 1, "Alice", 1000), don(1, 1, "Bob", 2000)];
        entries.push(Entry::new(ts(2), 1, Kind::Bonus, crate::BONUS_MARKER, 500));
        let record = find_round_record(&entries, 1).unwrap();
        assert_eq!(record.pot(), 3500);
        assert!(!record.has_winner());
    }

    #[test]
    fn payout_sets_winner() {
        let entries = vec![
            don(0, 1, "Alice", 1000),
            Entry::new(ts(9), 1, Kind::Payout, "Bob", 1000),
        ];
        let record = find_round_record(&entries, 1).unwrap();
        assert!(record.has_winner());
        assert_eq!(record.winner.as_deref(), Some("Bob"));
        assert_eq!(record.payout, 1000);
        assert_eq!(record.at, ts(9));
    }

    #[test]
    fn rounds_come_back_ascending() {
        let entries = vec![don(0, 7, "Alice", 1), don(1, 2, "Bob", 1), don(2, 5, "Eve", 1)];
        let rounds = aggregate(&entries)
            .iter()
            .map(|r| r.round)
            .collect::<Vec<_>>();
        assert_eq!(rounds, vec![2, 5, 7]);
    }

    #[test]
    fn missing_round_is_none() {
        assert!(find_round_record(&[], 4).is_none());
    }
}
