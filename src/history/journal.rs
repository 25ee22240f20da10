use crate::Kamas;
use crate::RoundId;
use crate::ledger::Result;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

const FIELD_SEPARATOR: &str = "\t";
const LIST_SEPARATOR: &str = ",";
const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One spin outcome: who won (if anyone), for how much, and who was on the
/// wheel at the time. The summary line is what operators scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub at: Option<NaiveDateTime>,
    pub summary: String,
    pub winner: Option<String>,
    pub pot: Kamas,
    pub participants: Vec<String>,
    pub round: Option<RoundId>,
}

impl JournalEntry {
    pub fn outcome(
        winner: Option<&str>,
        pot: Kamas,
        participants: &[String],
        round: RoundId,
    ) -> Self {
        let at = crate::ledger::entry::now();
        let summary = match winner {
            Some(winner) => format!(
                "{} - {} wins {} k",
                at.format(TS_FORMAT),
                winner,
                crate::kamas::format(pot.max(0))
            ),
            None => format!("{} - lost, pot carried", at.format(TS_FORMAT)),
        };
        Self {
            at: Some(at),
            summary,
            winner: winner.map(str::to_string),
            pot: pot.max(0),
            participants: participants
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            round: Some(round),
        }
    }

    fn serialize(&self) -> String {
        let ts = self
            .at
            .map(|at| at.format(TS_FORMAT).to_string())
            .unwrap_or_default();
        let participants = self
            .participants
            .iter()
            .map(|p| scrub(p))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);
        [
            ts,
            scrub(&self.summary),
            self.winner.as_deref().map(scrub).unwrap_or_default(),
            self.pot.max(0).to_string(),
            participants,
            self.round.map(|r| r.to_string()).unwrap_or_default(),
        ]
        .join(FIELD_SEPARATOR)
    }

    /// Lenient: journal lines are operator notes, not money, so a line that
    /// lost fields along the way degrades to a summary-only entry instead
    /// of poisoning the whole load.
    fn deserialize(line: &str) -> Self {
        let parts = line.split(FIELD_SEPARATOR).collect::<Vec<_>>();
        if parts.len() == 1 {
            return Self {
                at: parse_ts(parts[0].get(..19).unwrap_or_default()),
                summary: parts[0].to_string(),
                winner: None,
                pot: 0,
                participants: Vec::new(),
                round: None,
            };
        }
        Self {
            at: parse_ts(parts[0]),
            summary: parts
                .get(1)
                .filter(|s| !s.is_empty())
                .unwrap_or(&line)
                .to_string(),
            winner: parts
                .get(2)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            pot: parts
                .get(3)
                .and_then(|s| s.parse::<Kamas>().ok())
                .unwrap_or(0)
                .max(0),
            participants: parts
                .get(4)
                .map(|s| {
                    s.split(LIST_SEPARATOR)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            round: parts.get(5).and_then(|s| s.parse::<RoundId>().ok()),
        }
    }
}

impl Display for JournalEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.summary)
    }
}

fn parse_ts(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT).ok()
}

// free text shares a line with tab-delimited fields; same discipline as the
// ledger codec, strip the delimiters before write
fn scrub(raw: &str) -> String {
    raw.replace(FIELD_SEPARATOR, " ").replace(LIST_SEPARATOR, " ")
}

/// Append-oriented journal of spin outcomes. Not the source of truth for
/// any balance (that is the ledger), so reads fail open like the ledger
/// read path and writes are plain appends.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        let _guard = self.lock.lock();
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.serialize())?;
        Ok(())
    }

    pub fn load(&self) -> Vec<JournalEntry> {
        let _guard = self.lock.lock();
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(JournalEntry::deserialize)
                .collect(),
            Err(err) => {
                log::warn!("unreadable journal {}: {}", self.path.display(), err);
                Vec::new()
            }
        }
    }

    /// Rewrite the whole file, used after the operator prunes entries.
    pub fn save(&self, entries: &[JournalEntry]) -> Result<()> {
        let _guard = self.lock.lock();
        let lines = entries
            .iter()
            .map(JournalEntry::serialize)
            .collect::<Vec<_>>();
        std::fs::write(&self.path, format!("{}\n", lines.join("\n")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn journal(dir: &tempfile::TempDir) -> Journal {
        Journal::new(dir.path().join(crate::JOURNAL_FILE))
    }

    #[test]
    fn outcome_round_trips() {
        let dir = tempdir().unwrap();
        let journal = journal(&dir);
        let won = JournalEntry::outcome(Some("Bob"), 3500, &["Alice".into(), "Bob".into()], 1);
        let lost = JournalEntry::outcome(None, 1000, &["Alice".into()], 2);
        journal.append(&won).unwrap();
        journal.append(&lost).unwrap();
        let loaded = journal.load();
        assert_eq!(loaded, vec![won, lost]);
    }

    #[test]
    fn summary_names_the_winner() {
        let entry = JournalEntry::outcome(Some("Bob"), 3500, &[], 1);
        assert!(entry.summary.contains("Bob wins 3 500 k"));
        let entry = JournalEntry::outcome(None, 3500, &[], 1);
        assert!(entry.summary.contains("lost"));
    }

    #[test]
    fn bare_line_degrades_to_summary_only() {
        let entry = JournalEntry::deserialize("scribbled note from the operator");
        assert_eq!(entry.summary, "scribbled note from the operator");
        assert!(entry.at.is_none());
        assert!(entry.round.is_none());
    }

    #[test]
    fn tabs_in_names_are_scrubbed() {
        let dir = tempdir().unwrap();
        let journal = journal(&dir);
        let entry = JournalEntry::outcome(Some("Bo\tb"), 100, &[], 1);
        journal.append(&entry).unwrap();
        let loaded = journal.load();
        assert_eq!(loaded[0].winner.as_deref(), Some("Bo b"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        assert!(journal(&dir).load().is_empty());
    }

    #[test]
    fn save_rewrites_pruned_entries() {
        let dir = tempdir().unwrap();
        let journal = journal(&dir);
        journal
            .append(&JournalEntry::outcome(Some("Bob"), 100, &[], 1))
            .unwrap();
        journal
            .append(&JournalEntry::outcome(None, 200, &[], 2))
            .unwrap();
        let mut entries = journal.load();
        entries.remove(0);
        journal.save(&entries).unwrap();
        let reloaded = journal.load();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded[0].winner.is_none());
    }
}
