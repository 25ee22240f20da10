use super::entry::Entry;
use super::entry::Kind;
use super::error::Result;
use super::stake::Stake;
use crate::Kamas;
use crate::RoundId;
use parking_lot::Mutex;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// Owner of the on-disk ledger file.
///
/// Single-process, single-writer: every public operation takes the store's
/// mutex once and runs to completion; compound operations go through private
/// lock-free helpers so nothing ever re-enters the lock. A second process
/// touching the same path is undefined behavior.
///
/// Write paths always propagate I/O errors. The read path degrades to an
/// empty list instead (see [`Store::load_all`]).
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with just the header line if it does not exist.
    /// Never touches an existing file.
    pub fn ensure_header(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.header()
    }

    /// All entries, oldest file order. `[]` when the file is missing, and
    /// `[]` with a logged warning when any line fails to read or decode:
    /// a degraded read the caller must tolerate, never a partial one.
    pub fn load_all(&self) -> Vec<Entry> {
        let _guard = self.lock.lock();
        self.load()
    }

    /// Append exactly one PAYOUT line stamped now. Prior entries are never
    /// touched; the file only ever grows through this path.
    pub fn append_payout(&self, round: RoundId, winner: &str, amount: Kamas) -> Result<()> {
        if amount < 0 {
            return Err(super::error::LedgerError::InvalidAmount { amount });
        }
        let _guard = self.lock.lock();
        self.header()?;
        let entry = Entry::new(super::entry::now(), round, Kind::Payout, winner, amount);
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry)?;
        log::info!("payout recorded: round {} -> {} ({})", round, winner, amount);
        Ok(())
    }

    /// Replace the round's DON/BONUS set with the given stakes and bonus,
    /// leaving its PAYOUT entries (if any) alone, then rewrite the whole
    /// file sorted by timestamp under the header. Last snapshot for a round
    /// wins; the file stays human-sortable by time.
    pub fn upsert_round_snapshot(&self, round: RoundId, stakes: &[Stake], bonus: Kamas) -> Result<()> {
        let _guard = self.lock.lock();
        self.header()?;
        let mut entries = self.load();
        entries.retain(|e| e.round != round || !e.incoming());
        let now = super::entry::now();
        for stake in stakes {
            let amount = stake.amount.max(0);
            if amount <= 0 {
                continue;
            }
            entries.push(Entry::new(now, round, Kind::Don, &stake.player, amount));
        }
        if bonus > 0 {
            entries.push(Entry::new(now, round, Kind::Bonus, crate::BONUS_MARKER, bonus));
        }
        self.rewrite(entries)
    }

    /// Truncate back to header-only, discarding full history. Destructive
    /// and irreversible; used to zero the rolling balance.
    pub fn reset_carry_over(&self) -> Result<()> {
        let _guard = self.lock.lock();
        std::fs::write(&self.path, format!("{}\n", crate::LEDGER_HEADER))?;
        log::info!("ledger truncated to header, carry-over reset");
        Ok(())
    }

    /// One greater than every round id present, 1 for an empty store.
    pub fn next_round_id(&self) -> RoundId {
        let _guard = self.lock.lock();
        self.load().iter().map(|e| e.round).max().unwrap_or(0) + 1
    }

    fn header(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;
        writeln!(file, "{}", crate::LEDGER_HEADER)?;
        Ok(())
    }

    fn load(&self) -> Vec<Entry> {
        if !self.path.exists() {
            return Vec::new();
        }
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("unreadable ledger {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };
        let mut entries = Vec::new();
        for line in raw.lines().skip(1).filter(|l| !l.trim().is_empty()) {
            match line.parse::<Entry>() {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    log::warn!("unreadable ledger {}: {}", self.path.display(), err);
                    return Vec::new();
                }
            }
        }
        entries
    }

    fn rewrite(&self, mut entries: Vec<Entry>) -> Result<()> {
        entries.sort_by_key(|e| e.at);
        let mut lines = vec![crate::LEDGER_HEADER.to_string()];
        lines.extend(entries.iter().map(Entry::to_string));
        std::fs::write(&self.path, format!("{}\n", lines.join("\n")))?;
        Ok(())
    }
}
