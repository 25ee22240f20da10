use super::config::Config;
use super::table::Table;
use crate::Kamas;
use crate::RoundId;
use crate::history::Journal;
use crate::history::JournalEntry;
use crate::ledger::Result;
use crate::ledger::RoundRecord;
use crate::ledger::Stake;
use crate::ledger::Store;
use crate::ledger::round;
use crate::ledger::tally;
use std::collections::BTreeMap;

/// The round protocol a driving application walks once per spin.
///
/// Staging snapshots the table into the ledger; finalizing turns the
/// snapshot into a settled round. Between the two, re-staging the same
/// stakes is a guaranteed no-op write, because the application may re-stage
/// on every table mutation. One round at a time, one instance per table:
///
/// ```text
/// NONE -> STAGED -> (WON | LOST) -> NONE
/// ```
///
/// `STAGED` self-loops: identical staging does nothing, changed stakes
/// re-snapshot the same round. Capture the pot before staging; staging
/// refreshes the carry-over cache with the live round included, so the
/// table total briefly counts the staged stakes twice until settlement.
#[derive(Debug)]
pub struct Session {
    store: Store,
    journal: Journal,
    current_round: Option<RoundId>,
    last_signature: Option<String>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Store::new(config.ledger_path.clone()),
            journal: Journal::new(config.journal_path.clone()),
            current_round: None,
            last_signature: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Deterministic fingerprint of a (stakes, bonus) combination. Zero
    /// stakes are ignored, names are lower-cased and sorted, so insertion
    /// order and casing never force a redundant rewrite.
    pub fn signature(stakes: &[Stake], bonus: Kamas) -> String {
        let mut staked = stakes
            .iter()
            .filter(|s| s.amount > 0)
            .map(|s| (s.player.to_lowercase(), s.amount))
            .collect::<Vec<_>>();
        staked.sort();
        let staked = staked
            .iter()
            .map(|(name, amount)| format!("{}:{}", name, amount))
            .collect::<Vec<_>>()
            .join("|");
        format!("{};bonus={}", staked, bonus)
    }

    /// Make the table's current stakes and bonus durable for the current
    /// round, opening a new round if none is staged. Re-staging identical
    /// input returns the same round id without touching the file.
    pub fn ensure_round_snapshot(&mut self, table: &mut Table) -> Result<RoundId> {
        let round = match self.current_round {
            Some(round) => round,
            None => self.store.next_round_id(),
        };
        let signature = Self::signature(table.stakes(), table.bonus());
        if self.last_signature.as_deref() != Some(signature.as_str()) || self.current_round.is_none()
        {
            self.store
                .upsert_round_snapshot(round, table.stakes(), table.bonus())?;
            table.set_carry_over(self.carry_over());
            self.last_signature = Some(signature);
            log::debug!("round {} snapshot written", round);
        }
        self.current_round = Some(round);
        Ok(round)
    }

    /// Close out the staged round: make the final stake state durable even
    /// if it changed since the last stage, zero the table, forget the
    /// session state, refresh the carry-over. With nothing in the pot there
    /// is nothing to close, so only the session state is forgotten.
    pub fn finalize_round_and_reset(&mut self, table: &mut Table) -> Result<Option<RoundId>> {
        if table.total_pot() <= 0 {
            self.current_round = None;
            self.last_signature = None;
            return Ok(None);
        }
        let round = self.ensure_round_snapshot(table)?;
        table.reset_stakes();
        table.reset_bonus();
        self.current_round = None;
        self.last_signature = None;
        table.set_carry_over(self.carry_over());
        Ok(Some(round))
    }

    /// Collaborator-facing alias for [`Session::ensure_round_snapshot`].
    pub fn stage(&mut self, table: &mut Table) -> Result<RoundId> {
        self.ensure_round_snapshot(table)
    }

    /// Settle a won round: record the payout, then finalize. The pot is the
    /// amount captured before staging, carry-over included.
    pub fn win(&mut self, table: &mut Table, round: RoundId, winner: &str, pot: Kamas) -> Result<()> {
        let participants = table.players();
        self.store.append_payout(round, winner, pot)?;
        self.finalize_round_and_reset(table)?;
        self.note(JournalEntry::outcome(Some(winner), pot, &participants, round));
        log::info!("round {} won by {} for {} k", round, winner, pot);
        Ok(())
    }

    /// Settle a lost round: no ledger write, the staked pot stays in
    /// history and resurfaces through the carry-over. The table is zeroed
    /// and the session forgets the round, so the next stage opens a fresh
    /// one instead of re-recording the carried stakes.
    pub fn lose(&mut self, table: &mut Table, round: RoundId, pot: Kamas) {
        let participants = table.players();
        table.reset_stakes();
        table.reset_bonus();
        self.current_round = None;
        self.last_signature = None;
        table.set_carry_over(self.carry_over());
        self.note(JournalEntry::outcome(None, pot, &participants, round));
        log::info!("round {} lost, {} k carried", round, pot);
    }

    /// Per-round records, ascending by round id.
    pub fn history(&self) -> Vec<RoundRecord> {
        round::aggregate(&self.store.load_all())
    }

    pub fn find_round(&self, round: RoundId) -> Option<RoundRecord> {
        round::find_round_record(&self.store.load_all(), round)
    }

    /// Rolling unclaimed balance derived from the full entry history.
    pub fn carry_over(&self) -> Kamas {
        tally::carry_over(&self.store.load_all())
    }

    /// Total donated per player across all rounds.
    pub fn cumulative_by_player(&self) -> BTreeMap<round::Player, Kamas> {
        tally::cumulative_by_player(&self.store.load_all())
    }

    /// Wipe the ledger back to header-only and zero the table. Destructive:
    /// the full donation history is gone, not just the balance.
    pub fn reset_all(&mut self, table: &mut Table) -> Result<()> {
        self.store.reset_carry_over()?;
        table.reset_stakes();
        table.reset_bonus();
        table.set_carry_over(0);
        self.current_round = None;
        self.last_signature = None;
        Ok(())
    }

    // the journal is operator notes, not money: a failed append must not
    // fail the settlement that triggered it
    fn note(&self, entry: JournalEntry) {
        if let Err(err) = self.journal.append(&entry) {
            log::warn!("journal append failed: {}", err);
        }
    }
}
