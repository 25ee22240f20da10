use std::path::PathBuf;

/// Everything the lottery needs to know up front, passed into constructors
/// instead of living in process-wide statics.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger file, the durable source of truth.
    pub ledger_path: PathBuf,
    /// Outcome journal file.
    pub journal_path: PathBuf,
    /// Empty seats mixed into the wheel; more of them, worse the odds.
    pub losing_tickets: usize,
    /// Wheel spin duration in seconds. Only the presentation layer cares.
    pub spin_duration: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(crate::LEDGER_FILE),
            journal_path: PathBuf::from(crate::JOURNAL_FILE),
            losing_tickets: crate::LOSING_TICKETS,
            spin_duration: crate::SPIN_DURATION,
        }
    }
}
