//! Kamas lottery ledger and round reconciliation.
//!
//! A flat append-oriented file is the single durable source of truth for
//! donations, bonuses, and payouts. Everything else (round records, carry
//! over, cumulative totals) is derived on demand by folding the entry
//! stream.

pub mod history;
pub mod kamas;
pub mod ledger;
pub mod lottery;

/// Amounts in kamas. Signed so a decoder can accept anything; writers clamp.
pub type Kamas = i32;
/// Monotonically increasing lottery round identifier.
pub type RoundId = u32;

/// First line of the ledger file, always present.
pub const LEDGER_HEADER: &str = "ts;round;type;player;amount";
/// Sentinel player name carried by BONUS entries.
pub const BONUS_MARKER: &str = "__BONUS__";
/// Default ledger file, next to the binary.
pub const LEDGER_FILE: &str = "loterie-dons.csv";
/// Default outcome journal file.
pub const JOURNAL_FILE: &str = "loterie-historique.txt";
/// Default number of empty (losing) seats mixed into the wheel.
pub const LOSING_TICKETS: usize = 100;
/// Default wheel spin duration in seconds. Display concern only.
pub const SPIN_DURATION: f64 = 50.0;

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
