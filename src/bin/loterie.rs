//! Table-side driver for the kamas lottery.
//!
//! Each invocation opens the ledger fresh, so `spin` stages and settles a
//! whole round in one go. History, totals, and carry-over are read-only.

use clap::Parser;
use clap::Subcommand;
use colored::Colorize;
use kamaloto::Kamas;
use kamaloto::kamas;
use kamaloto::ledger::Stake;
use kamaloto::lottery::Config;
use kamaloto::lottery::Session;
use kamaloto::lottery::Table;
use kamaloto::lottery::Wheel;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loterie", about = "kamas lottery over a flat-file ledger")]
struct Cli {
    /// Ledger file (defaults next to the binary)
    #[arg(long)]
    ledger: Option<PathBuf>,
    /// Outcome journal file
    #[arg(long)]
    journal: Option<PathBuf>,
    /// Empty seats mixed into the wheel
    #[arg(long)]
    losing: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stage the given stakes, spin the wheel, settle the outcome
    Spin {
        /// Stakes as name=amount pairs; amounts take kamas shorthand ("50k")
        #[arg(required = true)]
        stakes: Vec<String>,
        /// Operator bonus added to the pot
        #[arg(long, default_value = "0")]
        bonus: String,
        /// Seed the wheel for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Per-round history from the ledger
    History,
    /// Cumulative donations per player
    Players,
    /// Rolling unclaimed balance
    Carry,
    /// Truncate the ledger back to header-only, discarding all history
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    kamaloto::log();
    let cli = Cli::parse();
    let mut config = Config::default();
    if let Some(ledger) = cli.ledger {
        config.ledger_path = ledger;
    }
    if let Some(journal) = cli.journal {
        config.journal_path = journal;
    }
    if let Some(losing) = cli.losing {
        config.losing_tickets = losing;
    }
    let mut session = Session::new(&config);
    let mut table = Table::new();
    table.set_carry_over(session.carry_over());

    match cli.command {
        Command::Spin {
            stakes,
            bonus,
            seed,
        } => {
            for stake in parse_stakes(&stakes)? {
                table.set_stake(&stake.player, stake.amount);
            }
            table.set_bonus(parse_amount(&bonus)?);
            let pot = table.total_pot();
            anyhow::ensure!(pot > 0, "nothing in the pot, nothing to spin for");
            let round = session.stage(&mut table)?;
            let wheel = Wheel::deal(&table.players(), config.losing_tickets);
            anyhow::ensure!(!wheel.is_empty(), "no tickets on the wheel");
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            println!("round {} spinning for {} k", round, kamas::format(pot));
            match wheel.spin(&mut rng).map(str::to_string) {
                Some(winner) => {
                    session.win(&mut table, round, &winner, pot)?;
                    println!("{} wins {} k", winner.bold().green(), kamas::format(pot));
                }
                None => {
                    session.lose(&mut table, round, pot);
                    println!(
                        "{} {} k roll into the next round",
                        "lost,".red(),
                        kamas::format(session.carry_over())
                    );
                }
            }
        }
        Command::History => {
            for record in session.history() {
                println!("{}", record);
            }
        }
        Command::Players => {
            for (player, total) in session.cumulative_by_player() {
                println!("{:<24}{:>12} k", player.to_string(), kamas::format(total));
            }
        }
        Command::Carry => {
            println!("{} k", kamas::format(session.carry_over()));
        }
        Command::Reset { yes } => {
            let confirmed = yes
                || dialoguer::Confirm::new()
                    .with_prompt("wipe the full donation history?")
                    .default(false)
                    .interact()?;
            if confirmed {
                session.reset_all(&mut table)?;
                println!("ledger reset, carry-over back to zero");
            }
        }
    }
    Ok(())
}

fn parse_stakes(tokens: &[String]) -> anyhow::Result<Vec<Stake>> {
    tokens
        .iter()
        .map(|token| {
            let (player, amount) = token
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected name=amount, got {:?}", token))?;
            let amount = parse_amount(amount)?;
            anyhow::ensure!(!player.trim().is_empty(), "empty player name in {:?}", token);
            Ok(Stake::new(player.trim(), amount))
        })
        .collect()
}

fn parse_amount(raw: &str) -> anyhow::Result<Kamas> {
    kamas::parse(raw).ok_or_else(|| anyhow::anyhow!("unparseable kamas amount {:?}", raw))
}
