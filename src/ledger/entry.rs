/// Immutable ledger entry representing a donation, a bonus, or a payout.
/// Persisted as one `;`-separated line of the ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub at: NaiveDateTime,
    pub round: RoundId,
    pub kind: Kind,
    pub player: String,
    pub amount: Kamas,
}

impl Entry {
    pub fn new(at: NaiveDateTime, round: RoundId, kind: Kind, player: &str, amount: Kamas) -> Self {
        Self {
            at,
            round,
            kind,
            player: player.to_string(),
            amount,
        }
    }

    pub fn incoming(&self) -> bool {
        match self.kind {
            Kind::Don | Kind::Bonus => true,
            Kind::Payout => false,
        }
    }
}

/// Wall-clock timestamp truncated to second precision, matching what the
/// codec can round-trip.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
// some ISO writers drop `:00` seconds entirely
const TS_FORMAT_SHORT: &str = "%Y-%m-%dT%H:%M";

fn parse_ts(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, TS_FORMAT_SHORT))
        .ok()
}

fn sanitize(player: &str) -> String {
    player.replace(';', " ")
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{};{};{};{};{}",
            self.at.format(TS_FORMAT),
            self.round,
            self.kind,
            sanitize(&self.player),
            self.amount
        )
    }
}

impl FromStr for Entry {
    type Err = LedgerError;
    fn from_str(line: &str) -> Result<Self> {
        let malformed = || LedgerError::MalformedEntry {
            line: line.to_string(),
        };
        let parts = line.split(';').collect::<Vec<_>>();
        if parts.len() < 5 {
            return Err(malformed());
        }
        Ok(Self {
            at: parse_ts(parts[0]).ok_or_else(malformed)?,
            round: parts[1].parse::<RoundId>().map_err(|_| malformed())?,
            kind: parts[2].parse::<Kind>().map_err(|_| malformed())?,
            player: parts[3].to_string(),
            amount: parts[4].parse::<Kamas>().map_err(|_| malformed())?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Don,
    Bonus,
    Payout,
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Kind::Don => write!(f, "DON"),
            Kind::Bonus => write!(f, "BONUS"),
            Kind::Payout => write!(f, "PAYOUT"),
        }
    }
}

impl FromStr for Kind {
    type Err = LedgerError;
    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "DON" => Ok(Kind::Don),
            "BONUS" => Ok(Kind::Bonus),
            "PAYOUT" => Ok(Kind::Payout),
            _ => Err(LedgerError::MalformedEntry {
                line: raw.to_string(),
            }),
        }
    }
}

use super::error::LedgerError;
use super::error::Result;
use crate::Kamas;
use crate::RoundId;
use chrono::Local;
use chrono::NaiveDateTime;
use chrono::Timelike;
use std::fmt::Display;
use std::str::FromStr;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn round_trip() {
        let entry = Entry::new(ts(20, 15, 30), 3, Kind::Don, "Alice", 15000);
        assert_eq!(entry, entry.to_string().parse::<Entry>().unwrap());
    }

    #[test]
    fn encodes_fixed_field_order() {
        let entry = Entry::new(ts(20, 15, 30), 3, Kind::Bonus, crate::BONUS_MARKER, 5000);
        assert_eq!(
            entry.to_string(),
            "2024-05-01T20:15:30;3;BONUS;__BONUS__;5000"
        );
    }

    #[test]
    fn semicolons_in_player_become_spaces() {
        let entry = Entry::new(ts(8, 0, 0), 1, Kind::Don, "a;b;c", 10);
        let line = entry.to_string();
        assert_eq!(line.split(';').count(), 5);
        assert_eq!(line.parse::<Entry>().unwrap().player, "a b c");
    }

    #[test]
    fn rejects_short_line() {
        assert!("2024-05-01T20:15:30;3;DON;Alice".parse::<Entry>().is_err());
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(
            "2024-05-01T20:15:30;3;REFUND;Alice;10"
                .parse::<Entry>()
                .is_err()
        );
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!("yesterday;3;DON;Alice;10".parse::<Entry>().is_err());
    }

    #[test]
    fn accepts_minute_precision_timestamp() {
        let entry = "2024-05-01T20:15;3;DON;Alice;10".parse::<Entry>().unwrap();
        assert_eq!(entry.at, ts(20, 15, 0));
    }

    #[test]
    fn accepts_negative_amount() {
        let entry = "2024-05-01T20:15:30;3;PAYOUT;Bob;-50"
            .parse::<Entry>()
            .unwrap();
        assert_eq!(entry.amount, -50);
    }
}
