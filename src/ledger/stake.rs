/// One player's contribution toward the current round's pot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stake {
    pub player: String,
    pub amount: Kamas,
}

impl Stake {
    pub fn new(player: &str, amount: Kamas) -> Self {
        Self {
            player: player.to_string(),
            amount,
        }
    }
}

impl Display for Stake {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} k", self.player, crate::kamas::format(self.amount))
    }
}

use crate::Kamas;
use std::fmt::Display;
