/// Live table state between ledger writes: who staked what, the operator
/// bonus, and the cached carry-over from rounds nobody won. The session
/// controller snapshots and resets it; it never touches a file itself.
#[derive(Debug, Default)]
pub struct Table {
    stakes: Vec<Stake>,
    bonus: Kamas,
    carry_over: Kamas,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a player, or update their stake if already seated (exact name
    /// match). Negative amounts clamp to zero.
    pub fn set_stake(&mut self, player: &str, amount: Kamas) {
        let amount = amount.max(0);
        match self.stakes.iter_mut().find(|s| s.player == player) {
            Some(stake) => stake.amount = amount,
            None => self.stakes.push(Stake::new(player, amount)),
        }
    }

    pub fn remove(&mut self, player: &str) {
        self.stakes.retain(|s| s.player != player);
    }

    pub fn stakes(&self) -> &[Stake] {
        &self.stakes
    }

    /// Seated player names, one ticket each, in seating order.
    pub fn players(&self) -> Vec<String> {
        self.stakes.iter().map(|s| s.player.clone()).collect()
    }

    pub fn bonus(&self) -> Kamas {
        self.bonus
    }

    pub fn set_bonus(&mut self, bonus: Kamas) {
        self.bonus = bonus.max(0);
    }

    pub fn reset_bonus(&mut self) {
        self.bonus = 0;
    }

    pub fn carry_over(&self) -> Kamas {
        self.carry_over
    }

    pub fn set_carry_over(&mut self, carry_over: Kamas) {
        self.carry_over = carry_over.max(0);
    }

    /// Sum of the positive stakes on the table.
    pub fn stakes_total(&self) -> Kamas {
        self.stakes
            .iter()
            .fold(0, |total, s| total.saturating_add(s.amount.max(0)))
    }

    /// What the wheel pays out: carried balance plus stakes plus bonus.
    pub fn total_pot(&self) -> Kamas {
        self.carry_over
            .saturating_add(self.stakes_total())
            .saturating_add(self.bonus)
    }

    /// Zero every stake but keep the players seated.
    pub fn reset_stakes(&mut self) {
        for stake in self.stakes.iter_mut() {
            stake.amount = 0;
        }
    }
}

use crate::Kamas;
use crate::ledger::Stake;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pot_includes_carry_stakes_and_bonus() {
        let mut table = Table::new();
        table.set_stake("Alice", 1000);
        table.set_stake("Bob", 2000);
        table.set_bonus(500);
        table.set_carry_over(300);
        assert_eq!(table.total_pot(), 3800);
    }

    #[test]
    fn restaking_replaces_not_adds() {
        let mut table = Table::new();
        table.set_stake("Alice", 1000);
        table.set_stake("Alice", 250);
        assert_eq!(table.stakes_total(), 250);
        assert_eq!(table.players(), vec!["Alice"]);
    }

    #[test]
    fn negative_mutations_clamp() {
        let mut table = Table::new();
        table.set_stake("Alice", -5);
        table.set_bonus(-100);
        table.set_carry_over(-1);
        assert_eq!(table.total_pot(), 0);
    }

    #[test]
    fn reset_keeps_players_seated() {
        let mut table = Table::new();
        table.set_stake("Alice", 1000);
        table.set_stake("Bob", 2000);
        table.reset_stakes();
        assert_eq!(table.stakes_total(), 0);
        assert_eq!(table.players().len(), 2);
    }
}
