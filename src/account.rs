use serde::{Deserialize, Serialize};

use crate::{Coins, GameError, Result};

/// Stat deltas to fold into a player's running totals. Zero fields are no-ops.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsUpdate {
    pub games_played: u32,
    pub games_won: u32,
    pub total_winnings: Coins,
}

/// Running per-player totals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,
    pub total_winnings: Coins,
}

impl PlayerStats {
    pub fn accumulate(&mut self, update: StatsUpdate) {
        self.games_played += update.games_played;
        self.games_won += update.games_won;
        self.total_winnings += update.total_winnings;
    }
}

/// Balance and stat store for one player.
///
/// The engine debits the bet at session start and credits winnings at a win or
/// cash-out, each as a single logical step. If several execution contexts share an
/// account, serializing access is the implementor's concern, not the engine's.
pub trait Account {
    fn balance(&self) -> Coins;

    /// Applies a signed delta, failing without mutation if the balance would go
    /// negative. The engine pre-checks affordability; implementors re-validate.
    fn adjust_balance(&mut self, delta: i64) -> Result<Coins>;

    fn accumulate_stats(&mut self, update: StatsUpdate);
}

/// Plain in-memory account, enough for tests and single-process hosts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryAccount {
    balance: Coins,
    stats: PlayerStats,
}

impl InMemoryAccount {
    pub fn new(balance: Coins) -> Self {
        Self {
            balance,
            stats: PlayerStats::default(),
        }
    }

    pub fn stats(&self) -> PlayerStats {
        self.stats
    }
}

impl Account for InMemoryAccount {
    fn balance(&self) -> Coins {
        self.balance
    }

    fn adjust_balance(&mut self, delta: i64) -> Result<Coins> {
        let next = (self.balance as i64)
            .checked_add(delta)
            .filter(|balance| *balance >= 0)
            .ok_or(GameError::InsufficientBalance)?;
        self.balance = next as Coins;
        Ok(self.balance)
    }

    fn accumulate_stats(&mut self, update: StatsUpdate) {
        self.stats.accumulate(update);
    }
}
