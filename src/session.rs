use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Active
/// - Active -> Won
/// - Active -> Lost
/// - Active -> CashedOut
///
/// Terminal states only exit through a new `start` (or `reset` back to `Idle`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Active,
    Won,
    Lost,
    CashedOut,
}

impl SessionState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::CashedOut)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// How a finished round ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
    CashedOut,
}

/// Record emitted when a round reaches a terminal state.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub amount_bet: Coins,
    /// Amount credited on top of the already-debited bet; negative means the bet
    /// was forfeited.
    pub amount_won: i64,
    pub treasures_found: usize,
    pub treasure_target: usize,
    pub bomb_total: usize,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a single reveal call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Benign no-op: out of range, already revealed, or no active round.
    AlreadyRevealed,
    Safe,
    TreasureFound,
    Won,
    Lost,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::AlreadyRevealed)
    }
}

/// Typed transition notifications for presentation layers (rendering, audio, toasts).
/// The session queues them on every transition; hosts drain with `take_events`.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SessionStarted {
        bet: Coins,
        treasure_target: usize,
        bomb_total: usize,
        potential_win: Coins,
    },
    CellRevealed {
        coords: Coord2,
        kind: CellKind,
    },
    SessionWon {
        result: GameResult,
    },
    SessionLost {
        result: GameResult,
    },
    CashedOut {
        result: GameResult,
    },
}

/// Bet and board composition for one round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub bet: Coins,
    pub treasures: usize,
    pub bombs: usize,
}

impl SessionParams {
    /// The round a player gets when they start without touching any inputs.
    pub fn defaults(config: &GridConfig) -> Self {
        Self {
            bet: config.default_bet,
            treasures: config.default_treasures,
            bombs: config.default_bombs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Round {
    layout: GridLayout,
    revealed: Array2<bool>,
    bet: Coins,
    treasure_target: usize,
    bomb_total: usize,
    treasures_found: usize,
    cells_revealed: usize,
    potential_win: Coins,
    win_multiplier: f64,
    started_at: DateTime<Utc>,
}

/// One player's session: at most one live round at a time.
///
/// The session owns the round data exclusively and performs every operation as a
/// synchronous in-memory step. Account access happens through the injected
/// [`Account`] handle at round boundaries only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GridConfig,
    state: SessionState,
    round: Option<Round>,
    last_result: Option<GameResult>,
    ended_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            round: None,
            last_result: None,
            ended_at: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    /// Drains the queued transition events in emission order.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        core::mem::take(&mut self.events)
    }

    pub fn bet(&self) -> Coins {
        self.round.as_ref().map_or(0, |round| round.bet)
    }

    pub fn treasures_found(&self) -> usize {
        self.round.as_ref().map_or(0, |round| round.treasures_found)
    }

    pub fn treasure_target(&self) -> usize {
        self.round.as_ref().map_or(0, |round| round.treasure_target)
    }

    pub fn bomb_total(&self) -> usize {
        self.round.as_ref().map_or(0, |round| round.bomb_total)
    }

    pub fn cells_revealed(&self) -> usize {
        self.round.as_ref().map_or(0, |round| round.cells_revealed)
    }

    pub fn potential_win(&self) -> Coins {
        self.round.as_ref().map_or(0, |round| round.potential_win)
    }

    /// Player-visible cell view; hidden cells do not leak their kind.
    pub fn cell_at(&self, coords: Coord2) -> Result<CellView> {
        let round = self.round.as_ref().ok_or(GameError::SessionNotActive)?;
        let coords = round.layout.validate_coords(coords)?;
        Ok(if round.revealed[coords] {
            CellView::Revealed(round.layout[coords])
        } else {
            CellView::Hidden
        })
    }

    /// How many seconds the round has been running, 0 when idle.
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(round) = self.round.as_ref() {
            (self.ended_at.unwrap_or_else(Utc::now) - round.started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Value a cash-out would pay right now, `None` unless one is allowed.
    pub fn cash_out_quote(&self) -> Option<Coins> {
        let round = self.round.as_ref()?;
        if !self.state.is_active() || round.treasures_found == 0 {
            return None;
        }
        Some(crate::payout::cash_out_value(
            round.bet,
            round.treasures_found,
            round.treasure_target,
            round.bomb_total,
            round.win_multiplier,
        ))
    }

    /// Validates the request, debits the bet and deals a fresh board.
    ///
    /// Preconditions are checked in order and the first failure wins; nothing is
    /// mutated unless all of them pass, so a failed start leaves the account and the
    /// session untouched.
    pub fn start<G: GridGenerator>(
        &mut self,
        params: SessionParams,
        settings: &GameSettings,
        account: &mut dyn Account,
        generator: G,
    ) -> Result<()> {
        if self.state.is_active() {
            return Err(GameError::SessionActive);
        }

        let SessionParams {
            bet,
            treasures,
            bombs,
        } = params;
        let config = self.config;

        if bet == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        if config.enforce_max_bet && bet > settings.max_bet {
            return Err(GameError::InvalidConfiguration);
        }
        if treasures < config.min_treasures || treasures > config.max_treasures {
            return Err(GameError::InvalidConfiguration);
        }
        if bombs < config.min_bombs || bombs > config.max_bombs {
            return Err(GameError::InvalidConfiguration);
        }
        if treasures + bombs > config.total_cells() {
            return Err(GameError::InvalidConfiguration);
        }
        if account.balance() < bet {
            return Err(GameError::InsufficientBalance);
        }

        // generate before the debit so a rejected layout leaves the account untouched
        let layout = generator.generate(&config, treasures, bombs)?;
        account.adjust_balance(-(bet as i64))?;
        account.accumulate_stats(StatsUpdate {
            games_played: 1,
            ..StatsUpdate::default()
        });

        let potential_win = crate::payout::potential_win(bet, treasures, bombs, settings.win_multiplier);
        let size = layout.size();
        self.round = Some(Round {
            layout,
            revealed: Array2::default(size),
            bet,
            treasure_target: treasures,
            bomb_total: bombs,
            treasures_found: 0,
            cells_revealed: 0,
            potential_win,
            win_multiplier: settings.win_multiplier,
            started_at: Utc::now(),
        });
        self.state = SessionState::Active;
        self.last_result = None;
        self.ended_at = None;
        self.events.push(SessionEvent::SessionStarted {
            bet,
            treasure_target: treasures,
            bomb_total: bombs,
            potential_win,
        });
        log::debug!(
            "Session started: bet {}, {} treasures, {} bombs, potential win {}",
            bet,
            treasures,
            bombs,
            potential_win
        );

        Ok(())
    }

    /// Reveals one cell. Out-of-range coordinates, already revealed cells and calls
    /// outside an active round are safe no-ops.
    pub fn reveal(&mut self, coords: Coord2, account: &mut dyn Account) -> RevealOutcome {
        use RevealOutcome::*;

        if !self.state.is_active() {
            return AlreadyRevealed;
        }
        let Some(round) = self.round.as_mut() else {
            return AlreadyRevealed;
        };
        let Ok(coords) = round.layout.validate_coords(coords) else {
            return AlreadyRevealed;
        };
        if round.revealed[coords] {
            return AlreadyRevealed;
        }

        round.revealed[coords] = true;
        round.cells_revealed += 1;
        let kind = round.layout[coords];
        if kind.is_treasure() {
            round.treasures_found += 1;
        }
        let target_reached = round.treasures_found == round.treasure_target;

        self.events.push(SessionEvent::CellRevealed { coords, kind });
        log::debug!("Revealed cell at {:?}: {:?}", coords, kind);

        match kind {
            CellKind::Safe => Safe,
            CellKind::Treasure if target_reached => {
                self.finish_won(account);
                Won
            }
            CellKind::Treasure => TreasureFound,
            CellKind::Bomb => {
                self.finish_lost();
                Lost
            }
        }
    }

    /// Banks the current round early, crediting the progressive cash-out value.
    pub fn cash_out(&mut self, account: &mut dyn Account) -> Result<GameResult> {
        if !self.state.is_active() {
            return Err(GameError::SessionNotActive);
        }
        let round = self.round.as_ref().ok_or(GameError::SessionNotActive)?;
        if round.treasures_found == 0 {
            return Err(GameError::NothingToCashOut);
        }

        let value = crate::payout::cash_out_value(
            round.bet,
            round.treasures_found,
            round.treasure_target,
            round.bomb_total,
            round.win_multiplier,
        );
        let result = make_result(round, Outcome::CashedOut, value as i64);

        credit(account, value);

        self.state = SessionState::CashedOut;
        self.ended_at = Some(result.timestamp);
        self.last_result = Some(result);
        self.events.push(SessionEvent::CashedOut { result });
        log::debug!(
            "Cashed out {} with {} of {} treasures found",
            value,
            result.treasures_found,
            result.treasure_target
        );

        Ok(result)
    }

    /// Discards the finished round and returns to `Idle`. Rejected while a round is
    /// still live.
    pub fn reset(&mut self) -> Result<()> {
        if self.state.is_active() {
            return Err(GameError::SessionActive);
        }

        self.state = SessionState::Idle;
        self.round = None;
        self.last_result = None;
        self.ended_at = None;
        self.events.clear();
        Ok(())
    }

    fn finish_won(&mut self, account: &mut dyn Account) {
        let Some(round) = self.round.as_ref() else {
            return;
        };

        let win = round.potential_win;
        let result = make_result(round, Outcome::Won, win as i64);

        credit(account, win);

        self.state = SessionState::Won;
        self.ended_at = Some(result.timestamp);
        self.last_result = Some(result);
        self.events.push(SessionEvent::SessionWon { result });
        log::debug!("Session won, credited {}", win);
    }

    fn finish_lost(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };

        // informational: show the player where the remaining bombs were
        for (coords, kind) in round.layout.indexed_kinds() {
            if kind.is_bomb() {
                round.revealed[coords] = true;
            }
        }

        let result = make_result(round, Outcome::Lost, -(round.bet as i64));

        self.state = SessionState::Lost;
        self.ended_at = Some(result.timestamp);
        self.last_result = Some(result);
        self.events.push(SessionEvent::SessionLost { result });
        log::debug!("Session lost, bet of {} forfeited", result.amount_bet);
    }
}

fn make_result(round: &Round, outcome: Outcome, amount_won: i64) -> GameResult {
    GameResult {
        outcome,
        amount_bet: round.bet,
        amount_won,
        treasures_found: round.treasures_found,
        treasure_target: round.treasure_target,
        bomb_total: round.bomb_total,
        timestamp: Utc::now(),
    }
}

/// Winnings credits never overdraw, so a rejection here means the account
/// collaborator and the engine disagree about the balance.
fn credit(account: &mut dyn Account, amount: Coins) {
    if let Err(err) = account.adjust_balance(amount as i64) {
        log::warn!("Credit of {} rejected by account: {}", amount, err);
    }
    account.accumulate_stats(StatsUpdate {
        games_won: 1,
        total_winnings: amount,
        ..StatsUpdate::default()
    });
}
