//! The Jenga game.
//!
//! [`JengaGame`] keeps at most one tower and applies the four bang commands to it.
//! Collapses are rolled with the probabilities of the configured [`GameRules`].

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

use crate::{
    commands::{BangCommand, CommandTable},
    config::GameRules,
    game::{
        GameError, GameHandler,
        responses::{
            format_already_holding, format_already_running, format_no_game, format_not_holding,
            format_nothing_to_pull, format_place_collapse, format_placed, format_pull_collapse,
            format_pulled, format_reset, format_started,
        },
        tower::Tower,
    },
};

/// Mutable part of the game.
struct State {
    /// Tower in play, `None` before the first start and after a collapse
    tower: Option<Tower>,
    /// Source of every random choice of the game
    rng: StdRng,
}

/// Block-stacking game answering the bang commands.
///
/// # Examples
///
/// ```text
/// let game = JengaGame::new(CommandTable::new(), GameRules::default());
/// let response = game.handle_command("!startjenga").await.unwrap();
/// assert!(response.starts_with("You start"));
/// ```
pub struct JengaGame {
    table: CommandTable,
    rules: GameRules,
    state: Mutex<State>,
}

impl JengaGame {
    /// Creates a game seeded from the operating system.
    pub fn new(table: CommandTable, rules: GameRules) -> Self {
        Self::with_rng(table, rules, StdRng::from_os_rng())
    }

    /// Creates a game with a fixed seed, replaying the same random choices.
    #[cfg(test)]
    pub fn with_seed(table: CommandTable, rules: GameRules, seed: u64) -> Self {
        Self::with_rng(table, rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(table: CommandTable, rules: GameRules, rng: StdRng) -> Self {
        JengaGame {
            table,
            rules,
            state: Mutex::new(State { tower: None, rng }),
        }
    }

    fn start(&self, state: &mut State) -> String {
        if let Some(tower) = &state.tower {
            return format_already_running(tower.height(), tower.moves());
        }

        let tower = Tower::new(self.rules.levels);
        let height = tower.height();
        state.tower = Some(tower);

        info!("new game started with {} levels", height);
        format_started(height)
    }

    fn reset(&self, state: &mut State) -> String {
        let tower = Tower::new(self.rules.levels);
        let height = tower.height();
        state.tower = Some(tower);

        info!("game reset with {} levels", height);
        format_reset(height)
    }

    fn pull(&self, state: &mut State) -> String {
        let Some(tower) = state.tower.as_mut() else {
            return format_no_game();
        };
        if tower.is_holding() {
            return format_already_holding();
        }

        let safe = tower.safe_pulls();
        let (position, safe_pull) = if safe.is_empty() {
            let risky = tower.risky_pulls();
            if risky.is_empty() {
                return format_nothing_to_pull(tower.height());
            }
            (risky[state.rng.random_range(0..risky.len())], false)
        } else {
            (safe[state.rng.random_range(0..safe.len())], true)
        };

        let stands = tower.pull(position);
        let risk = self.rules.pull_base_risk
            + self.rules.pull_risk_per_missing_block * tower.missing_blocks() as f64;
        debug!(
            "pulled {:?}, safe={}, risk={:.3}",
            position, safe_pull, risk
        );

        if !stands || state.rng.random_bool(probability(risk)) {
            let moves = tower.moves();
            state.tower = None;
            info!("tower collapsed after {} moves", moves);
            return format_pull_collapse(position.level, position.slot, moves);
        }

        format_pulled(position.level, position.slot, tower.height())
    }

    fn place(&self, state: &mut State) -> String {
        let Some(tower) = state.tower.as_mut() else {
            return format_no_game();
        };
        if !tower.is_holding() {
            return format_not_holding();
        }

        let position = tower.place();
        debug!("placed block at {:?}", position);

        if state.rng.random_bool(probability(self.rules.place_risk)) {
            let moves = tower.moves();
            state.tower = None;
            info!("tower collapsed after {} moves", moves);
            return format_place_collapse(position.level, moves);
        }

        format_placed(position.level, tower.height())
    }
}

impl GameHandler for JengaGame {
    async fn handle_command(&self, token: &str) -> Result<String, GameError> {
        let Some(command) = self.table.from_token(token) else {
            return Err(GameError::UnknownCommand(token.to_owned()));
        };

        let mut state = self.state.lock().await;
        let response = match command {
            BangCommand::Start => self.start(&mut state),
            BangCommand::Pull => self.pull(&mut state),
            BangCommand::Place => self.place(&mut state),
            BangCommand::Reset => self.reset(&mut state),
        };

        Ok(response)
    }
}

/// Turns a configured risk into a probability `random_bool` accepts.
fn probability(risk: f64) -> f64 {
    if risk.is_finite() {
        risk.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
