//! Chance-sampled vanilla CFR trainer.
//!
//! Each iteration samples one deal at the root and then walks the whole tree
//! below it, updating the regrets and strategy sums of every information set
//! it passes. The trainer is generic over any [`GameState`].

use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cfr::config::{TrainingConfig, TrainingStats};
use crate::cfr::error::CfrError;
use crate::cfr::exploitability::ExploitabilityEvaluator;
use crate::cfr::game::GameState;
use crate::cfr::report::TrainingReport;
use crate::cfr::storage::InfoSetTable;

/// Progress passed to the training callback after every iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingProgress {
    /// Training iterations completed so far (warm start excluded).
    pub iteration: u64,
    /// Exploitability, measured only on `eval_step` multiples.
    pub exploitability: Option<f64>,
}

/// The main CFR trainer.
///
/// # Example
/// ```
/// use cfr_poker::cfr::{CfrTrainer, TrainingConfig};
/// use cfr_poker::games::kuhn::KuhnState;
///
/// let config = TrainingConfig::default().with_iterations(1_000).with_seed(42);
/// let mut trainer = CfrTrainer::new(KuhnState::new(), config);
/// trainer.train().unwrap();
/// assert_eq!(trainer.num_info_sets(), 12);
/// ```
pub struct CfrTrainer<G: GameState> {
    /// Root state of the game being solved; re-dealt every iteration.
    game: G,

    /// Configuration for the run.
    config: TrainingConfig,

    /// Training table.
    table: InfoSetTable,

    /// Exploitability measurement, independent of the training recursion.
    evaluator: ExploitabilityEvaluator,

    /// Iterations run so far, warm start included.
    iteration: u64,

    /// Running sum of root payoffs per player since the last reset.
    utilities: Vec<f64>,

    /// Iterations contributing to `utilities`.
    utility_iterations: u64,

    /// Statistics tracking.
    stats: TrainingStats,

    /// Random number generator for the root deal.
    rng: StdRng,
}

impl<G: GameState> CfrTrainer<G> {
    /// Create a new trainer for the given game.
    ///
    /// # Arguments
    /// * `game` - Any state of the game; it is re-dealt before every iteration
    /// * `config` - Configuration for the run
    pub fn new(game: G, config: TrainingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let evaluator = ExploitabilityEvaluator::new(config.strategy_threshold);
        let utilities = vec![0.0; game.player_count()];

        Self {
            game,
            config,
            table: InfoSetTable::new(),
            evaluator,
            iteration: 0,
            utilities,
            utility_iterations: 0,
            stats: TrainingStats::new(),
            rng,
        }
    }

    /// Run a single iteration: sample a deal, then walk the tree below it.
    ///
    /// # Returns
    /// The root payoff vector under the current strategy profile.
    pub fn run_iteration(&mut self) -> Result<Vec<f64>, CfrError> {
        self.iteration += 1;

        self.game.start(&mut self.rng)?;
        let root = self.game.clone();
        let reach_probabilities = vec![1.0; root.player_count()];
        let payoffs = self.cfr(&root, &reach_probabilities)?;

        for (total, payoff) in self.utilities.iter_mut().zip(&payoffs) {
            *total += payoff;
        }
        self.utility_iterations += 1;

        Ok(payoffs)
    }

    /// Train for `config.iterations` iterations.
    pub fn train(&mut self) -> Result<&TrainingStats, CfrError> {
        self.train_with_callback(|_| {})
    }

    /// Train with a callback for progress tracking.
    ///
    /// The callback runs after every iteration. Exploitability is measured
    /// every `config.eval_step` iterations and once more at the end if the
    /// last iteration was not a measuring point. Any error aborts the run.
    pub fn train_with_callback<F>(&mut self, mut callback: F) -> Result<&TrainingStats, CfrError>
    where
        F: FnMut(&TrainingProgress),
    {
        self.config.validate()?;

        if self.config.warm_start_iterations > 0 {
            info!(
                "Warm start for {} iterations",
                self.config.warm_start_iterations
            );
            for _ in 0..self.config.warm_start_iterations {
                self.run_iteration()?;
            }
            debug!("Resetting strategy sums after warm start");
            self.reset();
        }

        info!("Running CFR for {} iterations", self.config.iterations);
        let start_time = Instant::now();

        for step in 1..=self.config.iterations {
            self.run_iteration()?;

            let exploitability = if step % self.config.eval_step == 0 {
                let value = self.exploitability()?;
                self.stats.record_exploitability(step, value);
                debug!(
                    "Exploitability after {} iterations: {:.6} ({} info sets)",
                    step,
                    value,
                    self.table.len()
                );
                Some(value)
            } else {
                None
            };

            callback(&TrainingProgress {
                iteration: step,
                exploitability,
            });
        }

        self.stats.iterations = self.config.iterations;
        self.stats.info_sets = self.table.len();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
        self.stats.average_utilities = self.average_utilities();

        if self.config.iterations % self.config.eval_step != 0 || self.config.iterations == 0 {
            self.stats.exploitability = Some(self.exploitability()?);
        }

        info!(
            "Training end after {} iterations: {} info sets, exploitability {:.6}",
            self.config.iterations,
            self.stats.info_sets,
            self.stats.exploitability.unwrap_or_default()
        );

        Ok(&self.stats)
    }

    /// Discard strategy sums and utility totals, keeping regrets.
    pub fn reset(&mut self) {
        self.table.reset_strategy_sums();
        self.utilities.iter_mut().for_each(|u| *u = 0.0);
        self.utility_iterations = 0;
    }

    /// Core CFR recursion.
    ///
    /// Returns the expected payoff of every player at `state` under the
    /// current strategy profile, updating regrets of the acting player on the
    /// way back up.
    fn cfr(&mut self, state: &G, reach_probabilities: &[f64]) -> Result<Vec<f64>, CfrError> {
        if state.is_terminal() {
            return Ok(state.payoffs());
        }

        let player = state.current_player_index();
        let actions = state.actions();
        let key = state.representation();
        let strategy = self
            .table
            .strategy(&key, actions.len(), reach_probabilities[player])?;

        let mut counterfactual_values = Vec::with_capacity(actions.len());
        for (action, &probability) in actions.iter().zip(&strategy) {
            let mut next_reach = reach_probabilities.to_vec();
            next_reach[player] *= probability;

            let next_state = state.apply(action)?;
            counterfactual_values.push(self.cfr(&next_state, &next_reach)?);
        }

        let node_values = weighted_payoffs(&strategy, &counterfactual_values);

        // Reach of everyone but the acting player.
        let counterfactual_reach: f64 = reach_probabilities
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != player)
            .map(|(_, &reach)| reach)
            .product();

        let regrets: Vec<f64> = counterfactual_values
            .iter()
            .map(|values| counterfactual_reach * (values[player] - node_values[player]))
            .collect();
        self.table.update_regrets(&key, &regrets)?;

        Ok(node_values)
    }

    /// Exploitability of the current average strategy profile.
    pub fn exploitability(&self) -> Result<f64, CfrError> {
        self.evaluator.exploitability(&self.game, &self.table)
    }

    /// Average root payoff per player since the last reset.
    pub fn average_utilities(&self) -> Vec<f64> {
        if self.utility_iterations == 0 {
            return vec![0.0; self.utilities.len()];
        }
        self.utilities
            .iter()
            .map(|total| total / self.utility_iterations as f64)
            .collect()
    }

    /// Get the average strategy for an information set.
    pub fn average_strategy(&self, key: &str, num_actions: usize) -> Result<Vec<f64>, CfrError> {
        self.table.average_strategy(key, num_actions)
    }

    /// Build the end-of-run report.
    pub fn report(&self) -> TrainingReport {
        TrainingReport::from_trainer(self)
    }

    /// Get the current iteration count, warm start included.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered.
    pub fn num_info_sets(&self) -> usize {
        self.table.len()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Get reference to the training table.
    pub fn table(&self) -> &InfoSetTable {
        &self.table
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }
}

/// Per-player expectation of `values[i]` under `strategy[i]`.
pub(crate) fn weighted_payoffs(strategy: &[f64], values: &[Vec<f64>]) -> Vec<f64> {
    let num_players = values.first().map_or(0, Vec::len);
    let mut expected = vec![0.0; num_players];
    for (&probability, payoffs) in strategy.iter().zip(values) {
        for (total, payoff) in expected.iter_mut().zip(payoffs) {
            *total += probability * payoff;
        }
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::game::{Action, Player};

    /// One decision for player 0: `L` pays [1, -1], `R` pays [-1, 1].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Side {
        Left,
        Right,
    }

    impl Action for Side {
        fn token(&self) -> char {
            match self {
                Side::Left => 'L',
                Side::Right => 'R',
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Matching {
        players: Vec<Player>,
        choice: Option<Side>,
        deals: usize,
        /// Offer only `L` on the first deal, breaking key consistency.
        shrink_first_deal: bool,
    }

    impl Matching {
        fn new() -> Self {
            Self {
                players: Player::seats(2),
                choice: None,
                deals: 0,
                shrink_first_deal: false,
            }
        }
    }

    impl GameState for Matching {
        type Action = Side;
        type Card = u8;

        fn deck(&self) -> Vec<u8> {
            vec![0, 1, 2]
        }

        fn deal(&mut self, _cards: &[u8]) -> Result<(), CfrError> {
            self.choice = None;
            self.deals += 1;
            Ok(())
        }

        fn representation(&self) -> String {
            "root".to_string()
        }

        fn actions(&self) -> Vec<Side> {
            match self.choice {
                Some(_) => vec![],
                None if self.shrink_first_deal && self.deals == 1 => vec![Side::Left],
                None => vec![Side::Left, Side::Right],
            }
        }

        fn apply(&self, action: &Side) -> Result<Self, CfrError> {
            if !self.actions().contains(action) {
                return Err(self.invalid_action(action));
            }
            let mut next = self.clone();
            next.choice = Some(*action);
            Ok(next)
        }

        fn player_count(&self) -> usize {
            2
        }

        fn players(&self) -> &[Player] {
            &self.players
        }

        fn current_player_index(&self) -> usize {
            0
        }

        fn is_terminal(&self) -> bool {
            self.choice.is_some()
        }

        fn payoffs(&self) -> Vec<f64> {
            match self.choice {
                Some(Side::Left) => vec![1.0, -1.0],
                _ => vec![-1.0, 1.0],
            }
        }
    }

    #[test]
    fn test_weighted_payoffs() {
        let values = vec![vec![1.0, -1.0], vec![-3.0, 3.0]];
        assert_eq!(weighted_payoffs(&[0.75, 0.25], &values), vec![0.0, 0.0]);
        assert_eq!(weighted_payoffs(&[1.0, 0.0], &values), vec![1.0, -1.0]);
    }

    #[test]
    fn test_single_iteration_updates_regrets() {
        let config = TrainingConfig::default().with_seed(1);
        let mut trainer = CfrTrainer::new(Matching::new(), config);

        let payoffs = trainer.run_iteration().unwrap();
        assert_eq!(payoffs, vec![0.0, 0.0]);

        let info_set = trainer.table().get("root").unwrap();
        assert_eq!(info_set.cumulative_regrets(), &[1.0, -1.0]);
        assert_eq!(info_set.strategy_sum(), &[0.5, 0.5]);
    }

    #[test]
    fn test_training_converges_to_dominant_action() {
        let config = TrainingConfig::default()
            .with_iterations(100)
            .with_eval_step(50)
            .with_seed(1);
        let mut trainer = CfrTrainer::new(Matching::new(), config);
        let stats = trainer.train().unwrap();

        assert_eq!(stats.iterations, 100);
        assert_eq!(stats.info_sets, 1);
        assert_eq!(stats.exploitability_history.len(), 2);

        let strategy = trainer.average_strategy("root", 2).unwrap();
        assert!(strategy[0] > 0.98, "left should dominate, got {:?}", strategy);
    }

    #[test]
    fn test_callback_sees_every_iteration() {
        let config = TrainingConfig::default()
            .with_iterations(10)
            .with_eval_step(4)
            .with_seed(3);
        let mut trainer = CfrTrainer::new(Matching::new(), config);

        let mut seen = Vec::new();
        trainer
            .train_with_callback(|progress| seen.push(*progress))
            .unwrap();

        assert_eq!(seen.len(), 10);
        let measured: Vec<u64> = seen
            .iter()
            .filter(|p| p.exploitability.is_some())
            .map(|p| p.iteration)
            .collect();
        assert_eq!(measured, vec![4, 8]);
        assert!(trainer.stats().exploitability.is_some());
    }

    #[test]
    fn test_warm_start_discards_strategy_sums() {
        let config = TrainingConfig::default()
            .with_iterations(0)
            .with_warm_start(5)
            .with_seed(3);
        let mut trainer = CfrTrainer::new(Matching::new(), config);
        trainer.train().unwrap();

        assert_eq!(trainer.iteration(), 5);
        let info_set = trainer.table().get("root").unwrap();
        assert_eq!(info_set.strategy_sum(), &[0.0, 0.0]);
        assert!(info_set.cumulative_regrets()[0] > 0.0);
        assert_eq!(trainer.average_utilities(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_inconsistent_key_aborts_run() {
        let mut game = Matching::new();
        game.shrink_first_deal = true;
        let config = TrainingConfig::default().with_iterations(3).with_seed(1);
        let mut trainer = CfrTrainer::new(game, config);

        let err = trainer.train().unwrap_err();
        assert_eq!(
            err,
            CfrError::InconsistentInformationSet {
                key: "root".to_string(),
                expected: 1,
                found: 2,
            }
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TrainingConfig::default().with_eval_step(0);
        let mut trainer = CfrTrainer::new(Matching::new(), config);
        assert!(matches!(trainer.train(), Err(CfrError::Config(_))));
    }
}
