//! Exact best-response exploitability.
//!
//! The evaluator enumerates every deal instead of sampling, so two runs over
//! the same table always return the same value. It never writes to the
//! training table.

use std::time::Instant;

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::cfr::error::CfrError;
use crate::cfr::game::GameState;
use crate::cfr::info_set::uniform;
use crate::cfr::storage::{InfoSetTable, Policy};
use crate::cfr::trainer::weighted_payoffs;

/// Default probability cut applied to the average strategy under evaluation.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// Computes how much best-responding players gain against an average
/// strategy profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExploitabilityEvaluator {
    threshold: f64,
}

impl Default for ExploitabilityEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ExploitabilityEvaluator {
    /// Create an evaluator that zeroes average-strategy entries below
    /// `threshold` before comparing.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Threshold applied to the evaluated average strategy.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Exploitability of the average strategy stored in `table`.
    ///
    /// For every deal and every seat, the gain of the best-response policy
    /// over the thresholded average strategy is summed across seats; the
    /// result is the mean of that sum over all deals. Keys missing from the
    /// table are played uniformly.
    ///
    /// # Errors
    /// Propagates [`CfrError::InconsistentInformationSet`] when a stored key
    /// disagrees with the game about its action count, and any error the game
    /// raises while dealing or applying actions.
    pub fn exploitability<G: GameState>(
        &self,
        game: &G,
        table: &InfoSetTable,
    ) -> Result<f64, CfrError> {
        let start_time = Instant::now();
        let roots = dealt_roots(game)?;
        let player_count = game.player_count();

        // Per-deal scores are merged in deal order so sums never depend on
        // thread scheduling.
        let deal_scores = roots
            .par_iter()
            .map(|root| -> Result<Policy, CfrError> {
                let mut scores = Policy::default();
                for player in 0..player_count {
                    best_response_value(root, table, &mut scores, player, 1.0)?;
                }
                Ok(scores)
            })
            .collect::<Result<Vec<Policy>, CfrError>>()?;

        let mut scores = Policy::default();
        for deal in deal_scores {
            merge_scores(&mut scores, deal)?;
        }

        let best_response = best_response_policy(&scores);
        let cfr_policy = table.thresholded_strategies(self.threshold);

        let gains = roots
            .par_iter()
            .map(|root| -> Result<f64, CfrError> {
                let mut total = 0.0;
                for player in 0..player_count {
                    let deviating = expected_value(root, player, &best_response, &cfr_policy)?;
                    let baseline = expected_value(root, player, &cfr_policy, &cfr_policy)?;
                    total += deviating[player] - baseline[player];
                }
                Ok(total)
            })
            .collect::<Result<Vec<f64>, CfrError>>()?;

        let exploitability = if gains.is_empty() {
            0.0
        } else {
            gains.iter().sum::<f64>() / gains.len() as f64
        };

        debug!(
            "Evaluated {} deals over {} best-response keys in {:.3}s",
            roots.len(),
            scores.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(exploitability)
    }
}

/// Root state of every ordered deal of `player_count + 1` cards.
pub fn dealt_roots<G: GameState>(game: &G) -> Result<Vec<G>, CfrError> {
    game.deck()
        .into_iter()
        .permutations(game.deal_size())
        .map(|cards| -> Result<G, CfrError> {
            let mut root = game.clone();
            root.deal(&cards)?;
            Ok(root)
        })
        .collect()
}

/// Best-response recursion for `br_player` against the average strategy in
/// `table`.
///
/// At the best-responder's nodes every action is explored, each action's
/// value weighted by `prob` is added to `scores[key]`, and the value of the
/// first maximal action is returned. Other seats follow their average
/// strategy, scaling `prob` by the probability of each action.
pub fn best_response_value<G: GameState>(
    state: &G,
    table: &InfoSetTable,
    scores: &mut Policy,
    br_player: usize,
    prob: f64,
) -> Result<Vec<f64>, CfrError> {
    if state.is_terminal() {
        return Ok(state.payoffs());
    }

    let key = state.representation();
    let player = state.current_player_index();
    let actions = state.actions();

    if player == br_player {
        let mut values = Vec::with_capacity(actions.len());
        for action in &actions {
            let next_state = state.apply(action)?;
            values.push(best_response_value(&next_state, table, scores, br_player, prob)?);
        }

        let increments: Vec<f64> = values.iter().map(|v| prob * v[player]).collect();
        add_scores(scores, &key, &increments)?;

        let best = first_max_index(values.iter().map(|v| v[player]));
        return Ok(values.swap_remove(best));
    }

    let strategy = table.average_strategy(&key, actions.len())?;
    let mut values = Vec::with_capacity(actions.len());
    for (action, &probability) in actions.iter().zip(&strategy) {
        let next_state = state.apply(action)?;
        values.push(best_response_value(
            &next_state,
            table,
            scores,
            br_player,
            prob * probability,
        )?);
    }

    Ok(weighted_payoffs(&strategy, &values))
}

/// Payoff vector when `perspective` plays `strategy_a` and every other seat
/// plays `strategy_b`. Keys missing from a policy are played uniformly.
pub fn expected_value<G: GameState>(
    state: &G,
    perspective: usize,
    strategy_a: &Policy,
    strategy_b: &Policy,
) -> Result<Vec<f64>, CfrError> {
    if state.is_terminal() {
        return Ok(state.payoffs());
    }

    let policy = if state.current_player_index() == perspective {
        strategy_a
    } else {
        strategy_b
    };
    let actions = state.actions();
    let strategy = policy_at(policy, &state.representation(), actions.len())?;

    let mut values = Vec::with_capacity(actions.len());
    for action in &actions {
        let next_state = state.apply(action)?;
        values.push(expected_value(&next_state, perspective, strategy_a, strategy_b)?);
    }

    Ok(weighted_payoffs(&strategy, &values))
}

/// Pure best-response policy from accumulated scores.
///
/// Every action whose score equals the key's maximum gets an equal share of
/// the probability mass; the rest get zero.
pub fn best_response_policy(scores: &Policy) -> Policy {
    scores
        .iter()
        .map(|(key, score)| {
            let max = score.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let ties = score.iter().filter(|&&s| s == max).count() as f64;
            let policy = score
                .iter()
                .map(|&s| if s == max { 1.0 / ties } else { 0.0 })
                .collect();
            (key.clone(), policy)
        })
        .collect()
}

/// Strategy stored at `key`, or uniform when the key is absent.
fn policy_at(policy: &Policy, key: &str, num_actions: usize) -> Result<Vec<f64>, CfrError> {
    match policy.get(key) {
        Some(strategy) if strategy.len() != num_actions => {
            Err(CfrError::InconsistentInformationSet {
                key: key.to_string(),
                expected: strategy.len(),
                found: num_actions,
            })
        }
        Some(strategy) => Ok(strategy.clone()),
        None => Ok(uniform(num_actions)),
    }
}

fn add_scores(scores: &mut Policy, key: &str, increments: &[f64]) -> Result<(), CfrError> {
    let entry = scores
        .entry(key.to_string())
        .or_insert_with(|| vec![0.0; increments.len()]);
    if entry.len() != increments.len() {
        return Err(CfrError::InconsistentInformationSet {
            key: key.to_string(),
            expected: entry.len(),
            found: increments.len(),
        });
    }
    for (total, increment) in entry.iter_mut().zip(increments) {
        *total += increment;
    }
    Ok(())
}

fn merge_scores(scores: &mut Policy, deal: Policy) -> Result<(), CfrError> {
    // Sorted so float sums do not depend on hash iteration order.
    let mut entries: Vec<(String, Vec<f64>)> = deal.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (key, increments) in entries {
        add_scores(scores, &key, &increments)?;
    }
    Ok(())
}

fn first_max_index(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, value) in values.enumerate() {
        if value > best_value {
            best = i;
            best_value = value;
        }
    }
    best
}
