//! Per-information-set regret and strategy accumulator.

use serde::{Deserialize, Serialize};

/// Cumulative regrets and strategy sums for one information set.
///
/// Both vectors always have one entry per legal action at the key this set
/// belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationSet {
    /// Cumulative counterfactual regret per action (may be negative).
    cumulative_regrets: Vec<f64>,
    /// Reach-weighted sum of the strategies played so far.
    strategy_sum: Vec<f64>,
}

impl InformationSet {
    /// Create an information set with all-zero accumulators.
    pub fn new(num_actions: usize) -> Self {
        Self {
            cumulative_regrets: vec![0.0; num_actions],
            strategy_sum: vec![0.0; num_actions],
        }
    }

    /// Number of actions at this information set.
    pub fn num_actions(&self) -> usize {
        self.cumulative_regrets.len()
    }

    /// Cumulative regret per action.
    pub fn cumulative_regrets(&self) -> &[f64] {
        &self.cumulative_regrets
    }

    /// Reach-weighted strategy sum per action.
    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    /// Regret-matching strategy, accumulated into the strategy sum.
    ///
    /// `reach_probability` is the acting player's own probability of reaching
    /// this information set under the current profile. Weighting the running
    /// sum by it is what makes the average strategy converge.
    pub fn strategy(&mut self, reach_probability: f64) -> Vec<f64> {
        let strategy = self.current_strategy();
        for (sum, &prob) in self.strategy_sum.iter_mut().zip(&strategy) {
            *sum += reach_probability * prob;
        }
        strategy
    }

    /// Regret-matching strategy without touching the strategy sum.
    ///
    /// Proportional to the positive part of the cumulative regrets; uniform
    /// when no action has positive regret.
    pub fn current_strategy(&self) -> Vec<f64> {
        normalize(self.cumulative_regrets.iter().map(|&r| r.max(0.0)).collect())
    }

    /// Normalized strategy sum: the equilibrium approximation.
    pub fn average_strategy(&self) -> Vec<f64> {
        normalize(self.strategy_sum.clone())
    }

    /// Average strategy with every entry below `threshold` zeroed and the rest
    /// renormalized. Uniform if nothing survives the cut.
    pub fn average_strategy_with_threshold(&self, threshold: f64) -> Vec<f64> {
        let average = self
            .average_strategy()
            .into_iter()
            .map(|prob| if prob < threshold { 0.0 } else { prob })
            .collect();
        normalize(average)
    }

    /// Add one regret delta per action.
    pub fn add_regrets(&mut self, regrets: &[f64]) {
        debug_assert_eq!(regrets.len(), self.num_actions());
        for (cumulative, &regret) in self.cumulative_regrets.iter_mut().zip(regrets) {
            *cumulative += regret;
        }
    }

    /// Zero the strategy sum. Regrets are kept.
    pub fn reset(&mut self) {
        self.strategy_sum.iter_mut().for_each(|sum| *sum = 0.0);
    }
}

/// Scale to a probability vector, falling back to uniform for a zero sum.
pub(crate) fn normalize(mut weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
        weights
    } else {
        uniform(weights.len())
    }
}

/// Uniform distribution over `num_actions` actions.
pub(crate) fn uniform(num_actions: usize) -> Vec<f64> {
    vec![1.0 / num_actions as f64; num_actions]
}
