//! Storage for information sets built up during training.
//!
//! The table maps a representation key to its [`InformationSet`]. Entries are
//! created lazily on first visit and live as long as the trainer that owns
//! the table.

use rustc_hash::FxHashMap;

use crate::cfr::error::CfrError;
use crate::cfr::info_set::{uniform, InformationSet};

/// Average strategies (or any per-key action weights) keyed by representation.
pub type Policy = FxHashMap<String, Vec<f64>>;

/// Training table: representation key -> information set.
#[derive(Debug, Clone, Default)]
pub struct InfoSetTable {
    info_sets: FxHashMap<String, InformationSet>,
}

impl InfoSetTable {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            info_sets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Look up the information set for `key`, creating it on first visit.
    ///
    /// # Errors
    /// [`CfrError::InconsistentInformationSet`] if the key was stored earlier
    /// with a different action count.
    pub fn get_or_insert(
        &mut self,
        key: &str,
        num_actions: usize,
    ) -> Result<&mut InformationSet, CfrError> {
        let info_set = self.info_sets.entry(key.to_string()).or_insert_with(|| {
            log::trace!("new information set {} with {} actions", key, num_actions);
            InformationSet::new(num_actions)
        });

        if info_set.num_actions() != num_actions {
            return Err(CfrError::InconsistentInformationSet {
                key: key.to_string(),
                expected: info_set.num_actions(),
                found: num_actions,
            });
        }

        Ok(info_set)
    }

    /// Current regret-matching strategy for `key`, accumulated into its
    /// strategy sum with weight `reach_probability`.
    pub fn strategy(
        &mut self,
        key: &str,
        num_actions: usize,
        reach_probability: f64,
    ) -> Result<Vec<f64>, CfrError> {
        Ok(self.get_or_insert(key, num_actions)?.strategy(reach_probability))
    }

    /// Add one regret delta per action to `key`.
    pub fn update_regrets(&mut self, key: &str, regrets: &[f64]) -> Result<(), CfrError> {
        self.get_or_insert(key, regrets.len())?.add_regrets(regrets);
        Ok(())
    }

    /// Average strategy for `key`.
    ///
    /// A key that was never visited has an all-zero strategy sum, so its
    /// average strategy is uniform.
    pub fn average_strategy(&self, key: &str, num_actions: usize) -> Result<Vec<f64>, CfrError> {
        match self.info_sets.get(key) {
            Some(info_set) if info_set.num_actions() != num_actions => {
                Err(CfrError::InconsistentInformationSet {
                    key: key.to_string(),
                    expected: info_set.num_actions(),
                    found: num_actions,
                })
            }
            Some(info_set) => Ok(info_set.average_strategy()),
            None => Ok(uniform(num_actions)),
        }
    }

    /// Average strategy of every stored information set.
    pub fn average_strategies(&self) -> Policy {
        self.info_sets
            .iter()
            .map(|(key, info_set)| (key.clone(), info_set.average_strategy()))
            .collect()
    }

    /// Thresholded average strategy of every stored information set.
    pub fn thresholded_strategies(&self, threshold: f64) -> Policy {
        self.info_sets
            .iter()
            .map(|(key, info_set)| {
                (
                    key.clone(),
                    info_set.average_strategy_with_threshold(threshold),
                )
            })
            .collect()
    }

    /// Zero every strategy sum, keeping regrets.
    pub fn reset_strategy_sums(&mut self) {
        self.info_sets.values_mut().for_each(InformationSet::reset);
    }

    /// `(key, average strategy)` pairs sorted by key length, then key.
    pub fn sorted_summary(&self) -> Vec<(String, Vec<f64>)> {
        let mut summary: Vec<(String, Vec<f64>)> = self.average_strategies().into_iter().collect();
        summary.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        summary
    }

    /// Get the information set stored for `key`.
    pub fn get(&self, key: &str) -> Option<&InformationSet> {
        self.info_sets.get(key)
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, key: &str) -> bool {
        self.info_sets.contains_key(key)
    }

    /// Get the number of information sets stored.
    pub fn len(&self) -> usize {
        self.info_sets.len()
    }

    /// Whether no information set has been visited yet.
    pub fn is_empty(&self) -> bool {
        self.info_sets.is_empty()
    }

    /// All stored keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.info_sets.keys().map(String::as_str)
    }

    /// All stored information sets, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InformationSet)> {
        self.info_sets.iter().map(|(key, info_set)| (key.as_str(), info_set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation() {
        let mut table = InfoSetTable::new();
        assert!(table.is_empty());

        let strategy = table.strategy("K-", 2, 1.0).unwrap();
        assert_eq!(strategy, vec![0.5, 0.5]);
        assert_eq!(table.len(), 1);
        assert!(table.contains("K-"));
        assert_eq!(table.get("K-").unwrap().strategy_sum(), &[0.5, 0.5]);
    }

    #[test]
    fn test_action_count_mismatch_is_rejected() {
        let mut table = InfoSetTable::new();
        table.strategy("J-B", 2, 1.0).unwrap();

        let err = table.strategy("J-B", 3, 1.0).unwrap_err();
        assert_eq!(
            err,
            CfrError::InconsistentInformationSet {
                key: "J-B".to_string(),
                expected: 2,
                found: 3,
            }
        );
        assert!(table.update_regrets("J-B", &[1.0]).is_err());
        assert!(table.average_strategy("J-B", 1).is_err());
    }

    #[test]
    fn test_update_regrets_changes_strategy() {
        let mut table = InfoSetTable::new();
        table.update_regrets("Q-C", &[-1.0, 2.0]).unwrap();
        assert_eq!(table.strategy("Q-C", 2, 1.0).unwrap(), vec![0.0, 1.0]);
        assert_eq!(table.average_strategy("Q-C", 2).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_unseen_key_has_uniform_average() {
        let table = InfoSetTable::new();
        assert_eq!(table.average_strategy("K/J-R/C", 3).unwrap(), vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn test_reset_strategy_sums() {
        let mut table = InfoSetTable::new();
        table.update_regrets("K-", &[1.0, 0.0]).unwrap();
        table.strategy("K-", 2, 1.0).unwrap();
        table.reset_strategy_sums();

        let info_set = table.get("K-").unwrap();
        assert_eq!(info_set.strategy_sum(), &[0.0, 0.0]);
        assert_eq!(info_set.cumulative_regrets(), &[1.0, 0.0]);
    }

    #[test]
    fn test_sorted_summary_orders_by_key_length() {
        let mut table = InfoSetTable::new();
        for key in ["Q-C/B", "K-", "J-B", "J-"] {
            table.strategy(key, 2, 1.0).unwrap();
        }
        let keys: Vec<String> = table.sorted_summary().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["J-", "K-", "J-B", "Q-C/B"]);
    }

    #[test]
    fn test_thresholded_strategies_cover_every_key() {
        let mut table = InfoSetTable::new();
        table.update_regrets("K-", &[1.0, 0.0]).unwrap();
        table.strategy("K-", 2, 1.0).unwrap();
        table.strategy("J-", 2, 1.0).unwrap();

        let policy = table.thresholded_strategies(0.01);
        assert_eq!(policy.len(), 2);
        assert_eq!(policy["K-"], vec![1.0, 0.0]);
        assert_eq!(policy["J-"], vec![0.5, 0.5]);
    }
}
