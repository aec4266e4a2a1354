extern crate cfr_poker;

#[cfg(test)]
mod tests {
    use cfr_poker::cfr::{CfrTrainer, ExploitabilityEvaluator, GameState, InfoSetTable, TrainingConfig};
    use cfr_poker::games::kuhn::{KuhnState, MultiKuhnState};
    use cfr_poker::games::leduc::{LeducState, MultiLeducState};

    fn run<G: GameState>(game: G, iterations: u64, seed: u64) -> CfrTrainer<G> {
        let mut trainer = CfrTrainer::new(game, TrainingConfig::default().with_seed(seed));
        for _ in 0..iterations {
            trainer.run_iteration().unwrap();
        }
        trainer
    }

    #[test]
    fn kuhn_1000_iterations() {
        let config = TrainingConfig::default()
            .with_iterations(1_000)
            .with_eval_step(500)
            .with_seed(42);
        let mut trainer = CfrTrainer::new(KuhnState::new(), config);
        let stats = trainer.train().unwrap();
        assert_eq!(stats.iterations, 1_000);
        assert_eq!(stats.info_sets, 12);

        for (key, strategy) in trainer.table().sorted_summary() {
            let sum: f64 = strategy.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", key, sum);
            assert!(strategy.iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    fn same_seed_same_strategies() {
        let first = run(LeducState::new(), 2_000, 7);
        let second = run(LeducState::new(), 2_000, 7);

        assert_eq!(first.table().sorted_summary(), second.table().sorted_summary());
        assert_eq!(first.average_utilities(), second.average_utilities());
        assert_eq!(
            first.exploitability().unwrap().to_bits(),
            second.exploitability().unwrap().to_bits()
        );
    }

    #[test]
    fn info_set_counts() {
        assert_eq!(run(KuhnState::new(), 1_000, 42).num_info_sets(), 12);
        assert_eq!(run(MultiKuhnState::default(), 2_000, 42).num_info_sets(), 48);
        assert_eq!(run(LeducState::new(), 2_000, 42).num_info_sets(), 36);

        let mut trainer = run(MultiLeducState::default(), 5_000, 42);
        assert_eq!(trainer.num_info_sets(), 720);
        for _ in 0..1_000 {
            trainer.run_iteration().unwrap();
        }
        assert_eq!(trainer.num_info_sets(), 720);
    }

    #[test]
    fn uniform_profile_is_exploitable() {
        let evaluator = ExploitabilityEvaluator::default();
        let empty = InfoSetTable::new();
        assert!(evaluator.exploitability(&KuhnState::new(), &empty).unwrap() > 0.0);
        assert!(evaluator.exploitability(&LeducState::new(), &empty).unwrap() > 0.0);
    }

    #[test]
    fn leduc_training_reduces_exploitability() {
        let evaluator = ExploitabilityEvaluator::default();
        let game = LeducState::new();
        let uniform = evaluator.exploitability(&game, &InfoSetTable::new()).unwrap();

        let trainer = run(game, 3_000, 42);
        let trained = trainer.exploitability().unwrap();
        assert!(trained < uniform, "trained {} vs uniform {}", trained, uniform);
    }

    #[test]
    fn kuhn_converges() {
        let config = TrainingConfig::default()
            .with_iterations(50_000)
            .with_eval_step(10_000)
            .with_seed(42);
        let mut trainer = CfrTrainer::new(KuhnState::new(), config);
        let stats = trainer.train().unwrap();

        assert_eq!(stats.exploitability_history.len(), 5);
        let exploitability = stats.exploitability.unwrap();
        assert!(exploitability < 0.05, "exploitability {}", exploitability);

        // Actions are [bet, check]: facing a bet that is [call, fold].
        let king_facing_bet = trainer.average_strategy("K-B", 2).unwrap();
        assert!(king_facing_bet[0] > 0.95, "{:?}", king_facing_bet);
        let jack_facing_bet = trainer.average_strategy("J-B", 2).unwrap();
        assert!(jack_facing_bet[1] > 0.95, "{:?}", jack_facing_bet);
    }

    #[test]
    fn warm_start_is_not_counted() {
        let config = TrainingConfig::default()
            .with_iterations(500)
            .with_eval_step(500)
            .with_warm_start(500)
            .with_seed(3);
        let mut trainer = CfrTrainer::new(MultiKuhnState::new(2).unwrap(), config);
        let stats = trainer.train().unwrap();
        assert_eq!(stats.iterations, 500);
        assert_eq!(stats.exploitability_history.len(), 1);
        assert_eq!(trainer.iteration(), 1_000);
    }
}
