//! CFR training binary.
//!
//! Usage:
//!   cargo run --release --bin train -- [OPTIONS]
//!
//! Examples:
//!   train --game kuhn --iterations 100000
//!   train --game multi-leduc --players 3 --eval-step 5000 --output leduc3.json
//!
//! Set `RUST_LOG=debug` to see per-evaluation details.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use cfr_poker::cfr::{CfrTrainer, GameState, TrainingConfig};
use cfr_poker::games::kuhn::{KuhnState, MultiKuhnState};
use cfr_poker::games::leduc::{LeducState, MultiLeducState};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_MULTI_PLAYERS: usize = 3;

/// Rule set to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Game {
    /// 2-player Kuhn poker
    Kuhn,
    /// Kuhn poker for 2 to 4 players
    MultiKuhn,
    /// 2-player Leduc hold'em
    Leduc,
    /// Leduc hold'em for 2 to 4 players
    MultiLeduc,
}

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train vanilla CFR on Kuhn or Leduc poker and report exploitability")]
struct Cli {
    /// Rule set to train
    #[arg(short, long, value_enum, default_value = "kuhn")]
    game: Game,

    /// Number of players (multi-player variants only)
    #[arg(short, long)]
    players: Option<usize>,

    /// Training iterations (overrides config)
    #[arg(short, long)]
    iterations: Option<u64>,

    /// Compute exploitability every N iterations (overrides config)
    #[arg(long)]
    eval_step: Option<u64>,

    /// Random seed for the root deal (overrides config, default 42)
    #[arg(long)]
    seed: Option<u64>,

    /// Warm-start iterations whose strategy sums are discarded (overrides config)
    #[arg(long)]
    warm_start: Option<u64>,

    /// Average-strategy threshold used for evaluation (overrides config)
    #[arg(long)]
    threshold: Option<f64>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the training report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn training_config(&self) -> Result<TrainingConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::from_json_file(path)?,
            None => TrainingConfig::default(),
        };

        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(eval_step) = self.eval_step {
            config.eval_step = eval_step;
        }
        if let Some(warm_start) = self.warm_start {
            config.warm_start_iterations = warm_start;
        }
        if let Some(threshold) = self.threshold {
            config.strategy_threshold = threshold;
        }
        config.seed = self.seed.or(config.seed).or(Some(DEFAULT_SEED));

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.training_config()?;
    let output = cli.output.as_deref();

    if cli.players.is_some() && matches!(cli.game, Game::Kuhn | Game::Leduc) {
        warn!("--players is ignored for 2-player {:?}", cli.game);
    }
    let players = cli.players.unwrap_or(DEFAULT_MULTI_PLAYERS);

    info!("Game: {:?}", cli.game);
    info!("Config: {:?}", config);

    match cli.game {
        Game::Kuhn => run(KuhnState::new(), config, output),
        Game::MultiKuhn => run(MultiKuhnState::new(players)?, config, output),
        Game::Leduc => run(LeducState::new(), config, output),
        Game::MultiLeduc => run(MultiLeducState::new(players)?, config, output),
    }
}

fn run<G: GameState>(
    game: G,
    config: TrainingConfig,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let pb = ProgressBar::new(config.iterations);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let mut trainer = CfrTrainer::new(game, config);
    trainer.train_with_callback(|progress| {
        pb.set_position(progress.iteration);
        if let Some(exploitability) = progress.exploitability {
            pb.set_message(format!("exploitability {:.6}", exploitability));
            pb.suspend(|| {
                info!(
                    "Iteration {}: exploitability {:.6}",
                    progress.iteration, exploitability
                );
            });
        }
    })?;
    pb.finish_and_clear();

    let report = trainer.report();
    if let Some(exploitability) = report.final_exploitability {
        info!("Final exploitability: {:.6}", exploitability);
    }
    for (player, utility) in report.average_utilities.iter().enumerate() {
        info!("Player {} average utility: {:.6}", player + 1, utility);
    }
    info!("Information sets: {}", report.metadata.num_info_sets);
    info!(
        "Speed: {:.0} iterations/s",
        trainer.stats().iterations_per_second
    );
    for entry in &report.strategies {
        info!("{:>16}    {:.6?}", entry.info_key, entry.strategy);
    }

    if let Some(path) = output {
        report.save_json(path)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
