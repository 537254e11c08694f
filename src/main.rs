use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rl_peg_solitaire::ai::{CriticStrategy, Learner};
use rl_peg_solitaire::config::AppConfig;
use rl_peg_solitaire::game::{Board, Environment};
use rl_peg_solitaire::training::Trainer;

/// Train a Peg Solitaire actor-critic agent.
#[derive(Parser)]
#[command(name = "train", about = "Train a Peg Solitaire actor-critic agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override the run seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the critic strategy: table or network
    #[arg(long)]
    critic: Option<String>,

    /// Write the per-episode final peg counts as CSV
    #[arg(long)]
    history_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        config.training.num_episodes = episodes;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(critic) = &cli.critic {
        config.critic.strategy = match critic.as_str() {
            "table" => CriticStrategy::Table,
            "network" => CriticStrategy::Network,
            other => bail!("unknown critic strategy '{}' (expected 'table' or 'network')", other),
        };
    }
    config.validate().context("validating configuration")?;

    let board = Board::new(&config.board).context("building board")?;
    println!(
        "Board: {:?} size {} ({} cells, {} pegs)",
        board.shape(),
        board.size(),
        board.cell_count(),
        board.peg_count()
    );

    let mut env = Environment::new(board, config.reward.clone());
    let mut learner = Learner::new(
        config.actor.clone(),
        config.critic.clone(),
        env.board(),
        config.seed,
    )
    .context("setting up learner")?;

    let trainer = Trainer::new(config.training.clone());
    let report = trainer.train(&mut env, &mut learner);

    println!();
    println!("{}", report.summary);

    if let Some(record) = report.final_episode() {
        println!();
        println!(
            "Greedy episode ({} jumps, {} pegs left):",
            record.steps.len(),
            record.final_pegs
        );
        for step in &record.steps {
            println!("  {}", step.action);
        }
    }

    if let Some(path) = &cli.history_out {
        let mut csv = String::from("episode,final_pegs\n");
        for (i, record) in report.episodes.iter().enumerate() {
            csv.push_str(&format!("{},{}\n", i + 1, record.final_pegs));
        }
        std::fs::write(path, csv)
            .with_context(|| format!("writing history to {}", path.display()))?;
        println!();
        println!("Wrote learning curve to {}", path.display());
    }

    Ok(())
}
