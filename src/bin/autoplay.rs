use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use term_2048::engine::Outcome;
use term_2048::expectimax::ExpectimaxConfig;
use term_2048::game::{Game, GameOptions, GameSummary};
use term_2048::player::SearchPlayer;
use term_2048::render::NullRenderer;

#[derive(Debug, Parser)]
#[command(name = "autoplay", about = "Headless batch of AI games with summary stats")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u64,

    /// Search depth
    #[arg(long, default_value_t = 2)]
    depth: u32,

    /// Spawn samples per move and level
    #[arg(long, default_value_t = 4)]
    samples: usize,

    /// Use the parallel search
    #[arg(long)]
    parallel: bool,

    /// Base seed; game `i` uses `seed + i`
    #[arg(long)]
    seed: Option<u64>,

    /// Per-game: stop after this many turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let cfg = ExpectimaxConfig {
        depth: args.depth.max(1),
        samples: args.samples.max(1),
        parallel: args.parallel,
        ..Default::default()
    };
    let options = GameOptions { max_turns: args.max_turns };

    let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new(args.games) };
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games | {elapsed_precise} | {msg}")?
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let start = Instant::now();
    let mut summaries: Vec<GameSummary> = Vec::with_capacity(args.games as usize);
    for i in 0..args.games {
        let (mut game, mut player) = match args.seed {
            Some(seed) => {
                let base = seed.wrapping_add(i);
                let search_seed = base.wrapping_mul(31).wrapping_add(7);
                (Game::new(StdRng::seed_from_u64(base)), SearchPlayer::with_seed(cfg.clone(), search_seed))
            }
            None => (Game::new(StdRng::from_entropy()), SearchPlayer::new(cfg.clone())),
        };
        let summary = game.run(&mut player, &mut NullRenderer, options)?;
        log::info!("game {i}: {:?} in {} turns, highest tile {}", summary.outcome, summary.turns, summary.highest_tile);
        summaries.push(summary);
        let wins = summaries.iter().filter(|s| s.outcome == Outcome::Won).count();
        pb.set_message(format!("wins: {wins}"));
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_report(&summaries, start.elapsed());
    Ok(())
}

fn print_report(summaries: &[GameSummary], elapsed: Duration) {
    let games = summaries.len().max(1) as f64;
    let wins = summaries.iter().filter(|s| s.outcome == Outcome::Won).count();
    let losses = summaries.iter().filter(|s| s.outcome == Outcome::Lost).count();
    let total_turns: u64 = summaries.iter().map(|s| s.turns).sum();
    let mut tiles: BTreeMap<u32, usize> = BTreeMap::new();
    for s in summaries {
        *tiles.entry(s.highest_tile).or_default() += 1;
    }

    println!(
        "Games: {} | won: {} | lost: {} | stopped: {} | mean turns: {:.1} | elapsed: {:.1}s",
        summaries.len(),
        wins,
        losses,
        summaries.len() - wins - losses,
        total_turns as f64 / games,
        elapsed.as_secs_f64()
    );
    println!("Highest tile reached:");
    for (tile, count) in tiles.iter().rev() {
        println!("  {:>5}: {:>4} ({:.1}%)", tile, count, *count as f64 * 100.0 / games);
    }
}
