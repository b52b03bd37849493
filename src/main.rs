use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use rand::rngs::StdRng;
use rand::SeedableRng;
use term_2048::config::{AppConfig, PlayMode};
use term_2048::error::PlayError;
use term_2048::game::{Game, GameOptions};
use term_2048::player::{KeyboardPlayer, Player, RandomPlayer, SearchPlayer};
use term_2048::render::TerminalRenderer;

#[derive(Debug, Parser)]
#[command(name = "term-2048", about = "Play 2048 in the terminal, or watch the AI play")]
struct Args {
    /// Optional TOML config file; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Who plays
    #[arg(long, value_enum)]
    mode: Option<PlayMode>,

    /// Shorthand for `--mode ai`
    #[arg(long, conflicts_with = "mode")]
    ai: bool,

    /// Search depth for the AI
    #[arg(long)]
    depth: Option<u32>,

    /// Spawn samples per move and level
    #[arg(long)]
    samples: Option<usize>,

    /// Use the parallel search
    #[arg(long)]
    parallel: bool,

    /// Seed for spawns and AI sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after each computer move, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Do not clear the screen between boards
    #[arg(long)]
    no_clear: bool,

    /// Stop after this many turns
    #[arg(long)]
    max_turns: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if self.ai {
            cfg.play.mode = PlayMode::Ai;
        }
        if let Some(mode) = self.mode { cfg.play.mode = mode; }
        if let Some(depth) = self.depth { cfg.search.depth = depth; }
        if let Some(samples) = self.samples { cfg.search.samples = samples; }
        if self.parallel { cfg.search.parallel = true; }
        if self.seed.is_some() { cfg.play.seed = self.seed; }
        if let Some(delay) = self.delay_ms { cfg.play.delay_ms = delay; }
        if self.no_clear { cfg.play.clear_screen = false; }
        if self.max_turns.is_some() { cfg.play.max_turns = self.max_turns; }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn build_player(cfg: &AppConfig) -> Box<dyn Player> {
    let delay = Duration::from_millis(cfg.play.delay_ms);
    match (cfg.play.mode, cfg.play.seed) {
        (PlayMode::Human, _) => Box::new(KeyboardPlayer::new()),
        (PlayMode::Ai, Some(seed)) => Box::new(SearchPlayer::with_seed(cfg.search.clone(), seed.wrapping_add(1)).with_delay(delay)),
        (PlayMode::Ai, None) => Box::new(SearchPlayer::new(cfg.search.clone()).with_delay(delay)),
        (PlayMode::Random, Some(seed)) => Box::new(RandomPlayer::with_seed(seed.wrapping_add(1)).with_delay(delay)),
        (PlayMode::Random, None) => Box::new(RandomPlayer::new().with_delay(delay)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cfg = Args::parse().into_config()?;
    log::debug!("config: {cfg:?}");

    let rng = match cfg.play.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(rng);
    let mut player = build_player(&cfg);
    let mut renderer = TerminalRenderer::stdout(cfg.play.clear_screen);
    let options = GameOptions { max_turns: cfg.play.max_turns };

    match game.run(player.as_mut(), &mut renderer, options) {
        Ok(_) => Ok(()),
        Err(PlayError::Quit) => {
            println!("Exiting...");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
