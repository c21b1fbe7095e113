//! Headless level runner
//!
//! Plays a chart frame by frame, either idle or with the autoplay bot, and
//! prints the level summary as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use rhythm_judge::audio::MusicTrack;
use rhythm_judge::sim::{LevelPhase, LevelState, TickInput, tick};
use rhythm_judge::{Chart, Settings};

#[derive(Parser, Debug)]
#[command(name = "rhythm-judge", about = "Frame-stepped lane rhythm game runner")]
struct Args {
    /// Chart file to play
    chart: PathBuf,

    /// Level number (selects target score and combat)
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// Stop after this many frames even if the level is not finished
    #[arg(long, default_value_t = 20_000)]
    frames: u32,

    /// Let the bot play
    #[arg(long)]
    autoplay: bool,

    /// Override the enemy spawn seed
    #[arg(long)]
    seed: Option<u64>,

    /// Settings JSON file
    #[arg(long, default_value = "settings.json")]
    config: PathBuf,

    /// Background music for the level
    #[arg(long)]
    music: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Rhythm Judge starting...");

    let mut settings = Settings::load(&args.config);
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let Some(config) = settings.level(args.level).copied() else {
        bail!("no configuration for level {}", args.level);
    };

    let chart = Chart::load(&args.chart)
        .with_context(|| format!("failed to load level {} chart", args.level))?;

    let mut music = match &args.music {
        Some(path) => MusicTrack::open(path, settings.effective_music_volume()),
        None => MusicTrack::silent(),
    };

    let mut state = LevelState::new(chart, &config, &settings);
    let input = TickInput {
        autoplay: args.autoplay,
        ..Default::default()
    };

    music.start();
    for _ in 0..args.frames {
        tick(&mut state, &input);
        for event in state.drain_events() {
            log::debug!("frame {}: {event:?}", state.ctx.frame);
            music.handle_event(&event);
        }
        if state.phase == LevelPhase::Finished {
            break;
        }
    }
    music.stop();

    if state.phase != LevelPhase::Finished {
        log::warn!("Frame limit {} reached before the level finished", args.frames);
    }

    let summary = serde_json::to_string_pretty(&state.summary()).context("failed to encode summary")?;
    println!("{summary}");
    Ok(())
}
