//! Terminal Tetris runner (default binary).
//!
//! Single-threaded loop: poll the keyboard until the next frame is due, then
//! advance the game by one frame and redraw through the framebuffer renderer.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use term_tetris::config::{AppConfig, Args};
use term_tetris::core::{GameSnapshot, GameState};
use term_tetris::input::{should_quit, InputHandler};
use term_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::resolve(&args)?;
    init_logging(&args)?;

    let seed = config.seed.unwrap_or_else(seed_from_time);
    info!(seed, save_path = %config.save_path.display(), "starting");

    let mut term = TerminalRenderer::new();
    let release_events = term.enter()?;

    let result = run(&mut term, &config, seed, release_events);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// The terminal owns stdout, so logs only go to `--log-file` when given.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn seed_from_time() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: &AppConfig, seed: u32, release_events: bool) -> Result<()> {
    let mut game = GameState::new(seed).with_save_path(config.save_path.clone());
    let mut input = InputHandler::new()
        .with_release_timeout_ms(config.soft_drop_release_ms)
        .with_release_events(release_events);

    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let frame = Duration::from_millis(config.frame_ms);
    let mut next_frame = Instant::now();

    loop {
        let now = Instant::now();
        if now < next_frame {
            if event::poll(next_frame - now)? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Release && should_quit(key) {
                            info!(score = game.score(), "quit");
                            return Ok(());
                        }
                        if let Some(command) = input.handle_key_event(key) {
                            game.apply_command(command);
                        }
                    }
                    Event::Resize(..) => term.invalidate(),
                    _ => {}
                }
            }
            continue;
        }

        next_frame += frame;
        if next_frame < now {
            // Fell behind (suspended terminal, slow draw): do not try to catch up.
            next_frame = now + frame;
        }

        if let Some(command) = input.update() {
            game.apply_command(command);
        }
        game.frame();
        for event in game.take_events() {
            debug!(?event, "game event");
        }

        game.snapshot_into(&mut snap);
        let (w, h) = terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}
