//! Terminal match-3 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `match3::term`.
//! Configuration comes from `MATCH3_*` environment variables; logs go to the
//! file named by `MATCH3_LOG_PATH` (stdout is the game screen).

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use match3::core::{GameConfig, GameSnapshot, GameState, Selection, TurnOutcome};
use match3::input::{handle_key_event, mouse_click, should_quit};
use match3::term::{FrameBuffer, GameView, Playback, PlaybackFrame, TerminalRenderer, Viewport};
use match3::types::FRAME_MS;

fn main() -> Result<()> {
    init_logging()?;

    let config = GameConfig::from_env();
    config.validate().context("invalid MATCH3_* configuration")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var("MATCH3_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("cannot open log file {path}"))?;
    let filter = EnvFilter::try_from_env("MATCH3_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<()> {
    let mut game = GameState::new(config)?;
    info!(
        seed = config.seed,
        size = config.board.size,
        palette = config.board.palette_size,
        "game started"
    );

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut frame = PlaybackFrame::default();
    // While set, input is not fed to the game.
    let mut playback: Option<Playback> = None;

    let frame_duration = Duration::from_millis(FRAME_MS as u64);
    let mut last_frame = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        game.snapshot_into(&mut snap);
        match &playback {
            Some(pb) => {
                pb.frame_into(&mut frame);
                view.render_into_with_playback(&snap, Some(&frame), viewport, &mut fb);
            }
            None => view.render_into(&snap, viewport, &mut fb),
        }
        term.draw_swap(&mut fb)?;

        // Input with timeout until next frame.
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!(score = game.score(), moves = game.moves(), "quit");
                        return Ok(());
                    }
                    if playback.is_none() {
                        if let Some(action) = handle_key_event(key) {
                            game.apply_action(action);
                            if let Some(outcome) = game.take_last_outcome() {
                                playback = Some(start_playback(&game, &outcome));
                            }
                        }
                    }
                }
                Event::Mouse(mouse) if playback.is_none() => {
                    let cell = mouse_click(mouse)
                        .and_then(|(col, row)| view.hit_test(snap.size, viewport, col, row));
                    if let Some(pos) = cell {
                        match game.select(pos) {
                            Ok(Selection::Swapped(outcome)) => {
                                playback = Some(start_playback(&game, &outcome));
                            }
                            Ok(_) => {}
                            Err(err) => warn!(%err, "click rejected"),
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Advance playback.
        let elapsed = last_frame.elapsed();
        if elapsed >= frame_duration {
            last_frame = Instant::now();
            let dt = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            if let Some(pb) = playback.as_mut() {
                if !pb.tick(dt) {
                    playback = None;
                }
            }
        }
    }
}

fn start_playback(game: &GameState, outcome: &TurnOutcome) -> Playback {
    debug!(
        a = %outcome.a,
        b = %outcome.b,
        depth = outcome.depth(),
        gained = outcome.score_gained,
        reverted = outcome.reverted,
        "turn played"
    );
    let snap = game.snapshot();
    Playback::new(outcome, &snap.tiles, snap.size)
}
