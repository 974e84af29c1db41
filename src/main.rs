use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{never, select, unbounded};
use remote_chess::core::{load_settings, save_settings, GameSettings};
use remote_chess::game::ai::{start_engine, EngineClient, EngineEvent};
use remote_chess::game::rules::board_state::ShakmatyRules;
use remote_chess::game::rules::RulesEngine;
use remote_chess::game::session::{GameSession, Notice, SessionUpdate};
use remote_chess::input::parse_command;
use remote_chess::rendering::{BoardPainter, ConsoleRenderer, Renderer};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RUNTIME_SHUTDOWN: Duration = Duration::from_millis(500);

/// Play chess against a UCI engine using remote-control key names
///
/// Type one key per line: up, down, left, right, 1-9, ok, red (undo),
/// green (hint), yellow (rotate), blue (switch sides), nextBouquet /
/// prevBouquet (thinking time), cancel. Square names such as `e2`, piece
/// names during promotion and `new` also work.
#[derive(Parser, Debug)]
#[command(name = "remote_chess", version)]
struct Args {
    /// UCI engine executable
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Argument for the engine process; repeat for several
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Thinking time per engine move, in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Start from this position instead of the initial one
    #[arg(long)]
    fen: Option<String>,

    #[arg(long)]
    black_at_bottom: bool,

    /// Plain text board without colour escapes
    #[arg(long)]
    no_color: bool,

    /// Write the merged settings back to the settings file
    #[arg(long)]
    save_settings: bool,
}

impl Args {
    fn apply(&self, settings: &mut GameSettings) {
        if let Some(path) = &self.engine {
            settings.engine_path = path.clone();
        }
        if !self.engine_args.is_empty() {
            settings.engine_args = self.engine_args.clone();
        }
        if let Some(movetime) = self.movetime {
            settings.search_budget_ms = movetime;
        }
        if self.black_at_bottom {
            settings.white_at_bottom = false;
        }
    }
}

struct Screen<W: Write> {
    painter: BoardPainter,
    canvas: ConsoleRenderer<W>,
}

impl<W: Write> Screen<W> {
    fn show<R: RulesEngine, E: EngineClient>(
        &mut self,
        session: &GameSession<R, E>,
        update: &SessionUpdate,
    ) -> io::Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        if update.rotated {
            self.painter
                .paint_coordinates(&mut self.canvas, session.orientation());
        }
        if update.rotated || !update.redraw.is_nothing() {
            self.painter
                .paint(&mut self.canvas, &session.snapshot(), &update.redraw);
            self.canvas.present()?;
        }

        let mut out = io::stdout().lock();
        if let Some(labels) = &update.labels {
            writeln!(
                out,
                "White: {}  Black: {}  (blue: {})",
                labels.white, labels.black, labels.switch_action
            )?;
        }
        if let Some(history) = &update.history {
            writeln!(out, "-- moves, page {} --", history.page + 1)?;
            for line in &history.lines {
                writeln!(out, "{line}")?;
            }
        }
        if let Some(prompt) = &update.promotion {
            for (index, (piece, uci)) in prompt.options.iter().enumerate() {
                let marker = if index == prompt.highlighted { '>' } else { ' ' };
                writeln!(out, "{marker} {} ({uci})", piece.name())?;
            }
        }
        for notice in [&update.status, &update.hint].into_iter().flatten() {
            if *notice != Notice::Cleared {
                writeln!(out, "{notice}")?;
            }
        }
        out.flush()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings();
    args.apply(&mut settings);
    settings.validate().context("invalid settings")?;
    if args.save_settings {
        let path = save_settings(&settings).context("could not save settings")?;
        info!("[SETTINGS] Saved to {}", path.display());
    }

    let rules = match &args.fen {
        Some(fen) => ShakmatyRules::from_fen(fen)?,
        None => ShakmatyRules::new(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start the tokio runtime")?;

    let (engine_tx, engine_rx) = unbounded::<EngineEvent>();
    let engine = start_engine(
        settings.engine_config(),
        runtime.handle().clone(),
        engine_tx,
        settings.search_budget(),
    )
    .with_context(|| format!("could not start engine {}", settings.engine_path.display()))?;

    let mut session = GameSession::new(
        rules,
        engine,
        settings.history_layout(),
        settings.orientation(),
    );
    let painter = BoardPainter::default();
    let mut screen = Screen {
        painter,
        canvas: ConsoleRenderer::new(io::stdout(), painter.geometry(), !args.no_color),
    };

    let (input_tx, input_rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_command(&line) {
                Some(event) => {
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!("[INPUT] Unknown command '{}'", line.trim()),
            }
        }
    });

    screen.show(&session, &session.initial_update())?;

    let closed = never();
    let mut engine_alive = true;
    while !session.is_closed() {
        let engine_events = if engine_alive { &engine_rx } else { &closed };
        let update = select! {
            recv(input_rx) -> event => match event {
                Ok(event) => session.handle(event),
                Err(_) => {
                    info!("[INPUT] End of input");
                    session.close()
                }
            },
            recv(engine_events) -> event => match event {
                Ok(event) => session.on_engine_event(event),
                Err(_) => {
                    engine_alive = false;
                    session.on_engine_event(EngineEvent::Failure {
                        message: "engine channel closed".to_string(),
                    })
                }
            },
        };
        screen.show(&session, &update)?;
    }

    drop(session);
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN);
    Ok(())
}
