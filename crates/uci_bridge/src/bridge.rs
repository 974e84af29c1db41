//! Engine process lifecycle and the asynchronous best-move cycle
//!
//! [`EngineBridge`] owns one engine child process. Startup (spawn + UCI
//! handshake) blocks the caller, since the session cannot proceed without an
//! engine. After that every operation is non-blocking: commands are queued to
//! a driver task on the tokio runtime, which owns the engine's pipes and
//! reports each finished search as one [`EngineEvent`] on a crossbeam channel.
//!
//! # Threading
//!
//! ```text
//! session thread                    tokio runtime
//! ──────────────                    ─────────────
//! request_best_move() ──mpsc──►  driver task ──stdin──► engine
//!                                     │      ◄─stdout──
//! events.recv()  ◄──crossbeam── EngineEvent
//! ```
//!
//! The session never touches the pipes and the driver never touches session
//! state, so all game-state mutation stays on the consumer of the channel.
//!
//! The runtime passed to [`EngineBridge::start`] must be multi-threaded: the
//! driver task has to make progress while the session thread is idle.

use crate::budget::SearchBudget;
use crate::config::EngineConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::protocol::{self, EngineLine, EnginePosition, EngineReply};
use crossbeam_channel::Sender;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, trace, warn};

/// How long `stop` waits for a polite `quit` before killing the process
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Outcome of one best-move request, delivered exactly once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine finished its search
    Reply(EngineReply),
    /// The engine died, closed its output or overran its budget
    Failure { message: String },
}

enum BridgeCommand {
    Search {
        position: EnginePosition,
        budget: SearchBudget,
    },
    NewGame,
    Quit,
}

#[derive(Debug, Clone, Copy)]
struct DriverTimings {
    handshake_timeout: Duration,
    reply_grace: Duration,
}

impl From<&EngineConfig> for DriverTimings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            handshake_timeout: config.handshake_timeout,
            reply_grace: config.reply_grace,
        }
    }
}

/// Line-oriented UCI conversation over any async pipe pair
pub(crate) struct EngineIo<W, R> {
    writer: W,
    lines: Lines<R>,
    /// `bestmove` lines still owed by searches that timed out
    stale_replies: usize,
}

impl<W, R> EngineIo<W, R>
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    pub(crate) fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            lines: reader.lines(),
            stale_replies: 0,
        }
    }

    pub(crate) async fn send(&mut self, command: &str) -> BridgeResult<()> {
        trace!("[ENGINE] > {}", command);
        self.writer.write_all(command.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn next_line(&mut self) -> BridgeResult<EngineLine> {
        match self.lines.next_line().await? {
            Some(line) => {
                trace!("[ENGINE] < {}", line);
                Ok(protocol::parse_line(&line))
            }
            None => Err(BridgeError::Disconnected),
        }
    }

    async fn wait_for_uciok(&mut self) -> BridgeResult<Option<String>> {
        let mut name = None;
        loop {
            match self.next_line().await? {
                EngineLine::UciOk => return Ok(name),
                EngineLine::Id { name: id } => name = Some(id),
                _ => {}
            }
        }
    }

    async fn wait_for_readyok(&mut self) -> BridgeResult<()> {
        loop {
            match self.next_line().await? {
                EngineLine::ReadyOk => return Ok(()),
                // A late answer to a timed-out search is settled here
                EngineLine::BestMove(reply) if self.stale_replies > 0 => {
                    self.stale_replies -= 1;
                    debug!("[ENGINE] Discarding stale reply {:?}", reply.best_move);
                }
                _ => {}
            }
        }
    }

    /// `isready` round trip
    pub(crate) async fn sync(&mut self, limit: Duration) -> BridgeResult<()> {
        self.send("isready").await?;
        timeout(limit, self.wait_for_readyok())
            .await
            .map_err(|_| BridgeError::Timeout {
                waiting_for: "readyok",
            })?
    }

    /// Full startup sequence; returns the engine's advertised name
    pub(crate) async fn handshake(
        &mut self,
        options: &[(String, String)],
        limit: Duration,
    ) -> BridgeResult<Option<String>> {
        self.send("uci").await?;
        let name = timeout(limit, self.wait_for_uciok())
            .await
            .map_err(|_| BridgeError::Timeout {
                waiting_for: "uciok",
            })??;

        for (option, value) in options {
            self.send(&protocol::set_option(option, value)).await?;
        }

        self.sync(limit).await?;
        self.send("ucinewgame").await?;
        Ok(name)
    }

    pub(crate) async fn search(
        &mut self,
        position: &EnginePosition,
        budget: SearchBudget,
        grace: Duration,
    ) -> BridgeResult<EngineReply> {
        self.send(&protocol::position(position)).await?;
        self.send(&protocol::go_movetime(budget)).await?;

        let waited = timeout(budget.as_duration() + grace, async {
            loop {
                if let EngineLine::BestMove(reply) = self.next_line().await? {
                    if self.stale_replies > 0 {
                        self.stale_replies -= 1;
                        debug!("[ENGINE] Discarding stale reply {:?}", reply.best_move);
                        continue;
                    }
                    return Ok::<_, BridgeError>(reply);
                }
            }
        })
        .await;

        match waited {
            Ok(result) => result,
            Err(_) => {
                // The engine still owes a bestmove for this search.
                self.stale_replies += 1;
                if let Err(e) = self.send("stop").await {
                    warn!("[ENGINE] Could not stop the overdue search: {}", e);
                }
                Err(BridgeError::Timeout {
                    waiting_for: "bestmove",
                })
            }
        }
    }
}

async fn launch(
    config: &EngineConfig,
) -> BridgeResult<(
    Child,
    EngineIo<ChildStdin, BufReader<ChildStdout>>,
    Option<String>,
)> {
    let mut child = Command::new(&config.path)
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BridgeError::Spawn {
            path: config.path.display().to_string(),
            source,
        })?;

    let stdin = child.stdin.take().ok_or_else(|| BridgeError::Handshake {
        message: "engine stdin was not captured".to_string(),
    })?;
    let stdout = child.stdout.take().ok_or_else(|| BridgeError::Handshake {
        message: "engine stdout was not captured".to_string(),
    })?;

    let mut io = EngineIo::new(stdin, BufReader::new(stdout));
    let name = io
        .handshake(&config.options, config.handshake_timeout)
        .await
        .map_err(|e| match e {
            BridgeError::Disconnected => BridgeError::Handshake {
                message: "engine exited during the UCI handshake".to_string(),
            },
            other => other,
        })?;

    Ok((child, io, name))
}

async fn drive<W, R>(
    mut io: EngineIo<W, R>,
    mut commands: mpsc::UnboundedReceiver<BridgeCommand>,
    events: Sender<EngineEvent>,
    in_flight: Arc<AtomicBool>,
    timings: DriverTimings,
) where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    while let Some(command) = commands.recv().await {
        match command {
            BridgeCommand::Search { position, budget } => {
                debug!(
                    "[ENGINE] Searching after {} moves with {}",
                    position.moves.len(),
                    budget
                );
                let event = match io.search(&position, budget, timings.reply_grace).await {
                    Ok(reply) => {
                        info!(
                            "[ENGINE] bestmove {} ponder {}",
                            reply.best_move.as_deref().unwrap_or("(none)"),
                            reply.ponder.as_deref().unwrap_or("(none)")
                        );
                        EngineEvent::Reply(reply)
                    }
                    Err(e) => {
                        error!("[ENGINE] Search failed: {}", e);
                        EngineEvent::Failure {
                            message: e.to_string(),
                        }
                    }
                };

                // Cleared before delivery so the consumer can ask again at once.
                in_flight.store(false, Ordering::SeqCst);
                if events.send(event).is_err() {
                    warn!("[ENGINE] Event receiver dropped, stopping driver");
                    break;
                }
            }
            BridgeCommand::NewGame => {
                let result: BridgeResult<()> = async {
                    io.send("ucinewgame").await?;
                    io.sync(timings.handshake_timeout).await
                }
                .await;
                if let Err(e) = result {
                    warn!("[ENGINE] ucinewgame failed: {}", e);
                }
            }
            BridgeCommand::Quit => {
                if let Err(e) = io.send("quit").await {
                    debug!("[ENGINE] quit not delivered: {}", e);
                }
                break;
            }
        }
    }
    debug!("[ENGINE] Driver task finished");
}

/// Handle to one running engine process
pub struct EngineBridge {
    runtime: Handle,
    child: Option<Child>,
    commands: mpsc::UnboundedSender<BridgeCommand>,
    driver: Option<JoinHandle<()>>,
    in_flight: Arc<AtomicBool>,
    budget: SearchBudget,
    engine_name: Option<String>,
    stopped: bool,
}

impl EngineBridge {
    /// Launch the engine, run the UCI handshake and start the driver task
    ///
    /// Blocks until the engine has answered `readyok`. Search results are
    /// delivered on `events`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::Spawn`] if the executable cannot be started
    /// - [`BridgeError::Handshake`] / [`BridgeError::Timeout`] if it does not
    ///   speak UCI
    pub fn start(
        config: EngineConfig,
        runtime: Handle,
        events: Sender<EngineEvent>,
    ) -> BridgeResult<Self> {
        info!(
            "[ENGINE] Launching {} {}",
            config.path.display(),
            config.args.join(" ")
        );

        let (child, io, engine_name) = runtime.block_on(launch(&config))?;
        info!(
            "[ENGINE] Ready: {}",
            engine_name.as_deref().unwrap_or("unnamed engine")
        );

        let (commands, receiver) = mpsc::unbounded_channel();
        let in_flight = Arc::new(AtomicBool::new(false));
        let driver = runtime.spawn(drive(
            io,
            receiver,
            events,
            in_flight.clone(),
            DriverTimings::from(&config),
        ));

        Ok(Self {
            runtime,
            child: Some(child),
            commands,
            driver: Some(driver),
            in_flight,
            budget: SearchBudget::default(),
            engine_name,
            stopped: false,
        })
    }

    /// Name from the engine's `id name` line, if it sent one
    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    pub fn search_budget(&self) -> SearchBudget {
        self.budget
    }

    /// Store the thinking time for the next request, clamped to 1–10 s
    pub fn set_search_budget(&mut self, millis: u64) -> SearchBudget {
        self.budget = SearchBudget::clamped(millis);
        debug!("[ENGINE] Search budget set to {}", self.budget);
        self.budget
    }

    /// True while a request has been issued and its event not yet sent
    pub fn is_searching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Ask for a best move in `position`; returns immediately
    ///
    /// # Errors
    ///
    /// - [`BridgeError::RequestInFlight`] if the previous request has not
    ///   produced its event yet
    /// - [`BridgeError::Disconnected`] if the driver task is gone
    pub fn request_best_move(&self, position: EnginePosition) -> BridgeResult<()> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(BridgeError::RequestInFlight);
        }

        let command = BridgeCommand::Search {
            position,
            budget: self.budget,
        };
        if self.commands.send(command).is_err() {
            self.in_flight.store(false, Ordering::SeqCst);
            return Err(BridgeError::Disconnected);
        }
        Ok(())
    }

    /// Queue `ucinewgame` behind any earlier command
    pub fn new_game(&self) -> BridgeResult<()> {
        self.commands
            .send(BridgeCommand::NewGame)
            .map_err(|_| BridgeError::Disconnected)
    }

    /// Terminate the engine. Never fails; calling it twice is a no-op.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        info!("[ENGINE] Stopping engine");

        let _ = self.commands.send(BridgeCommand::Quit);
        let driver = self.driver.take();
        let child = self.child.take();

        if Handle::try_current().is_ok() {
            // Cannot block inside the runtime; fall back to an immediate kill.
            if let Some(mut child) = child {
                let _ = child.start_kill();
            }
            return;
        }

        self.runtime.block_on(async move {
            if let Some(driver) = driver {
                let _ = timeout(SHUTDOWN_GRACE, driver).await;
            }
            if let Some(mut child) = child {
                if timeout(SHUTDOWN_GRACE, child.wait()).await.is_err() {
                    debug!("[ENGINE] Engine ignored quit, killing it");
                    let _ = child.start_kill();
                    let _ = timeout(SHUTDOWN_GRACE, child.wait()).await;
                }
            }
        });
    }
}

impl Drop for EngineBridge {
    fn drop(&mut self) {
        self.stop();
    }
}
