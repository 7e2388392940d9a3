use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::game::{GameConfig, GameSession, RunState, TickOutcome};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Frame period of the terminal front-end (~60 Hz)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct HumanMode {
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let input_handler = InputHandler::new(config.speed_step);
        let session = GameSession::new(config).context("Invalid game configuration")?;

        Ok(Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session finished"
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Frames drive the scheduler; the game speed decides which frames tick
        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Advance and draw one frame
                _ = frame_timer.tick() => {
                    self.on_frame(Instant::now());
                    let snapshot = self.session.snapshot();
                    let speed = self.session.speed();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, speed, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if self.input_handler.handle_event(event) {
            self.should_quit = true;
        }
    }

    fn on_frame(&mut self, now: Instant) {
        let before = (self.session.engine().run_state(), self.session.engine().ticks());
        self.session.pump(&mut self.input_handler);
        let engine = self.session.engine();

        // a start or a reset put a fresh board in play
        let fresh_run = engine.run_state() == RunState::Running
            && engine.ticks() == 0
            && (before.1 > 0 || !matches!(before.0, RunState::Running | RunState::Paused));
        if fresh_run {
            self.metrics.on_game_start(now);
        }

        if let Some(TickOutcome::GameOver(_)) = self.session.on_frame(now) {
            self.metrics.on_game_over(self.session.engine().score());
        }

        let running = self.session.engine().run_state() == RunState::Running;
        self.metrics.update(now, running);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
