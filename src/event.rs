//! Terminal event handling.
//!
//! A background thread polls crossterm for input and emits a [`Event::Tick`]
//! whenever the tick interval passes without input, so the simulated
//! services keep moving while the user is idle.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Events delivered to the main loop.
#[derive(Clone, Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Periodic tick that drives timers and expiry.
    Tick,
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
}

/// Reads terminal events on a background thread.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Spawns the reader. `tick_rate` is in milliseconds.
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                match event::poll(timeout) {
                    Ok(true) => {
                        let forwarded = match event::read() {
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                            Ok(_) => None,
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to read terminal event");
                                None
                            }
                        };
                        if let Some(event) = forwarded {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!(error = %e, "failed to poll terminal"),
                }

                if last_tick.elapsed() >= tick_rate {
                    // Receiver dropped: the app is shutting down
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx }
    }

    /// Blocks until the next event.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread has stopped.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
