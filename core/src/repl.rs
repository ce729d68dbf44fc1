//! The read-dispatch loop.
//!
//! [`Repl`] is a two-state machine (`Running` then `Terminated`). Reading is
//! abstracted behind [`LineSource`] so the loop runs the same against a line
//! editor, piped stdin or a scripted test source.

use std::io;

use tracing::info;

use crate::dispatch::{Control, Dispatcher, Session};

/// Notice shown when the user interrupts or signals end of input.
pub const EXIT_HINT: &str = "Use `exit` to exit shell";

/// Outcome of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// A line of input (without the trailing newline).
    Line(String),
    /// Interrupt signal during the read (Ctrl-C).
    Interrupted,
    /// End-of-input signal from an interactive terminal (Ctrl-D).
    Eof,
    /// The underlying stream is exhausted for good.
    Closed,
}

/// Source of input lines.
pub trait LineSource {
    /// Blocks until the next event.
    ///
    /// # Errors
    ///
    /// An I/O failure of the underlying stream ends the loop with that error.
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadEvent>;
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    /// Reading and dispatching.
    Running,
    /// `exit` seen or input closed.
    Terminated,
}

/// Interactive loop over a [`Dispatcher`].
#[derive(Debug)]
pub struct Repl<'d, C> {
    dispatcher: &'d Dispatcher<C>,
    state: ReplState,
}

impl<'d, C: Session> Repl<'d, C> {
    /// Creates a running loop.
    pub fn new(dispatcher: &'d Dispatcher<C>) -> Self {
        Self {
            dispatcher,
            state: ReplState::Running,
        }
    }

    /// Current state.
    pub fn state(&self) -> ReplState {
        self.state
    }

    /// Performs one read and handles it. Does nothing once terminated.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from `source`; the loop is terminated first.
    pub fn step(&mut self, ctx: &mut C, source: &mut impl LineSource) -> io::Result<ReplState> {
        if self.state == ReplState::Terminated {
            return Ok(self.state);
        }

        let event = match source.read_line(&ctx.prompt()) {
            Ok(event) => event,
            Err(err) => {
                self.state = ReplState::Terminated;
                return Err(err);
            }
        };

        match event {
            ReadEvent::Line(line) => {
                if self.dispatcher.run_line(ctx, &line) == Control::Exit {
                    info!("exit requested");
                    self.state = ReplState::Terminated;
                }
            }
            ReadEvent::Interrupted | ReadEvent::Eof => ctx.report_notice(EXIT_HINT),
            ReadEvent::Closed => {
                info!("input closed");
                self.state = ReplState::Terminated;
            }
        }
        Ok(self.state)
    }

    /// Runs until terminated.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from `source`.
    pub fn run(&mut self, ctx: &mut C, source: &mut impl LineSource) -> io::Result<()> {
        while self.step(ctx, source)? == ReplState::Running {}
        Ok(())
    }
}
