//! Fixtures for handler tests: an in-memory shell with stub model clients.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use labelist_config::{OllamaSettings, default_lexicon};
use labelist_core::{Control, Dispatcher, Result, ShellError};
use labelist_sqlite::{ConverseStore, GlobalStore};

use crate::commands::build_registry;
use crate::console::Console;
use crate::context::AppContext;
use crate::embed::Embedder;
use crate::inference::{GenerateOptions, InferenceClient};

/// Cloneable in-memory sink.
#[derive(Debug, Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Returns and forgets everything written so far.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A generation request seen by [`StubInference`].
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub model: String,
    pub prompt: String,
    pub options: GenerateOptions,
}

/// Answers every prompt with `"echo: <prompt>"`, or fails when `offline`.
#[derive(Debug, Clone, Default)]
pub struct StubInference {
    pub calls: Rc<RefCell<Vec<Generated>>>,
    pub offline: bool,
}

impl InferenceClient for StubInference {
    fn generate(&self, model: &str, prompt: &str, options: &GenerateOptions) -> Result<String> {
        if self.offline {
            return Err(ShellError::Network("connection refused".into()));
        }
        self.calls.borrow_mut().push(Generated {
            model: model.to_string(),
            prompt: prompt.to_string(),
            options: *options,
        });
        Ok(format!("echo: {prompt}"))
    }
}

/// Embeds text as `[char count, word count]`.
#[derive(Debug, Clone, Default)]
pub struct StubEmbedder;

impl Embedder for StubEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![
            text.chars().count() as f32,
            text.split_whitespace().count() as f32,
        ])
    }
}

/// A complete shell over in-memory stores.
pub struct TestShell {
    pub ctx: AppContext,
    pub dispatcher: Dispatcher<AppContext>,
    pub inference: StubInference,
    capture: Capture,
}

impl TestShell {
    pub fn new() -> Self {
        Self::with_inference(StubInference::default())
    }

    pub fn with_inference(inference: StubInference) -> Self {
        let capture = Capture::default();
        let lexicon = default_lexicon().unwrap();
        let ctx = AppContext {
            console: Console::new(Box::new(capture.clone()), false).without_timestamps(),
            converse: ConverseStore::open_in_memory().unwrap(),
            globals: GlobalStore::open_in_memory().unwrap(),
            lexicon: lexicon.clone(),
            ollama: OllamaSettings::default(),
            inference: Box::new(inference.clone()),
            embedder: Box::new(StubEmbedder),
        };
        ctx.initialize().unwrap();
        Self {
            ctx,
            dispatcher: Dispatcher::new(build_registry(), lexicon),
            inference,
            capture,
        }
    }

    /// Runs one input line, as the REPL would.
    pub fn run(&mut self, line: &str) -> Control {
        self.dispatcher.run_line(&mut self.ctx, line)
    }

    /// Runs one statement and returns the handler's result.
    pub fn exec(&mut self, statement: &str) -> Result<()> {
        self.dispatcher.execute(&mut self.ctx, statement).map(|_| ())
    }

    /// Console output since the last call.
    pub fn output(&self) -> String {
        self.capture.take()
    }
}
