//! Stand-in transformation connection that prints what a real one would send.

use promptdeck::{log_debug, ProcessingMode, TransformConnection};
use serde::Serialize;
use std::io::Write;

/// Events written in `--json-ipc` mode, one JSON object per line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub(crate) enum ConnectionEvent<'a> {
    #[serde(rename = "set_mode")]
    SetMode { mode: ProcessingMode },
    #[serde(rename = "send_prompt")]
    SendPrompt { prompt: &'a str },
}

pub(crate) struct PrintingConnection<W: Write> {
    out: W,
    json: bool,
    ready: bool,
}

impl<W: Write> PrintingConnection<W> {
    pub(crate) fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            ready: true,
        }
    }

    pub(crate) fn set_ready(&mut self, ready: bool) {
        if self.ready != ready {
            log_debug(&format!("connection ready -> {ready}"));
        }
        self.ready = ready;
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, event: ConnectionEvent<'_>) {
        let line = if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => line,
                Err(err) => {
                    log_debug(&format!("failed to encode connection event: {err}"));
                    return;
                }
            }
        } else {
            match event {
                ConnectionEvent::SetMode { mode } => format!("mode -> {}", mode.label()),
                ConnectionEvent::SendPrompt { prompt } => format!("prompt: {prompt}"),
            }
        };
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            log_debug(&format!("failed to write connection event: {err}"));
        }
    }
}

impl<W: Write> TransformConnection for PrintingConnection<W> {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_mode(&mut self, mode: ProcessingMode) {
        self.emit(ConnectionEvent::SetMode { mode });
    }

    fn send_prompt(&mut self, text: &str) {
        self.emit(ConnectionEvent::SendPrompt { prompt: text });
    }
}
