//! Replays newline-delimited JSON input frames through a prompt session.

use anyhow::{bail, Context, Result};
use crossbeam_channel::Sender;
use promptdeck::{
    log_debug, log_debug_content, InputFrame, InputSource, KeyboardCollaborator, KeyboardJob,
    KeyboardMessage, PromptSession,
};
use serde::Deserialize;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::connection::PrintingConnection;

/// Time between frames that omit `t`.
const DEFAULT_FRAME_STEP_SECS: f64 = 0.25;

/// One scripted tick. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ScriptFrame {
    pub t: Option<f64>,
    pub axis: [f32; 2],
    pub confirm: bool,
    pub back: bool,
    pub toggle: bool,
    pub cycle_mode: bool,
    pub year: Option<i32>,
    /// Text the keyboard answers its current (or next) request with.
    pub keyboard: Option<String>,
    pub connection_ready: Option<bool>,
}

impl ScriptFrame {
    fn input(&self) -> InputFrame {
        InputFrame {
            axis: (self.axis[0], self.axis[1]),
            confirm: self.confirm,
            back: self.back,
            toggle_visibility: self.toggle,
            cycle_mode: self.cycle_mode,
            year: self.year,
        }
    }
}

/// Parse a script, skipping blank lines and `#` comments.
pub(crate) fn read_script(reader: impl BufRead) -> Result<Vec<ScriptFrame>> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read script line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let frame: ScriptFrame = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid frame on script line {}", idx + 1))?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Input source fed one frame per tick by the replay loop.
#[derive(Debug, Default)]
pub(crate) struct ScriptInput {
    next: Option<InputFrame>,
}

impl InputSource for ScriptInput {
    fn poll(&mut self) -> InputFrame {
        self.next.take().unwrap_or_default()
    }
}

/// Keyboard that answers with scripted text. Answers given before a request
/// opens are held for the next one.
#[derive(Debug, Default)]
pub(crate) struct ScriptKeyboard {
    open: Option<Sender<KeyboardMessage>>,
    queued: VecDeque<String>,
}

impl ScriptKeyboard {
    fn answer(&mut self, text: String) {
        match self.open.take() {
            Some(tx) => {
                if tx.send(KeyboardMessage::Submitted(text)).is_err() {
                    log_debug("keyboard answer arrived after the request was closed");
                }
            }
            None => self.queued.push_back(text),
        }
    }
}

impl KeyboardCollaborator for ScriptKeyboard {
    fn open_keyboard(&mut self, initial_text: &str) -> KeyboardJob {
        log_debug_content(&format!("keyboard opened with '{initial_text}'"));
        let (tx, job) = KeyboardJob::channel();
        match self.queued.pop_front() {
            Some(text) => {
                let _ = tx.send(KeyboardMessage::Submitted(text));
            }
            None => self.open = Some(tx),
        }
        job
    }
}

pub(crate) type ScriptSession<W> =
    PromptSession<ScriptInput, PrintingConnection<W>, ScriptKeyboard>;

/// Run every frame through the session. Returns the timestamp of the last tick.
pub(crate) fn replay<W: Write>(
    session: &mut ScriptSession<W>,
    frames: &[ScriptFrame],
) -> Result<f64> {
    let mut now: Option<f64> = None;
    for (idx, frame) in frames.iter().enumerate() {
        let t = match (frame.t, now) {
            (Some(t), Some(prev)) if t < prev => {
                bail!("frame {} goes back in time ({t} < {prev})", idx + 1)
            }
            (Some(t), _) => t,
            (None, Some(prev)) => prev + DEFAULT_FRAME_STEP_SECS,
            (None, None) => 0.0,
        };
        if !t.is_finite() {
            bail!("frame {} has a non-finite timestamp", idx + 1);
        }
        now = Some(t);

        if let Some(ready) = frame.connection_ready {
            session.connection_mut().set_ready(ready);
        }
        if let Some(text) = &frame.keyboard {
            session.keyboard_mut().answer(text.clone());
        }
        session.input_mut().next = Some(frame.input());
        let report = session.tick(t)?;
        if report.delivery.dropped > 0 {
            tracing::warn!(
                frame = idx + 1,
                dropped = report.delivery.dropped,
                "prompts dropped while offline"
            );
        }
    }
    Ok(now.unwrap_or(0.0))
}
