//! Boundary contracts for the host application's input, keyboard and
//! transformation connection.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::selector::ProcessingMode;

/// One frame of polled controller state. Edge fields are true only on the
/// frame the button went down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Thumbstick `(x, y)`; positive y is up.
    pub axis: (f32, f32),
    pub confirm: bool,
    pub back: bool,
    pub toggle_visibility: bool,
    /// Rotates the free-form mode override (only honoured in free-form categories).
    pub cycle_mode: bool,
    /// Year dial value; jumps to the era covering it in categories with year ranges.
    pub year: Option<i32>,
}

/// Host input polled once per tick. Must return immediately.
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

/// Streaming connection to the remote transformation service.
pub trait TransformConnection {
    /// Whether prompts can be accepted right now.
    fn is_ready(&self) -> bool;
    fn set_mode(&mut self, mode: ProcessingMode);
    fn send_prompt(&mut self, text: &str);
}

/// Result delivered by the on-device keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardMessage {
    Submitted(String),
    Cancelled,
}

/// Handle the menu polls for the keyboard's eventual answer.
pub struct KeyboardJob {
    pub receiver: Receiver<KeyboardMessage>,
}

/// Poll outcome for an open keyboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardPoll {
    Pending,
    Done(KeyboardMessage),
}

impl KeyboardJob {
    /// Create a job plus the sender the keyboard side answers on.
    pub fn channel() -> (Sender<KeyboardMessage>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (tx, Self { receiver: rx })
    }

    /// Non-blocking check. A dropped sender counts as a cancel.
    pub fn poll(&self) -> KeyboardPoll {
        match self.receiver.try_recv() {
            Ok(message) => KeyboardPoll::Done(message),
            Err(TryRecvError::Empty) => KeyboardPoll::Pending,
            Err(TryRecvError::Disconnected) => KeyboardPoll::Done(KeyboardMessage::Cancelled),
        }
    }
}

/// On-device keyboard. Opening must not block; the text arrives later
/// through the returned job.
pub trait KeyboardCollaborator {
    fn open_keyboard(&mut self, initial_text: &str) -> KeyboardJob;
}
