//! Tick driver: one call per host frame polls input, advances the menu and
//! drains the dispatch queue into the connection.

mod stats;

use anyhow::Result;

use crate::collab::{InputSource, KeyboardCollaborator, TransformConnection};
use crate::dispatch::{deliver, DeliveryReport, PromptDispatchQueue};
use crate::menu::{KeyboardOutcome, MenuStateMachine};
use crate::selector::{ModeSwitch, ProcessingMode};
use crate::set_log_frame_time;

pub use stats::{format_session_stats, SessionStats};

/// Result of a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub keyboard: Option<KeyboardOutcome>,
    pub delivery: DeliveryReport,
}

pub struct PromptSession<I, C, K> {
    menu: MenuStateMachine,
    queue: PromptDispatchQueue,
    mode_switch: ModeSwitch,
    input: I,
    connection: C,
    keyboard: K,
    stats: SessionStats,
}

impl<I, C, K> PromptSession<I, C, K>
where
    I: InputSource,
    C: TransformConnection,
    K: KeyboardCollaborator,
{
    /// `initial_mode` is the mode the connection starts in, when known.
    pub fn new(
        menu: MenuStateMachine,
        input: I,
        connection: C,
        keyboard: K,
        initial_mode: Option<ProcessingMode>,
    ) -> Self {
        Self {
            menu,
            queue: PromptDispatchQueue::new(),
            mode_switch: ModeSwitch::new(initial_mode),
            input,
            connection,
            keyboard,
            stats: SessionStats::default(),
        }
    }

    pub fn tick(&mut self, now: f64) -> Result<TickReport> {
        set_log_frame_time(now);
        let frame = self.input.poll();
        self.menu
            .handle_frame(&frame, now, &mut self.queue, &mut self.keyboard)?;
        let keyboard = self.menu.poll_keyboard(now, &mut self.queue)?;
        if let Some(outcome) = &keyboard {
            self.stats.record_keyboard(outcome);
        }
        let items = self.queue.drain();
        let delivery = deliver(items, &mut self.connection, &mut self.mode_switch, now);
        self.stats.record_delivery(&delivery);
        self.stats.ticks += 1;
        Ok(TickReport { keyboard, delivery })
    }

    pub fn menu(&self) -> &MenuStateMachine {
        &self.menu
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn keyboard_mut(&mut self) -> &mut K {
        &mut self.keyboard
    }

    pub fn active_mode(&self) -> Option<ProcessingMode> {
        self.mode_switch.active()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{InputFrame, KeyboardJob, KeyboardMessage};
    use crate::navigator::NavTuning;
    use crate::registry::{test_category, CategoryMode, OptionRegistry};
    use crossbeam_channel::Sender;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedInput {
        frames: VecDeque<InputFrame>,
    }

    impl ScriptedInput {
        fn push(&mut self, frame: InputFrame) {
            self.frames.push_back(frame);
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> InputFrame {
            self.frames.pop_front().unwrap_or_default()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Mode(ProcessingMode),
        Prompt(String),
    }

    struct RecordingConnection {
        ready: bool,
        calls: Vec<Call>,
    }

    impl TransformConnection for RecordingConnection {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn set_mode(&mut self, mode: ProcessingMode) {
            self.calls.push(Call::Mode(mode));
        }

        fn send_prompt(&mut self, text: &str) {
            self.calls.push(Call::Prompt(text.to_string()));
        }
    }

    #[derive(Default)]
    struct LatchedKeyboard {
        pending: Option<Sender<KeyboardMessage>>,
    }

    impl KeyboardCollaborator for LatchedKeyboard {
        fn open_keyboard(&mut self, _initial_text: &str) -> KeyboardJob {
            let (tx, job) = KeyboardJob::channel();
            self.pending = Some(tx);
            job
        }
    }

    type TestSession = PromptSession<ScriptedInput, RecordingConnection, LatchedKeyboard>;

    fn session() -> TestSession {
        let registry = OptionRegistry::new(vec![
            test_category("eras", CategoryMode::Scene, &["P1", "P2"]),
            test_category("outfits", CategoryMode::Subject, &["O1"]),
            test_category("custom", CategoryMode::Freeform, &[""]),
        ])
        .unwrap();
        let menu = MenuStateMachine::new(registry, NavTuning::default()).unwrap();
        PromptSession::new(
            menu,
            ScriptedInput::default(),
            RecordingConnection {
                ready: true,
                calls: Vec::new(),
            },
            LatchedKeyboard::default(),
            Some(ProcessingMode::Scene),
        )
    }

    fn down() -> InputFrame {
        InputFrame {
            axis: (0.0, -1.0),
            ..InputFrame::default()
        }
    }

    fn confirm() -> InputFrame {
        InputFrame {
            confirm: true,
            ..InputFrame::default()
        }
    }

    fn back() -> InputFrame {
        InputFrame {
            back: true,
            ..InputFrame::default()
        }
    }

    fn run(session: &mut TestSession, frames: Vec<InputFrame>, start: f64) -> f64 {
        let mut now = start;
        for frame in frames {
            session.input_mut().push(frame);
            session.tick(now).unwrap();
            now += 0.5;
        }
        now
    }

    #[test]
    fn eras_scenario_sends_only_second_prompt() {
        let mut session = session();
        run(&mut session, vec![confirm(), down(), confirm()], 0.0);
        assert_eq!(
            session.connection().calls,
            vec![Call::Prompt("P2".to_string())]
        );
    }

    #[test]
    fn subject_prompt_is_preceded_by_mode_switch() {
        let mut session = session();
        run(&mut session, vec![down(), confirm(), confirm()], 0.0);
        assert_eq!(
            session.connection().calls,
            vec![
                Call::Mode(ProcessingMode::Subject),
                Call::Prompt("O1".to_string())
            ]
        );
        assert_eq!(session.active_mode(), Some(ProcessingMode::Subject));
        assert_eq!(session.stats().mode_switches, 1);
    }

    #[test]
    fn offline_connection_drops_prompt_for_good() {
        let mut session = session();
        session.connection_mut().ready = false;
        let now = run(&mut session, vec![confirm(), confirm()], 0.0);
        assert_eq!(session.stats().dropped, 1);
        session.connection_mut().ready = true;
        run(&mut session, vec![InputFrame::default()], now);
        assert!(session.connection().calls.is_empty());
    }

    #[test]
    fn backing_out_before_confirm_sends_nothing() {
        let mut session = session();
        run(&mut session, vec![confirm(), down(), back()], 0.0);
        assert!(session.menu().state().is_root());
        assert!(session.connection().calls.is_empty());
        assert!(!session.stats().has_activity());
    }

    #[test]
    fn typed_prompt_is_delivered_on_the_tick_it_arrives() {
        let mut session = session();
        let now = run(
            &mut session,
            vec![down(), InputFrame::default(), down(), confirm(), confirm()],
            0.0,
        );
        assert!(session.menu().keyboard_open());
        let tx = session.keyboard_mut().pending.take().unwrap();
        tx.send(KeyboardMessage::Submitted("glass city".to_string())).unwrap();
        session.input_mut().push(InputFrame::default());
        let report = session.tick(now).unwrap();
        assert_eq!(report.keyboard, Some(KeyboardOutcome::Queued));
        assert_eq!(report.delivery.sent, 1);
        assert_eq!(
            session.connection().calls,
            vec![Call::Prompt("glass city".to_string())]
        );
    }
}
