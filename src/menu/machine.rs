use anyhow::{anyhow, Result};

use crate::collab::{InputFrame, KeyboardCollaborator, KeyboardJob, KeyboardMessage, KeyboardPoll};
use crate::dispatch::{DispatchItem, PromptDispatchQueue};
use crate::navigator::{Cursor, Direction, NavTuning, Navigator};
use crate::registry::{Category, CategoryId, CategoryMode, OptionRegistry};
use crate::selector::{ModelSelector, ProcessingMode};
use crate::{log_debug, log_debug_content};

use super::state::{ConfirmOutcome, KeyboardOutcome, MenuState};
use super::view::{MenuEntry, MenuView};

const ROOT_TITLE: &str = "Main Menu";

struct PendingKeyboard {
    category: CategoryId,
    job: KeyboardJob,
}

/// Root menu plus one category list at a time.
pub struct MenuStateMachine {
    registry: OptionRegistry,
    tuning: NavTuning,
    state: MenuState,
    visible: bool,
    root_nav: Navigator,
    category_nav: Option<Navigator>,
    selector: ModelSelector,
    keyboard: Option<PendingKeyboard>,
}

fn navigator_for(len: usize, tuning: NavTuning, what: &str) -> Result<Navigator> {
    Navigator::new(len, tuning).ok_or_else(|| anyhow!("{what} has no entries to navigate"))
}

impl MenuStateMachine {
    /// Starts visible at `Root` with the first category highlighted.
    pub fn new(registry: OptionRegistry, tuning: NavTuning) -> Result<Self> {
        let root_nav = navigator_for(registry.len(), tuning, "root menu")?;
        Ok(Self {
            registry,
            tuning,
            state: MenuState::Root,
            visible: true,
            root_nav,
            category_nav: None,
            selector: ModelSelector::new(),
            keyboard: None,
        })
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn keyboard_open(&self) -> bool {
        self.keyboard.is_some()
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    /// Cursor of whichever list is on screen.
    pub fn cursor(&self) -> Cursor {
        self.active_nav().cursor()
    }

    fn active_nav(&self) -> &Navigator {
        match (&self.state, &self.category_nav) {
            (MenuState::Category(_), Some(nav)) => nav,
            _ => &self.root_nav,
        }
    }

    fn active_nav_mut(&mut self) -> &mut Navigator {
        match (&self.state, &mut self.category_nav) {
            (MenuState::Category(_), Some(nav)) => nav,
            _ => &mut self.root_nav,
        }
    }

    fn accepting_input(&self) -> bool {
        self.visible && self.keyboard.is_none()
    }

    fn current_category(&self) -> Result<Option<&Category>> {
        match &self.state {
            MenuState::Root => Ok(None),
            MenuState::Category(id) => self.registry.category(id).map(Some),
        }
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        log_debug(&format!("menu visibility -> {}", self.visible));
        tracing::debug!(visible = self.visible, "menu visibility toggled");
        self.visible
    }

    pub fn step(&mut self, direction: Direction, now: f64) -> bool {
        if !self.accepting_input() {
            return false;
        }
        self.active_nav_mut().step(direction, now)
    }

    pub fn step_axis(&mut self, axis: (f32, f32), now: f64) -> bool {
        if !self.accepting_input() {
            return false;
        }
        self.active_nav_mut().step_axis(axis, now)
    }

    /// Highlight the option whose year range covers `year` (clamped to the
    /// category's span). Returns whether the cursor now sits on such an option.
    pub fn select_year(&mut self, year: i32) -> Result<bool> {
        if !self.accepting_input() {
            return Ok(false);
        }
        let Some(index) = self
            .current_category()?
            .and_then(|category| category.option_for_year(year))
        else {
            return Ok(false);
        };
        let moved = self
            .category_nav
            .as_mut()
            .is_some_and(|nav| nav.jump_to(index));
        if moved {
            log_debug(&format!("year {year} -> option {index}"));
        }
        Ok(moved)
    }

    /// Enter the highlighted category from `Root`, or act on the highlighted
    /// option inside a category.
    pub fn confirm(
        &mut self,
        now: f64,
        queue: &mut PromptDispatchQueue,
        keyboard: &mut impl KeyboardCollaborator,
    ) -> Result<ConfirmOutcome> {
        if !self.accepting_input() {
            return Ok(ConfirmOutcome::Ignored);
        }
        let Some(id) = self.state.category().cloned() else {
            return self.enter_highlighted_category();
        };

        let index = self
            .category_nav
            .as_ref()
            .map(Navigator::index)
            .ok_or_else(|| anyhow!("category '{id}' is active without a cursor"))?;
        let category = self.registry.category(&id)?;
        let option = self.registry.option(&id, index)?;

        if category.mode == CategoryMode::Freeform {
            let job = keyboard.open_keyboard(&option.payload);
            log_debug(&format!("opened keyboard for {id} (preset {index})"));
            self.keyboard = Some(PendingKeyboard { category: id, job });
            return Ok(ConfirmOutcome::KeyboardOpened);
        }

        let mode = self.selector.mode_for_category(category);
        log_debug_content(&format!("queued {} prompt: {}", mode.label(), option.payload));
        tracing::info!(
            category = id.as_str(),
            option = option.name.as_str(),
            mode = mode.label(),
            "prompt queued"
        );
        queue.enqueue(DispatchItem::new(mode, option.payload.clone(), now));
        Ok(ConfirmOutcome::Queued)
    }

    fn enter_highlighted_category(&mut self) -> Result<ConfirmOutcome> {
        let category = self.registry.category_at(self.root_nav.index())?;
        let id = category.id.clone();
        // Re-entry always starts from the top of the list.
        let nav = navigator_for(
            category.options.len(),
            self.tuning,
            &format!("category '{id}'"),
        )?;
        self.category_nav = Some(nav);
        self.state = MenuState::Category(id.clone());
        log_debug(&format!("entered category {id}"));
        tracing::info!(category = id.as_str(), "category entered");
        Ok(ConfirmOutcome::Entered(id))
    }

    /// Leave the category (or close an open keyboard). A no-op at `Root`.
    pub fn back(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        if let Some(pending) = self.keyboard.take() {
            log_debug(&format!("keyboard for {} cancelled", pending.category));
            return true;
        }
        match &self.state {
            MenuState::Root => false,
            MenuState::Category(id) => {
                log_debug(&format!("left category {id}"));
                tracing::info!(category = id.as_str(), "category left");
                self.state = MenuState::Root;
                self.category_nav = None;
                true
            }
        }
    }

    /// Rotate the free-form mode override. Only inside a free-form category.
    pub fn cycle_mode(&mut self) -> Result<Option<ProcessingMode>> {
        if !self.accepting_input() {
            return Ok(self.selector.freeform_override());
        }
        let in_freeform = self
            .current_category()?
            .is_some_and(|category| category.mode == CategoryMode::Freeform);
        if !in_freeform {
            return Ok(self.selector.freeform_override());
        }
        let mode = self.selector.cycle_freeform_override();
        log_debug(&format!(
            "free-form mode override -> {}",
            mode.map(ProcessingMode::label).unwrap_or("auto")
        ));
        Ok(mode)
    }

    /// Check the open keyboard request, queueing its text once it arrives.
    pub fn poll_keyboard(
        &mut self,
        now: f64,
        queue: &mut PromptDispatchQueue,
    ) -> Result<Option<KeyboardOutcome>> {
        let Some(pending) = self.keyboard.as_ref() else {
            return Ok(None);
        };
        let message = match pending.job.poll() {
            KeyboardPoll::Pending => return Ok(None),
            KeyboardPoll::Done(message) => message,
        };
        let Some(pending) = self.keyboard.take() else {
            return Ok(None);
        };
        let text = match message {
            KeyboardMessage::Submitted(text) => text.trim().to_string(),
            KeyboardMessage::Cancelled => String::new(),
        };
        if text.is_empty() {
            log_debug("keyboard closed without text");
            return Ok(Some(KeyboardOutcome::Discarded));
        }
        let category = self.registry.category(&pending.category)?;
        let mode = self.selector.mode_for_category(category);
        log_debug_content(&format!("queued typed {} prompt: {text}", mode.label()));
        tracing::info!(
            category = pending.category.as_str(),
            mode = mode.label(),
            "typed prompt queued"
        );
        queue.enqueue(DispatchItem::new(mode, text, now));
        Ok(Some(KeyboardOutcome::Queued))
    }

    /// Apply one polled input frame. The visibility toggle is handled first so
    /// a hide press suppresses everything else in the same frame.
    pub fn handle_frame(
        &mut self,
        frame: &InputFrame,
        now: f64,
        queue: &mut PromptDispatchQueue,
        keyboard: &mut impl KeyboardCollaborator,
    ) -> Result<()> {
        if frame.toggle_visibility {
            self.toggle_visibility();
        }
        if !self.visible {
            return Ok(());
        }
        if frame.cycle_mode {
            self.cycle_mode()?;
        }
        self.step_axis(frame.axis, now);
        if let Some(year) = frame.year {
            self.select_year(year)?;
        }
        if frame.confirm {
            self.confirm(now, queue, keyboard)?;
        }
        if frame.back {
            self.back();
        }
        Ok(())
    }

    /// Snapshot for whatever renders the menu.
    pub fn view(&self) -> Result<MenuView> {
        let (title, entries) = match self.current_category()? {
            None => (
                ROOT_TITLE.to_string(),
                self.registry
                    .categories()
                    .iter()
                    .map(|category| MenuEntry {
                        name: category.title.clone(),
                        description: category.description.clone(),
                    })
                    .collect(),
            ),
            Some(category) => (
                category.title.clone(),
                category
                    .options
                    .iter()
                    .map(|option| MenuEntry {
                        name: option.name.clone(),
                        description: option.description.clone(),
                    })
                    .collect(),
            ),
        };
        Ok(MenuView {
            title,
            entries,
            highlighted: self.active_nav().index(),
            visible: self.visible,
            keyboard_open: self.keyboard.is_some(),
            freeform_override: self.selector.freeform_override(),
        })
    }
}
