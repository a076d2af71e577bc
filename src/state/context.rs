//! The editor orchestrator.
//!
//! `Editor` owns the live presentation and its history for one editing
//! session. Every document change goes through [`Editor::execute`], which
//! records the previous state, commits the new one, updates selection and
//! schedules autosave. Slides streamed from the generator take the same path
//! through [`Editor::push_generation_chunk`].

use std::path::Path;

use super::EditorState;
use super::persistence::{self, PersistenceError, SlideStore};
use crate::command::{Command, CommandContext, History, ImportData, SelectionChange};
use crate::autosave::AutosaveDebouncer;
use crate::config::EditorConfig;
use crate::document::{LockedElements, Presentation};
use crate::element::{Element, ElementId, ElementKind, Position, Size};
use crate::error::{EditorError, EditorResult, Ignored};
use crate::event::{
    DocumentEvent, EditorEvent, EventBus, EventHandler, EventTopic, GenerationEvent,
    SelectionEvent,
};
use crate::slide::Template;
use crate::stream::{GeneratedSlide, GenerationSession, default_deck};
use crate::util::time;

/// Result of an editing operation; `Err` means nothing changed
pub type EditResult = Result<(), Ignored>;

#[derive(Debug, Default)]
struct ActiveGeneration {
    session: GenerationSession,
    /// Slides appended to the document so far
    appended: usize,
}

/// One open presentation and everything needed to edit it.
#[derive(Debug)]
pub struct Editor {
    document: Presentation,
    history: History,
    locked: LockedElements,
    selected: Option<ElementId>,
    state: EditorState,
    generation: Option<ActiveGeneration>,
    autosave: AutosaveDebouncer,
    project_id: Option<String>,
    config: EditorConfig,
    event_bus: EventBus,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Creates an editor holding a fresh one-slide presentation
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Presentation::default(), config)
    }

    pub fn with_document(mut document: Presentation, config: EditorConfig) -> Self {
        document.clamp_current_slide();
        Self {
            document,
            history: History::with_limit(config.history_limit),
            locked: LockedElements::new(),
            selected: None,
            state: EditorState::Idle,
            generation: None,
            autosave: AutosaveDebouncer::new(config.autosave_delay_ms),
            project_id: None,
            config,
            event_bus: EventBus::new(),
        }
    }

    pub fn document(&self) -> &Presentation {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn locked_elements(&self) -> &LockedElements {
        &self.locked
    }

    pub fn selected_element_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected
            .as_deref()
            .and_then(|id| self.document.find_element(id))
    }

    pub fn is_generating(&self) -> bool {
        self.state.is_generating()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Subscribe a handler to editor events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    /// Subscribe a handler to one category of editor events
    pub fn subscribe_to(&self, topic: EventTopic, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe_to(topic, handler);
    }

    // ------------------------------------------------------------------
    // Commands

    /// Apply `command`, recording the previous document for undo.
    pub fn execute(&mut self, command: Command) -> EditResult {
        if self.state.is_generating() {
            log::debug!("{} refused during generation", command.name());
            return Err(Ignored::Generating);
        }

        let ctx = CommandContext::new(&self.locked, self.selected.as_ref())
            .with_duplicate_offset(self.config.duplicate_offset);
        let applied = command.apply(&self.document, &ctx).inspect_err(|reason| {
            log::debug!("{} ignored: {}", command.name(), reason);
        })?;

        let previous = std::mem::replace(&mut self.document, applied.document);
        self.history.record(previous);
        self.apply_selection(applied.selection, applied.start_editing);
        self.mark_dirty();

        log::debug!("{} committed", command.name());
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Modified {
                command: command.name(),
            }));
        Ok(())
    }

    pub fn update_element(&mut self, element: Element) -> EditResult {
        self.execute(Command::UpdateElement(element))
    }

    pub fn delete_element(&mut self, element_id: &str) -> EditResult {
        self.execute(Command::DeleteElement {
            element_id: element_id.to_owned(),
        })
    }

    pub fn duplicate_element(&mut self, element_id: &str) -> EditResult {
        self.execute(Command::DuplicateElement {
            element_id: element_id.to_owned(),
        })
    }

    /// Add a default element to the current slide, then select it and enter
    /// edit mode
    pub fn add_new_element(&mut self, kind: ElementKind) -> EditResult {
        self.execute(Command::AddElement { kind })
    }

    pub fn move_element(&mut self, element_id: &str, delta: Position) -> EditResult {
        self.execute(Command::MoveElement {
            element_id: element_id.to_owned(),
            delta,
        })
    }

    pub fn resize_element(&mut self, element_id: &str, size: Size) -> EditResult {
        self.execute(Command::ResizeElement {
            element_id: element_id.to_owned(),
            size,
        })
    }

    pub fn bring_to_front(&mut self, element_id: &str) -> EditResult {
        self.execute(Command::BringToFront {
            element_id: element_id.to_owned(),
        })
    }

    pub fn send_to_back(&mut self, element_id: &str) -> EditResult {
        self.execute(Command::SendToBack {
            element_id: element_id.to_owned(),
        })
    }

    pub fn add_new_slide(&mut self) -> EditResult {
        self.execute(Command::AddSlide)
    }

    pub fn delete_slide(&mut self, index: usize) -> EditResult {
        self.execute(Command::DeleteSlide { index })
    }

    pub fn move_slide(&mut self, drag_index: usize, hover_index: usize) -> EditResult {
        self.execute(Command::MoveSlide {
            from: drag_index,
            to: hover_index,
        })
    }

    pub fn duplicate_slide(&mut self, index: usize) -> EditResult {
        self.execute(Command::DuplicateSlide { index })
    }

    /// Change a slide's title and/or background; `None` keeps the current value
    pub fn update_slide(
        &mut self,
        index: usize,
        title: Option<String>,
        background: Option<String>,
    ) -> EditResult {
        self.execute(Command::UpdateSlide {
            index,
            title,
            background,
        })
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> EditResult {
        self.execute(Command::SetTitle(title.into()))
    }

    pub fn apply_template(&mut self, template: Template) -> EditResult {
        self.execute(Command::ApplyTemplate(template))
    }

    pub fn import_presentation(&mut self, data: ImportData) -> EditResult {
        self.execute(Command::ImportPresentation(data))
    }

    /// Flip the lock on an element. Returns the new lock state.
    ///
    /// Locks are not part of the document and are not undoable.
    pub fn toggle_element_lock(&mut self, element_id: &str) -> bool {
        let locked = if self.locked.remove(element_id) {
            false
        } else {
            self.locked.insert(element_id.to_owned());
            true
        };
        self.event_bus.emit(EditorEvent::LockChanged {
            element_id: element_id.to_owned(),
            locked,
        });
        locked
    }

    // ------------------------------------------------------------------
    // History

    pub fn undo(&mut self) -> EditResult {
        if self.state.is_generating() {
            return Err(Ignored::Generating);
        }
        let previous = self
            .history
            .undo(self.document.clone())
            .ok_or(Ignored::NothingToUndo)?;
        self.restore(previous, DocumentEvent::Undone);
        Ok(())
    }

    pub fn redo(&mut self) -> EditResult {
        if self.state.is_generating() {
            return Err(Ignored::Generating);
        }
        let next = self
            .history
            .redo(self.document.clone())
            .ok_or(Ignored::NothingToRedo)?;
        self.restore(next, DocumentEvent::Redone);
        Ok(())
    }

    fn restore(&mut self, document: Presentation, event: DocumentEvent) {
        self.document = document;
        let selection_gone = self
            .selected
            .as_deref()
            .is_some_and(|id| self.document.find_element(id).is_none());
        if selection_gone {
            self.apply_selection(SelectionChange::Clear, false);
        }
        self.mark_dirty();
        self.event_bus.emit(EditorEvent::DocumentChanged(event));
    }

    // ------------------------------------------------------------------
    // Selection and edit mode

    /// Select an element (switching to its slide) or clear the selection
    pub fn select_element(&mut self, element_id: Option<&str>) -> EditResult {
        if self.state.is_generating() {
            return Err(Ignored::Generating);
        }
        match element_id {
            None => self.apply_selection(SelectionChange::Clear, false),
            Some(id) => {
                let slide_index = self
                    .document
                    .find_slide_containing_element(id)
                    .ok_or_else(|| Ignored::ElementNotFound(id.to_owned()))?;
                self.document.current_slide_index = slide_index;
                if self.state.editing_element().is_some_and(|editing| editing != id) {
                    self.set_state(EditorState::Idle);
                }
                self.apply_selection(SelectionChange::Select(id.to_owned()), false);
            }
        }
        Ok(())
    }

    /// Select an element and enter edit mode on it
    pub fn start_editing(&mut self, element_id: &str) -> EditResult {
        self.select_element(Some(element_id))?;
        self.set_state(EditorState::Editing {
            element_id: element_id.to_owned(),
        });
        Ok(())
    }

    pub fn stop_editing(&mut self) {
        if self.state.editing_element().is_some() {
            self.set_state(EditorState::Idle);
        }
    }

    /// Make `index` the current slide. Navigation is not recorded in history.
    pub fn select_slide(&mut self, index: usize) -> EditResult {
        let len = self.document.slides.len();
        if index >= len {
            return Err(Ignored::SlideOutOfRange { index, len });
        }
        self.document.current_slide_index = index;
        Ok(())
    }

    fn apply_selection(&mut self, change: SelectionChange, start_editing: bool) {
        match change {
            SelectionChange::Keep => {}
            SelectionChange::Select(id) => {
                self.selected = Some(id.clone());
                self.event_bus
                    .emit(EditorEvent::SelectionChanged(SelectionEvent::Selected(id.clone())));
                if start_editing {
                    self.set_state(EditorState::Editing { element_id: id });
                }
            }
            SelectionChange::Clear => {
                if self.selected.take().is_some() {
                    self.event_bus
                        .emit(EditorEvent::SelectionChanged(SelectionEvent::Cleared));
                }
                self.stop_editing();
            }
        }
    }

    fn set_state(&mut self, new_state: EditorState) {
        if self.state == new_state {
            return;
        }
        if !self.state.can_transition_to(&new_state) {
            log::warn!("invalid transition from {:?} to {:?}", self.state, new_state);
            return;
        }
        let old = std::mem::replace(&mut self.state, new_state);
        self.event_bus.emit(EditorEvent::StateChanged {
            old,
            new: self.state.clone(),
        });
    }

    // ------------------------------------------------------------------
    // Generation

    /// Enter generation mode; user edits are refused until it ends
    pub fn begin_generation(&mut self) -> EditorResult<()> {
        if self.generation.is_some() {
            return Err(EditorError::GenerationInProgress);
        }
        self.apply_selection(SelectionChange::Clear, false);
        self.set_state(EditorState::Generating);
        self.generation = Some(ActiveGeneration::default());
        log::info!("generation started");
        self.event_bus
            .emit(EditorEvent::Generation(GenerationEvent::Started));
        Ok(())
    }

    /// Feed a streamed chunk; returns how many new slides were appended.
    ///
    /// The first slides of a generation replace the deck, later ones are
    /// appended, and the whole generation undoes as a single step.
    pub fn push_generation_chunk(&mut self, chunk: &str) -> EditorResult<usize> {
        let mut generation = self.generation.take().ok_or(EditorError::NoGeneration)?;
        let fresh = generation.session.push_chunk(chunk);
        let count = self.append_generated(&mut generation, fresh);
        self.generation = Some(generation);
        Ok(count)
    }

    /// End the generation. Returns the number of generated slides and whether
    /// the default deck had to stand in for an empty stream.
    pub fn finish_generation(&mut self) -> EditorResult<(usize, bool)> {
        let mut generation = self.generation.take().ok_or(EditorError::NoGeneration)?;

        let used_fallback = generation.appended == 0 && self.config.generation_fallback;
        if used_fallback {
            log::warn!("generation produced no slides; using the default deck");
            self.append_generated(&mut generation, default_deck());
        }

        self.set_state(EditorState::Idle);
        log::info!("generation finished with {} slides", generation.appended);
        self.event_bus
            .emit(EditorEvent::Generation(GenerationEvent::Finished {
                slides: generation.appended,
                used_fallback,
            }));
        Ok((generation.appended, used_fallback))
    }

    /// Stop the generation, keeping the slides appended so far
    pub fn cancel_generation(&mut self) -> EditorResult<usize> {
        let generation = self.generation.take().ok_or(EditorError::NoGeneration)?;
        self.set_state(EditorState::Idle);
        log::info!("generation cancelled after {} slides", generation.appended);
        self.event_bus
            .emit(EditorEvent::Generation(GenerationEvent::Cancelled));
        Ok(generation.appended)
    }

    /// Surface a failure reported by the generation stream
    pub fn report_generation_error(&mut self, message: &str) {
        log::error!("generation stream failed: {message}");
        self.event_bus
            .emit(EditorEvent::Generation(GenerationEvent::Failed {
                message: message.to_owned(),
            }));
    }

    fn append_generated(
        &mut self,
        generation: &mut ActiveGeneration,
        slides: Vec<GeneratedSlide>,
    ) -> usize {
        if slides.is_empty() {
            return 0;
        }

        if generation.appended == 0 {
            self.history.record(self.document.clone());
            self.document.slides.clear();
            self.document.current_slide_index = 0;
            self.locked.clear();
        }

        let count = slides.len();
        for slide in slides {
            generation.appended += 1;
            self.document
                .slides
                .push(slide.into_slide(generation.appended));
        }
        self.mark_dirty();

        log::debug!("appended {count} generated slides");
        self.event_bus
            .emit(EditorEvent::Generation(GenerationEvent::SlidesAppended { count }));
        count
    }

    // ------------------------------------------------------------------
    // Persistence

    pub fn set_project(&mut self, project_id: impl Into<String>) {
        self.project_id = Some(project_id.into());
    }

    /// Whether a change is waiting for autosave
    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_pending()
    }

    fn mark_dirty(&mut self) {
        self.autosave.touch(time::timestamp_millis());
    }

    /// Save the slides if the autosave quiet period has elapsed at `now`
    /// (milliseconds since the UNIX epoch). Returns true when a save
    /// succeeded.
    pub fn poll_autosave(&mut self, now: u64, store: &mut dyn SlideStore) -> bool {
        if !self.autosave.take_if_ready(now) {
            return false;
        }
        self.save_to(store)
    }

    /// Save any pending change right away
    pub fn flush_autosave(&mut self, store: &mut dyn SlideStore) -> bool {
        if !self.autosave.is_pending() {
            return false;
        }
        self.autosave.cancel();
        self.save_to(store)
    }

    /// One save attempt. Failures are reported once and dropped; the local
    /// document is kept as is.
    fn save_to(&mut self, store: &mut dyn SlideStore) -> bool {
        let Some(project_id) = self.project_id.as_deref() else {
            log::debug!("no project attached; skipping autosave");
            return false;
        };
        match store.save_slides(project_id, &self.document.slides) {
            Ok(()) => {
                log::info!("autosaved {} slides to project {project_id}", self.document.slides.len());
                self.event_bus.emit(EditorEvent::AutosaveCompleted {
                    slides: self.document.slides.len(),
                });
                true
            }
            Err(err) => {
                log::error!("autosave to project {project_id} failed: {err}");
                self.event_bus.emit(EditorEvent::AutosaveFailed {
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Replace the session with a project loaded from `store`
    pub fn hydrate(&mut self, store: &mut dyn SlideStore, project_id: &str) -> EditorResult<()> {
        if self.generation.is_some() {
            return Err(EditorError::GenerationInProgress);
        }
        let record = store.load_project(project_id)?;
        let project = record.project;
        let title = project
            .project_name
            .unwrap_or_else(|| Presentation::default().title);

        self.document = if project.slides.is_empty() {
            Presentation::new(title)
        } else {
            Presentation {
                title,
                slides: project.slides,
                current_slide_index: 0,
            }
        };
        self.history.clear();
        self.locked.clear();
        self.apply_selection(SelectionChange::Clear, false);
        self.autosave.cancel();
        self.project_id = Some(project_id.to_owned());

        log::info!(
            "loaded project {project_id} with {} slides",
            self.document.slides.len()
        );
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded));
        Ok(())
    }

    /// Serialize the document as `{title, slides, currentSlideIndex}`
    pub fn export_json(&self) -> EditorResult<String> {
        let json = serde_json::to_string_pretty(&self.document).map_err(PersistenceError::from)?;
        Ok(json)
    }

    /// Import a document previously produced by `export_json`
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        let data: ImportData = serde_json::from_str(json).map_err(PersistenceError::from)?;
        self.import_presentation(data)?;
        Ok(())
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        let json = self.export_json()?;
        persistence::write_file(path.as_ref(), &json)?;
        Ok(())
    }

    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> EditorResult<()> {
        let json = persistence::read_file(path.as_ref())?;
        self.import_json(&json)
    }
}
