use crate::app::form::{FormMode, FormState};
use crate::query::{filter_ideas, sort_ideas, FilterState, SortKey, TagFilter, View};
use crate::store::{IdeaStore, StoreError};
use crate::view::{build_view_model, IdeaRow, ViewModel};

#[derive(Debug, Clone)]
pub struct DeleteOverlay {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone)]
pub enum OverlayState {
    Form(FormState),
    ConfirmDelete(DeleteOverlay),
}

/// The whole mutable application state: the store plus the filter, sort,
/// selection, and overlay variables that drive each frame. The displayed
/// list is re-derived through the pure filter/sort/view pipeline after
/// every change; nothing else persists across frames.
#[derive(Debug)]
pub struct AppState {
    pub store: IdeaStore,
    pub filter: FilterState,
    pub sort: SortKey,
    pub selected: usize,
    pub preview_lines: usize,
    pub model: ViewModel,
    pub search_active: bool,
    pub status_message: Option<String>,
    pub overlay: Option<OverlayState>,
}

impl AppState {
    pub fn new(store: IdeaStore, view: View, sort: SortKey, preview_lines: usize) -> Self {
        let filter = FilterState {
            view,
            ..FilterState::default()
        };
        let mut state = Self {
            store,
            filter,
            sort,
            selected: 0,
            preview_lines,
            model: ViewModel {
                heading: String::new(),
                rows: Vec::new(),
                visible: 0,
                total: 0,
                counts: Default::default(),
            },
            search_active: false,
            status_message: None,
            overlay: None,
        };
        state.refresh();
        state
    }

    /// Re-runs filter → sort → view-model and clamps the selection.
    pub fn refresh(&mut self) {
        let visible = sort_ideas(filter_ideas(self.store.all(), &self.filter), self.sort);
        self.model = build_view_model(&visible, self.store.all(), &self.filter, self.preview_lines);
        self.normalize_selection();
    }

    pub fn len(&self) -> usize {
        self.model.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.rows.is_empty()
    }

    pub fn selected_row(&self) -> Option<&IdeaRow> {
        self.model.rows.get(self.selected)
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected_row().map(|row| row.id)
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.model.rows.is_empty() {
            return;
        }
        let len = self.model.rows.len() as isize;
        let next = (self.selected as isize + delta).clamp(0, len - 1);
        self.selected = next as usize;
    }

    pub fn select_by_id(&mut self, id: u64) {
        if let Some(idx) = self.model.rows.iter().position(|row| row.id == id) {
            self.selected = idx;
        } else {
            self.normalize_selection();
        }
    }

    // --- filter-state changes -------------------------------------------

    pub fn cycle_view(&mut self) {
        self.filter.view = self.filter.view.next();
        self.refresh();
    }

    pub fn cycle_category(&mut self) {
        self.filter.category = self.filter.category.next();
        self.refresh();
    }

    pub fn cycle_tag(&mut self) {
        let tags: Vec<String> = self.store.all_tags().into_iter().collect();
        self.filter.tag = self.filter.tag.next_in(&tags);
        self.refresh();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.refresh();
    }

    // --- incremental search ---------------------------------------------

    pub fn begin_search(&mut self) {
        self.search_active = true;
    }

    pub fn finish_search(&mut self) {
        self.search_active = false;
    }

    pub fn cancel_search(&mut self) {
        self.search_active = false;
        self.filter.search.clear();
        self.refresh();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.filter.search.push(ch);
        self.selected = 0;
        self.refresh();
    }

    pub fn pop_search_char(&mut self) {
        if self.filter.search.pop().is_some() {
            self.refresh();
        }
    }

    // --- overlays --------------------------------------------------------

    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    pub fn form(&self) -> Option<&FormState> {
        match self.overlay() {
            Some(OverlayState::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match self.overlay.as_mut() {
            Some(OverlayState::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn delete_overlay(&self) -> Option<&DeleteOverlay> {
        match self.overlay() {
            Some(OverlayState::ConfirmDelete(overlay)) => Some(overlay),
            _ => None,
        }
    }

    pub fn open_create_form(&mut self) {
        self.overlay = Some(OverlayState::Form(FormState::creating()));
    }

    /// Edit pre-fills the form from the selected idea.
    pub fn open_edit_form(&mut self) -> bool {
        let Some(id) = self.selected_id() else {
            self.set_status_message(Some("No idea selected"));
            return false;
        };
        match self.store.get(id) {
            Some(idea) => {
                self.overlay = Some(OverlayState::Form(FormState::editing(idea)));
                true
            }
            None => {
                self.set_status_message(Some(format!("Idea #{id} no longer exists")));
                false
            }
        }
    }

    pub fn open_delete_confirm(&mut self) -> bool {
        let Some(row) = self.selected_row() else {
            self.set_status_message(Some("No idea selected"));
            return false;
        };
        self.overlay = Some(OverlayState::ConfirmDelete(DeleteOverlay {
            id: row.id,
            title: row.title.clone(),
        }));
        true
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    // --- store mutations --------------------------------------------------

    /// Runs the form submit. Validation failure leaves the form open with
    /// its inline error and touches nothing. Success mutates the store,
    /// closes the form (the return to the creating state), and refreshes.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form_mut() else {
            return;
        };
        let mode = form.mode;
        let Some(draft) = form.validate() else {
            return;
        };
        match mode {
            FormMode::Creating => {
                let id = self.store.create(draft);
                self.close_overlay();
                self.refresh();
                self.select_by_id(id);
                self.set_status_message(Some("Idea created"));
            }
            FormMode::Editing(id) => match self.store.update(id, draft) {
                Ok(()) => {
                    self.close_overlay();
                    self.refresh();
                    self.select_by_id(id);
                    self.set_status_message(Some("Idea updated"));
                }
                Err(StoreError::NotFound(id)) => {
                    self.close_overlay();
                    self.refresh();
                    self.set_status_message(Some(format!(
                        "Idea #{id} no longer exists; nothing changed"
                    )));
                }
            },
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.delete_overlay().map(|overlay| overlay.id) else {
            return;
        };
        self.close_overlay();
        match self.store.delete(id) {
            Ok(()) => {
                self.refresh();
                self.set_status_message(Some("Idea deleted"));
            }
            Err(StoreError::NotFound(id)) => {
                self.refresh();
                self.set_status_message(Some(format!(
                    "Idea #{id} was already gone; nothing changed"
                )));
            }
        }
    }

    /// Immediate delete for setups with `confirm_delete = false`.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_message(Some("No idea selected"));
            return;
        };
        match self.store.delete(id) {
            Ok(()) => {
                self.refresh();
                self.set_status_message(Some("Idea deleted"));
            }
            Err(StoreError::NotFound(id)) => {
                self.refresh();
                self.set_status_message(Some(format!(
                    "Idea #{id} was already gone; nothing changed"
                )));
            }
        }
    }

    pub fn toggle_archive_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_message(Some("No idea selected"));
            return;
        };
        let archived = self.store.get(id).map(|idea| idea.archived).unwrap_or(false);
        match self.store.set_archived(id, !archived) {
            Ok(()) => {
                self.refresh();
                self.select_by_id(id);
                let message = if archived {
                    "Idea restored"
                } else {
                    "Idea archived"
                };
                self.set_status_message(Some(message));
            }
            Err(StoreError::NotFound(id)) => {
                self.refresh();
                self.set_status_message(Some(format!("Idea #{id} no longer exists")));
            }
        }
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    /// The tag the filter currently pins, if any.
    pub fn active_tag(&self) -> Option<&str> {
        match &self.filter.tag {
            TagFilter::Only(tag) => Some(tag.as_str()),
            TagFilter::All => None,
        }
    }

    fn normalize_selection(&mut self) {
        if self.model.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.model.rows.len() {
            self.selected = self.model.rows.len() - 1;
        }
    }
}
