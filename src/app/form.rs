use indexmap::IndexSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::store::{Category, Idea, IdeaDraft};

/// Which half of the state machine the form is in. `Editing` remembers the
/// idea the submit should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Creating,
    Editing(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Content,
    Category,
    Tags,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Category,
            FormField::Category => FormField::Tags,
            FormField::Tags => FormField::Title,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Title => FormField::Tags,
            FormField::Content => FormField::Title,
            FormField::Category => FormField::Content,
            FormField::Tags => FormField::Category,
        }
    }
}

/// The idea form overlay. Submitting while `Creating` creates, submitting
/// while `Editing` updates that idea; either way the caller drops the form
/// afterwards, which is the return to `Creating`.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub focus: FormField,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub pending_tags: IndexSet<String>,
    pub tag_input: String,
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::creating()
    }
}

impl FormState {
    pub fn creating() -> Self {
        Self {
            mode: FormMode::Creating,
            focus: FormField::Title,
            title: String::new(),
            content: String::new(),
            category: Category::default(),
            pending_tags: IndexSet::new(),
            tag_input: String::new(),
            error: None,
        }
    }

    /// Enters the `Editing` state pre-filled from an existing idea.
    pub fn editing(idea: &Idea) -> Self {
        Self {
            mode: FormMode::Editing(idea.id),
            focus: FormField::Title,
            title: idea.title.clone(),
            content: idea.content.clone(),
            category: idea.category,
            pending_tags: idea.tags.clone(),
            tag_input: String::new(),
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn push_char(&mut self, ch: char) {
        self.error = None;
        match self.focus {
            FormField::Title => {
                if self.title.len() < 120 {
                    self.title.push(ch);
                }
            }
            FormField::Content => self.content.push(ch),
            FormField::Tags => {
                if self.tag_input.len() < 64 {
                    self.tag_input.push(ch);
                }
            }
            FormField::Category => {}
        }
    }

    pub fn pop_char(&mut self) {
        self.error = None;
        match self.focus {
            FormField::Title => pop_grapheme(&mut self.title),
            FormField::Content => pop_grapheme(&mut self.content),
            FormField::Tags => {
                if self.tag_input.is_empty() {
                    self.pending_tags.pop();
                } else {
                    pop_grapheme(&mut self.tag_input);
                }
            }
            FormField::Category => {}
        }
    }

    pub fn insert_newline(&mut self) {
        if self.focus == FormField::Content {
            self.content.push('\n');
        }
    }

    pub fn cycle_category(&mut self) {
        use strum::IntoEnumIterator;
        let mut categories = Category::iter();
        categories.by_ref().find(|c| *c == self.category);
        self.category = categories
            .next()
            .or_else(|| Category::iter().next())
            .unwrap_or(self.category);
    }

    /// Commits the typed tag into the pending set. Duplicates collapse,
    /// insertion order is preserved.
    pub fn commit_tag(&mut self) {
        let tag = self.tag_input.trim().to_string();
        if tag.is_empty() {
            return;
        }
        self.pending_tags.insert(tag);
        self.tag_input.clear();
    }

    /// Toggles an existing tag in or out of the pending set.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.pending_tags.shift_remove(tag) {
            self.pending_tags.insert(tag.to_string());
        }
    }

    /// Validates the form and produces the draft for the store. An empty
    /// title is the one rejection path; the error stays on the form for
    /// inline display and no draft is produced.
    pub fn validate(&mut self) -> Option<IdeaDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            self.error = Some("Title cannot be empty".to_string());
            return None;
        }
        let mut pending_tags = self.pending_tags.clone();
        let leftover = self.tag_input.trim();
        if !leftover.is_empty() {
            pending_tags.insert(leftover.to_string());
        }
        Some(IdeaDraft {
            title: title.to_string(),
            content: self.content.clone(),
            category: self.category,
            tags: pending_tags,
        })
    }
}

fn pop_grapheme(text: &mut String) {
    if let Some((idx, _)) = text.grapheme_indices(true).last() {
        text.truncate(idx);
    }
}
