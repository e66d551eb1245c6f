use indexmap::IndexMap;
use strum::IntoEnumIterator;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::query::{CategoryFilter, FilterState, TagFilter, View};
use crate::store::{Category, Idea};

/// Everything the terminal layer needs to paint one frame of the list.
/// Derived purely from the current store contents and filter state, so
/// rebuilding it with the same inputs yields the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub heading: String,
    pub rows: Vec<IdeaRow>,
    pub visible: usize,
    pub total: usize,
    pub counts: SidebarCounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaRow {
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub created_label: String,
    pub archived: bool,
    pub preview: String,
}

/// Counts for the sidebar, computed over the whole store rather than the
/// filtered subset so the totals do not shrink while filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarCounts {
    pub all: usize,
    pub active: usize,
    pub archived: usize,
    pub per_category: IndexMap<Category, usize>,
    pub per_tag: IndexMap<String, usize>,
}

pub fn build_view_model(
    visible: &[&Idea],
    everything: &[Idea],
    filter: &FilterState,
    preview_lines: usize,
) -> ViewModel {
    let rows = visible
        .iter()
        .map(|idea| IdeaRow {
            id: idea.id,
            title: idea.title.clone(),
            category: idea.category,
            tags: idea.tags.iter().cloned().collect(),
            created_label: format_timestamp(idea.created_at),
            archived: idea.archived,
            preview: build_preview(&idea.content, preview_lines),
        })
        .collect::<Vec<_>>();

    ViewModel {
        heading: build_heading(filter),
        visible: rows.len(),
        total: everything.len(),
        rows,
        counts: build_counts(everything),
    }
}

/// One line per active filter dimension, e.g.
/// `Archived tech ideas #urgent matching "proto"`.
fn build_heading(filter: &FilterState) -> String {
    let mut heading = match filter.view {
        View::All => "All ideas".to_string(),
        View::Active => "Active ideas".to_string(),
        View::Archived => "Archived ideas".to_string(),
    };
    if let CategoryFilter::Only(category) = filter.category {
        heading = match filter.view {
            View::All => format!("All {category} ideas"),
            View::Active => format!("Active {category} ideas"),
            View::Archived => format!("Archived {category} ideas"),
        };
    }
    if let TagFilter::Only(tag) = &filter.tag {
        heading.push_str(&format!(" #{tag}"));
    }
    let needle = filter.search.trim();
    if !needle.is_empty() {
        heading.push_str(&format!(" matching \"{needle}\""));
    }
    heading
}

fn build_counts(ideas: &[Idea]) -> SidebarCounts {
    let mut counts = SidebarCounts {
        all: ideas.len(),
        ..SidebarCounts::default()
    };
    for category in Category::iter() {
        counts.per_category.insert(category, 0);
    }
    for idea in ideas {
        if idea.archived {
            counts.archived += 1;
        } else {
            counts.active += 1;
        }
        *counts.per_category.entry(idea.category).or_insert(0) += 1;
        for tag in &idea.tags {
            *counts.per_tag.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

fn format_timestamp(epoch: i64) -> String {
    OffsetDateTime::from_unix_timestamp(epoch)
        .map(|dt| dt.format(&Rfc3339).unwrap_or_else(|_| epoch.to_string()))
        .unwrap_or_else(|_| epoch.to_string())
}

fn build_preview(content: &str, preview_lines: usize) -> String {
    if preview_lines == 0 {
        return String::new();
    }
    let mut lines = content.lines();
    let mut collected = Vec::with_capacity(preview_lines);
    for _ in 0..preview_lines {
        if let Some(line) = lines.next() {
            collected.push(line.trim_end());
        } else {
            break;
        }
    }
    let mut preview = collected.join("\n");
    if lines.next().is_some() {
        if !preview.is_empty() {
            preview.push_str("\n…");
        } else {
            preview.push('…');
        }
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{filter_ideas, sort_ideas, SortKey};
    use crate::store::{IdeaDraft, IdeaStore};

    fn populated_store() -> IdeaStore {
        let mut store = IdeaStore::new();
        let mut a = IdeaDraft {
            title: "Launch checklist".to_string(),
            content: "one\ntwo\nthree\nfour".to_string(),
            category: Category::Business,
            ..IdeaDraft::default()
        };
        a.tags.insert("launch".into());
        a.tags.insert("urgent".into());
        store.create(a);

        let mut b = IdeaDraft {
            title: "Dark theme".to_string(),
            category: Category::Design,
            ..IdeaDraft::default()
        };
        b.tags.insert("urgent".into());
        let shelved = store.create(b);
        store.set_archived(shelved, true).expect("archive");
        store
    }

    fn model_for(store: &IdeaStore, filter: &FilterState) -> ViewModel {
        let visible = sort_ideas(filter_ideas(store.all(), filter), SortKey::Newest);
        build_view_model(&visible, store.all(), filter, 2)
    }

    #[test]
    fn counts_cover_the_whole_store() {
        let store = populated_store();
        let filter = FilterState::default(); // Active view hides one idea
        let model = model_for(&store, &filter);

        assert_eq!(model.visible, 1);
        assert_eq!(model.total, 2);
        assert_eq!(model.counts.all, 2);
        assert_eq!(model.counts.active, 1);
        assert_eq!(model.counts.archived, 1);
        assert_eq!(model.counts.per_category[&Category::Business], 1);
        assert_eq!(model.counts.per_category[&Category::Design], 1);
        assert_eq!(model.counts.per_category[&Category::Tech], 0);
        assert_eq!(model.counts.per_tag["urgent"], 2);
        assert_eq!(model.counts.per_tag["launch"], 1);
    }

    #[test]
    fn heading_reflects_every_active_filter() {
        let filter = FilterState {
            view: View::Archived,
            category: CategoryFilter::Only(Category::Tech),
            tag: TagFilter::Only("urgent".to_string()),
            search: " proto ".to_string(),
        };
        assert_eq!(
            build_heading(&filter),
            "Archived tech ideas #urgent matching \"proto\""
        );
        assert_eq!(build_heading(&FilterState::default()), "Active ideas");
    }

    #[test]
    fn rebuilding_with_same_inputs_is_identical() {
        let store = populated_store();
        let filter = FilterState {
            view: View::All,
            ..FilterState::default()
        };
        let first = model_for(&store, &filter);
        let second = model_for(&store, &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        let store = populated_store();
        let filter = FilterState {
            view: View::All,
            ..FilterState::default()
        };
        let model = model_for(&store, &filter);
        let row = model
            .rows
            .iter()
            .find(|row| row.title == "Launch checklist")
            .expect("row present");
        assert_eq!(row.preview, "one\ntwo\n…");
    }

    #[test]
    fn rows_keep_tag_insertion_order() {
        let store = populated_store();
        let filter = FilterState {
            view: View::All,
            ..FilterState::default()
        };
        let model = model_for(&store, &filter);
        let row = model
            .rows
            .iter()
            .find(|row| row.title == "Launch checklist")
            .expect("row present");
        assert_eq!(row.tags, vec!["launch", "urgent"]);
    }
}
