use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("idea #{0} not found")]
    NotFound(u64),
}

/// Fixed classification set. Every idea belongs to exactly one category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Tech,
    Design,
    Business,
    Personal,
}

impl Default for Category {
    fn default() -> Self {
        Category::Tech
    }
}

#[derive(Debug, Clone)]
pub struct Idea {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: IndexSet<String>,
    pub created_at: i64,
    pub archived: bool,
}

/// User-supplied fields for a create or update. The store owns id,
/// `created_at`, and the archived flag.
#[derive(Debug, Clone, Default)]
pub struct IdeaDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: IndexSet<String>,
}

/// Owns the idea collection. Ids increase monotonically and are never
/// reused, even after a delete.
#[derive(Debug, Default)]
pub struct IdeaStore {
    ideas: Vec<Idea>,
    next_id: u64,
}

impl IdeaStore {
    pub fn new() -> Self {
        Self {
            ideas: Vec::new(),
            next_id: 1,
        }
    }

    /// Insertion order, newest first.
    pub fn all(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == id)
    }

    pub fn create(&mut self, draft: IdeaDraft) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let idea = Idea {
            id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            tags: draft.tags,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
            archived: false,
        };
        self.ideas.insert(0, idea);
        id
    }

    /// Replaces the editable fields. `created_at` and `archived` are
    /// untouched.
    pub fn update(&mut self, id: u64, draft: IdeaDraft) -> Result<(), StoreError> {
        let idea = self
            .ideas
            .iter_mut()
            .find(|idea| idea.id == id)
            .ok_or(StoreError::NotFound(id))?;
        idea.title = draft.title;
        idea.content = draft.content;
        idea.category = draft.category;
        idea.tags = draft.tags;
        Ok(())
    }

    pub fn set_archived(&mut self, id: u64, archived: bool) -> Result<(), StoreError> {
        let idea = self
            .ideas
            .iter_mut()
            .find(|idea| idea.id == id)
            .ok_or(StoreError::NotFound(id))?;
        idea.archived = archived;
        Ok(())
    }

    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let index = self
            .ideas
            .iter()
            .position(|idea| idea.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.ideas.remove(index);
        Ok(())
    }

    /// All distinct tags across the store, first-seen order.
    pub fn all_tags(&self) -> IndexSet<String> {
        let mut tags = IndexSet::new();
        for idea in &self.ideas {
            for tag in &idea.tags {
                tags.insert(tag.clone());
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn draft(title: &str) -> IdeaDraft {
        IdeaDraft {
            title: title.to_string(),
            ..IdeaDraft::default()
        }
    }

    #[test]
    fn create_assigns_unique_ids_and_timestamps() {
        let mut store = IdeaStore::new();
        let first = store.create(draft("First"));
        let second = store.create(draft("Second"));
        assert_ne!(first, second);

        let idea = store.get(first).expect("idea present");
        assert_eq!(idea.title, "First");
        assert!(idea.created_at > 0);
        assert!(!idea.archived);
        assert_eq!(
            store.all().iter().filter(|i| i.id == first).count(),
            1,
            "exactly one idea carries the assigned id"
        );
    }

    #[test]
    fn all_returns_newest_first() {
        let mut store = IdeaStore::new();
        store.create(draft("Older"));
        store.create(draft("Newer"));
        let titles: Vec<_> = store.all().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[test]
    fn delete_removes_and_second_delete_is_not_found() {
        let mut store = IdeaStore::new();
        let id = store.create(draft("Ephemeral"));
        store.delete(id).expect("first delete succeeds");
        assert!(store.all().iter().all(|idea| idea.id != id));
        assert_matches!(store.delete(id), Err(StoreError::NotFound(found)) if found == id);
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut store = IdeaStore::new();
        let first = store.create(draft("First"));
        store.delete(first).expect("delete");
        let second = store.create(draft("Second"));
        assert!(second > first);
    }

    #[test]
    fn archive_round_trip_preserves_other_fields() {
        let mut store = IdeaStore::new();
        let mut d = draft("Keeper");
        d.content = "body".into();
        d.tags.insert("urgent".into());
        let id = store.create(d);
        let before = store.get(id).expect("idea").clone();

        store.set_archived(id, true).expect("archive");
        assert!(store.get(id).expect("idea").archived);
        store.set_archived(id, false).expect("unarchive");

        let after = store.get(id).expect("idea");
        assert!(!after.archived);
        assert_eq!(after.title, before.title);
        assert_eq!(after.content, before.content);
        assert_eq!(after.category, before.category);
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn update_replaces_fields_but_not_created_at() {
        let mut store = IdeaStore::new();
        let id = store.create(draft("Before"));
        let created_at = store.get(id).expect("idea").created_at;

        let mut d = draft("After");
        d.category = Category::Design;
        d.tags.insert("ui".into());
        store.update(id, d).expect("update");

        let idea = store.get(id).expect("idea");
        assert_eq!(idea.title, "After");
        assert_eq!(idea.category, Category::Design);
        assert!(idea.tags.contains("ui"));
        assert_eq!(idea.created_at, created_at);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut store = IdeaStore::new();
        assert_matches!(store.update(99, draft("x")), Err(StoreError::NotFound(99)));
        assert_matches!(store.set_archived(99, true), Err(StoreError::NotFound(99)));
    }

    #[test]
    fn all_tags_preserves_first_seen_order() {
        let mut store = IdeaStore::new();
        let mut a = draft("A");
        a.tags.insert("beta".into());
        a.tags.insert("alpha".into());
        let mut b = draft("B");
        b.tags.insert("alpha".into());
        b.tags.insert("gamma".into());
        // Newest-first ordering means B's tags are seen before A's.
        store.create(a);
        store.create(b);
        let tags: Vec<_> = store.all_tags().into_iter().collect();
        assert_eq!(tags, vec!["alpha", "gamma", "beta"]);
    }
}
