use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::store::{Category, Idea};

/// Top-level view selector. Anything that is not `All` or `Archived`
/// shows only unarchived ideas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum View {
    All,
    Active,
    Archived,
}

impl Default for View {
    fn default() -> Self {
        View::Active
    }
}

impl View {
    pub fn next(self) -> Self {
        cycle(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn next(self) -> Self {
        match self {
            CategoryFilter::All => match Category::iter().next() {
                Some(first) => CategoryFilter::Only(first),
                None => CategoryFilter::All,
            },
            CategoryFilter::Only(current) => {
                let mut categories = Category::iter();
                categories.by_ref().find(|c| *c == current);
                match categories.next() {
                    Some(next) => CategoryFilter::Only(next),
                    None => CategoryFilter::All,
                }
            }
        }
    }

    fn matches(&self, idea: &Idea) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => idea.category == *category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Only(String),
}

impl TagFilter {
    /// Advances through `tags` in order, wrapping back to `All`.
    pub fn next_in(&self, tags: &[String]) -> Self {
        match self {
            TagFilter::All => match tags.first() {
                Some(first) => TagFilter::Only(first.clone()),
                None => TagFilter::All,
            },
            TagFilter::Only(current) => {
                let position = tags.iter().position(|tag| tag == current);
                match position.and_then(|idx| tags.get(idx + 1)) {
                    Some(next) => TagFilter::Only(next.clone()),
                    None => TagFilter::All,
                }
            }
        }
    }

    fn matches(&self, idea: &Idea) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Only(tag) => idea.tags.contains(tag.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub view: View,
    pub category: CategoryFilter,
    pub tag: TagFilter,
    pub search: String,
}

impl FilterState {
    pub fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

/// Applies every active predicate; an idea must satisfy all of them.
/// Input order is preserved and nothing is mutated.
pub fn filter_ideas<'a>(ideas: &'a [Idea], filter: &FilterState) -> Vec<&'a Idea> {
    let needle = filter.search.trim().to_lowercase();
    ideas
        .iter()
        .filter(|idea| match filter.view {
            View::All => true,
            View::Archived => idea.archived,
            View::Active => !idea.archived,
        })
        .filter(|idea| filter.category.matches(idea))
        .filter(|idea| filter.tag.matches(idea))
        .filter(|idea| needle.is_empty() || matches_search(idea, &needle))
        .collect()
}

/// Case-insensitive substring match on title, content, or any tag.
fn matches_search(idea: &Idea, needle: &str) -> bool {
    idea.title.to_lowercase().contains(needle)
        || idea.content.to_lowercase().contains(needle)
        || idea
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    Newest,
    Oldest,
    Title,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Newest
    }
}

impl SortKey {
    pub fn next(self) -> Self {
        cycle(self)
    }

    /// Lenient parse for config values; anything unrecognized falls back
    /// to `Newest`.
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }
}

/// Stable sort; equal keys keep the incoming (store insertion) order.
pub fn sort_ideas<'a>(mut ideas: Vec<&'a Idea>, key: SortKey) -> Vec<&'a Idea> {
    match key {
        SortKey::Newest => ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => ideas.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Title => {
            ideas.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
    }
    ideas
}

fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T) -> T {
    let mut variants = T::iter();
    variants.by_ref().find(|v| *v == current);
    match variants.next() {
        Some(next) => next,
        None => match T::iter().next() {
            Some(first) => first,
            None => current,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IdeaDraft, IdeaStore};

    fn seed(store: &mut IdeaStore, title: &str, category: Category, tags: &[&str]) -> u64 {
        let mut draft = IdeaDraft {
            title: title.to_string(),
            category,
            ..IdeaDraft::default()
        };
        for tag in tags {
            draft.tags.insert((*tag).to_string());
        }
        store.create(draft)
    }

    #[test]
    fn search_matches_title_substring_case_insensitive() {
        let mut store = IdeaStore::new();
        seed(&mut store, "Prototype app", Category::Tech, &[]);
        seed(&mut store, "Other", Category::Tech, &[]);

        let filter = FilterState {
            view: View::All,
            search: "proto".to_string(),
            ..FilterState::default()
        };
        let matched = filter_ideas(store.all(), &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Prototype app");
    }

    #[test]
    fn search_matches_content_and_tags_too() {
        let mut store = IdeaStore::new();
        let mut draft = IdeaDraft {
            title: "Untitledish".to_string(),
            content: "ship the PROTO by friday".to_string(),
            ..IdeaDraft::default()
        };
        draft.tags.insert("roadmap".into());
        store.create(draft);

        let mut filter = FilterState {
            view: View::All,
            ..FilterState::default()
        };
        filter.search = "proto".into();
        assert_eq!(filter_ideas(store.all(), &filter).len(), 1);
        filter.search = "roadm".into();
        assert_eq!(filter_ideas(store.all(), &filter).len(), 1);
        filter.search = "missing".into();
        assert!(filter_ideas(store.all(), &filter).is_empty());
    }

    #[test]
    fn view_predicates_split_on_archived_flag() {
        let mut store = IdeaStore::new();
        let live = seed(&mut store, "Live", Category::Tech, &[]);
        let shelved = seed(&mut store, "Shelved", Category::Tech, &[]);
        store.set_archived(shelved, true).expect("archive");

        let mut filter = FilterState::default();
        filter.view = View::Active;
        let ids: Vec<_> = filter_ideas(store.all(), &filter)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![live]);

        filter.view = View::Archived;
        let ids: Vec<_> = filter_ideas(store.all(), &filter)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![shelved]);

        filter.view = View::All;
        assert_eq!(filter_ideas(store.all(), &filter).len(), 2);
    }

    #[test]
    fn combined_predicates_all_must_hold() {
        let mut store = IdeaStore::new();
        let full_match = seed(&mut store, "Match", Category::Tech, &["urgent"]);
        // Two of three: right category and tag, but archived.
        let archived = seed(&mut store, "Archived", Category::Tech, &["urgent"]);
        store.set_archived(archived, true).expect("archive");
        // Two of three: active and tagged, wrong category.
        seed(&mut store, "Design", Category::Design, &["urgent"]);
        // Two of three: active tech, missing the tag.
        seed(&mut store, "Untagged", Category::Tech, &["later"]);

        let filter = FilterState {
            view: View::Active,
            category: CategoryFilter::Only(Category::Tech),
            tag: TagFilter::Only("urgent".to_string()),
            search: String::new(),
        };
        let ids: Vec<_> = filter_ideas(store.all(), &filter)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![full_match]);
    }

    #[test]
    fn empty_search_passes_everything() {
        let mut store = IdeaStore::new();
        seed(&mut store, "One", Category::Tech, &[]);
        seed(&mut store, "Two", Category::Personal, &[]);
        let filter = FilterState {
            view: View::All,
            search: "   ".to_string(),
            ..FilterState::default()
        };
        assert_eq!(filter_ideas(store.all(), &filter).len(), 2);
    }

    #[test]
    fn title_sort_is_case_insensitive() {
        let mut store = IdeaStore::new();
        seed(&mut store, "Banana", Category::Tech, &[]);
        seed(&mut store, "apple", Category::Tech, &[]);
        seed(&mut store, "Cherry", Category::Tech, &[]);

        let filter = FilterState {
            view: View::All,
            ..FilterState::default()
        };
        let sorted = sort_ideas(filter_ideas(store.all(), &filter), SortKey::Title);
        let titles: Vec<_> = sorted.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn equal_titles_keep_insertion_order() {
        let mut store = IdeaStore::new();
        let second = seed(&mut store, "same", Category::Tech, &[]);
        let first = seed(&mut store, "Same", Category::Tech, &[]);

        let filter = FilterState {
            view: View::All,
            ..FilterState::default()
        };
        let sorted = sort_ideas(filter_ideas(store.all(), &filter), SortKey::Title);
        // Store order is newest-first; a stable sort must not swap ties.
        let ids: Vec<_> = sorted.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn newest_and_oldest_order_by_timestamp() {
        let ideas: Vec<Idea> = [(1, 100), (2, 300), (3, 200)]
            .into_iter()
            .map(|(id, created_at)| Idea {
                id,
                title: format!("idea {id}"),
                content: String::new(),
                category: Category::Tech,
                tags: Default::default(),
                created_at,
                archived: false,
            })
            .collect();

        let refs: Vec<&Idea> = ideas.iter().collect();
        let newest: Vec<_> = sort_ideas(refs.clone(), SortKey::Newest)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(newest, vec![2, 3, 1]);
        let oldest: Vec<_> = sort_ideas(refs, SortKey::Oldest)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(oldest, vec![1, 3, 2]);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_newest() {
        assert_eq!(SortKey::parse_lenient("title"), SortKey::Title);
        assert_eq!(SortKey::parse_lenient("OLDEST"), SortKey::Oldest);
        assert_eq!(SortKey::parse_lenient("bogus"), SortKey::Newest);
    }

    #[test]
    fn filters_cycle_through_variants_and_back() {
        assert_eq!(View::All.next(), View::Active);
        assert_eq!(View::Archived.next(), View::All);

        let from_all = CategoryFilter::All.next();
        assert_eq!(from_all, CategoryFilter::Only(Category::Tech));
        assert_eq!(
            CategoryFilter::Only(Category::Personal).next(),
            CategoryFilter::All
        );

        let tags = vec!["a".to_string(), "b".to_string()];
        let step = TagFilter::All.next_in(&tags);
        assert_eq!(step, TagFilter::Only("a".into()));
        let step = step.next_in(&tags);
        assert_eq!(step, TagFilter::Only("b".into()));
        assert_eq!(step.next_in(&tags), TagFilter::All);
        // A stale tag selection wraps back to All.
        assert_eq!(TagFilter::Only("gone".into()).next_in(&tags), TagFilter::All);
    }
}
