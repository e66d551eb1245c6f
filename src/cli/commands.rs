use anyhow::Result;
use indexmap::IndexSet;

use crate::app::App;
use crate::store::{Category, IdeaDraft, IdeaStore};

pub fn run_tui(app: &mut App) -> Result<()> {
    app.run()
}

/// Seed store used by `--sample` so the UI has something to show on a
/// first run.
pub fn sample_store() -> IdeaStore {
    let mut store = IdeaStore::new();
    for (title, content, category, tags) in [
        (
            "Prototype the onboarding flow",
            "Sketch the three-step signup and test it with two people.",
            Category::Design,
            &["ux", "urgent"][..],
        ),
        (
            "Cache rendered previews",
            "Preview rendering shows up in profiles; memoize per idea id.",
            Category::Tech,
            &["performance"][..],
        ),
        (
            "Quarterly pricing review",
            "Compare the starter tier against the last two competitor moves.",
            Category::Business,
            &["pricing"][..],
        ),
        (
            "Morning writing habit",
            "Ten minutes before standup, no editing allowed.",
            Category::Personal,
            &[][..],
        ),
        (
            "Tag autocompletion",
            "Suggest existing tags while typing in the tag field.",
            Category::Tech,
            &["ux"][..],
        ),
    ] {
        let tags: IndexSet<String> = tags.iter().map(|t| t.to_string()).collect();
        store.create(IdeaDraft {
            title: title.to_string(),
            content: content.to_string(),
            category,
            tags,
        });
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_store_covers_every_category() {
        let store = sample_store();
        assert_eq!(store.len(), 5);
        for category in [
            Category::Tech,
            Category::Design,
            Category::Business,
            Category::Personal,
        ] {
            assert!(
                store.all().iter().any(|idea| idea.category == category),
                "missing sample for {category}"
            );
        }
        assert!(store.all().iter().all(|idea| !idea.archived));
    }
}
