//! Grouping of reader output into sorted categories.

use std::collections::BTreeMap;
use warp_menu_config::AggregationConfig;
use warp_menu_protocol::{Category, EntryWithCategory, MenuArtifact};

/// Group entries by category name and sort the result.
///
/// Category order comes from `config.order` (0 when absent). Entries are
/// sorted by title, display name, href, then target; categories by order,
/// then title. The result does not depend on the arrival order of `entries`.
pub fn aggregate(
    entries: impl IntoIterator<Item = EntryWithCategory>,
    config: &AggregationConfig,
) -> MenuArtifact {
    let mut grouped: BTreeMap<String, Category> = BTreeMap::new();
    for EntryWithCategory { entry, category } in entries {
        grouped
            .entry(category)
            .or_insert_with_key(|title| Category {
                title: title.clone(),
                order: config.category_order(title),
                entries: Vec::new(),
            })
            .entries
            .push(entry);
    }

    let mut categories: Vec<Category> = grouped.into_values().collect();
    for category in &mut categories {
        category.entries.sort();
    }
    categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
    MenuArtifact { categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use warp_menu_protocol::{Entry, Target};

    fn item(category: &str, title: &str, href: &str) -> EntryWithCategory {
        EntryWithCategory::new(Entry::new(title, href), category)
    }

    fn config() -> AggregationConfig {
        AggregationConfig::builder()
            .order("Administration", 10)
            .order("Support", 100)
            .build()
    }

    #[test]
    fn empty_input_yields_empty_menu() {
        let menu = aggregate(Vec::new(), &config());
        assert!(menu.is_empty());
        assert_eq!(serde_json::to_string(&menu).expect("serialize"), "[]");
    }

    #[test]
    fn entries_with_the_same_category_share_one_category() {
        let menu = aggregate(
            vec![
                item("Development", "Jenkins", "/jenkins"),
                item("Support", "docs", "https://docs.example.com"),
                item("Development", "Gitea", "/gitea"),
            ],
            &config(),
        );
        assert_eq!(menu.categories.len(), 2);
        let development = menu.category("Development").expect("category");
        assert_eq!(
            development
                .entries
                .iter()
                .map(|entry| entry.title.as_str())
                .collect::<Vec<_>>(),
            vec!["Gitea", "Jenkins"]
        );
    }

    #[test]
    fn categories_sort_by_order_then_title() {
        let menu = aggregate(
            vec![
                item("Support", "docs", "/docs"),
                item("Zeta", "z", "/z"),
                item("Administration", "users", "/usermgt"),
                item("Alpha", "a", "/a"),
            ],
            &config(),
        );
        let titles: Vec<(&str, i32)> = menu
            .categories
            .iter()
            .map(|category| (category.title.as_str(), category.order))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("Alpha", 0),
                ("Zeta", 0),
                ("Administration", 10),
                ("Support", 100)
            ]
        );
    }

    #[test]
    fn reversed_input_serializes_identically() {
        let items = vec![
            item("Development", "Jenkins", "/jenkins"),
            item("Development", "Jenkins", "/jenkins-legacy"),
            EntryWithCategory::new(
                Entry::new("Jenkins", "/jenkins").with_target(Target::External),
                "Development",
            ),
            item("Support", "docs", "/docs"),
            item("Administration", "users", "/usermgt"),
        ];
        let mut reversed = items.clone();
        reversed.reverse();

        let forward = serde_json::to_vec(&aggregate(items, &config())).expect("serialize");
        let backward = serde_json::to_vec(&aggregate(reversed, &config())).expect("serialize");
        assert_eq!(forward, backward);
    }
}
