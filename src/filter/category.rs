//! Per-attribute dive filters (tag, buddy, location, suit).

use std::sync::Arc;

use crate::dive_table::DiveTable;
use crate::filter::item::{FilterItem, FilterItems};
use crate::models::Dive;

/// The dive attribute a [`CategoryFilter`] selects on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterCategory {
    Tag,
    Buddy,
    Location,
    Suit,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 4] = [
        FilterCategory::Tag,
        FilterCategory::Buddy,
        FilterCategory::Location,
        FilterCategory::Suit,
    ];

    /// Label of the trailing "no value" entry.
    pub fn sentinel_label(&self) -> &'static str {
        match self {
            FilterCategory::Tag => "Empty tags",
            FilterCategory::Buddy => "No buddies",
            FilterCategory::Location => "No location set",
            FilterCategory::Suit => "No suit set",
        }
    }

    /// Values of this attribute on `dive`. Empty means "no value".
    pub fn values<'a>(&self, dive: &'a Dive, table: &'a DiveTable) -> Vec<&'a str> {
        let single = |s: &'a str| if s.is_empty() { vec![] } else { vec![s] };
        match self {
            FilterCategory::Tag => dive.tag_names().filter(|t| !t.is_empty()).collect(),
            FilterCategory::Buddy => dive.persons(),
            FilterCategory::Location => single(table.dive_location(dive)),
            FilterCategory::Suit => single(dive.suit.as_str()),
        }
    }
}

/// Receives a call after every mutation of a [`CategoryFilter`].
pub trait FilterListener: Send + Sync {
    fn filter_changed(&self, category: FilterCategory);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Checkbox filter over one dive attribute.
///
/// With nothing checked every dive passes. Otherwise a dive passes when one
/// of its values is checked, or when it has no value and the sentinel is
/// checked; `negate` inverts that decision.
pub struct CategoryFilter {
    category: FilterCategory,
    items: FilterItems,
    negate: bool,
    case_sensitive: bool,
    listeners: Vec<(ListenerId, Arc<dyn FilterListener>)>,
    next_listener: u64,
    /// Checked locations inserted by [`add_location`](Self::add_location)
    /// that no dive uses yet.
    pending: Vec<String>,
}

impl std::fmt::Debug for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryFilter")
            .field("category", &self.category)
            .field("items", &self.items)
            .field("negate", &self.negate)
            .field("case_sensitive", &self.case_sensitive)
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl CategoryFilter {
    pub fn new(category: FilterCategory) -> Self {
        Self {
            category,
            items: FilterItems::new(),
            negate: false,
            case_sensitive: category != FilterCategory::Buddy,
            listeners: Vec::new(),
            next_listener: 0,
            pending: Vec::new(),
        }
    }

    /// Only buddy names honour this; other categories always compare exactly.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive || self.category != FilterCategory::Buddy;
        self
    }

    pub fn category(&self) -> FilterCategory {
        self.category
    }

    pub fn entries(&self) -> &[FilterItem] {
        self.items.as_slice()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn any_checked(&self) -> bool {
        self.items.any_checked()
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn subscribe(&mut self, listener: Arc<dyn FilterListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Rebuild the entries from the current dive table.
    pub fn repopulate(&mut self, table: &DiveTable) {
        let mut names: Vec<String> = Vec::new();
        for dive in table.dives() {
            for value in self.category.values(dive, table) {
                if !names.iter().any(|n| n == value) {
                    names.push(value.to_string());
                }
            }
        }
        names.sort();

        // keep checked, not yet used locations listed until a dive refers to them
        let items = &self.items;
        self.pending.retain(|name| {
            !names.contains(name) && items.values().iter().any(|i| i.checked && i.name == *name)
        });
        for name in self.pending.iter().rev() {
            names.insert(0, name.clone());
        }
        names.push(self.category.sentinel_label().to_string());

        let (category, case_sensitive) = (self.category, self.case_sensitive);
        self.items.update_list(names, |name| {
            count_dives(category, case_sensitive, name, table)
        });
        tracing::debug!(
            category = ?self.category,
            entries = self.items.len(),
            any_checked = self.items.any_checked(),
            "repopulated filter"
        );
        self.notify();
    }

    pub fn passes(&self, dive: &Dive, table: &DiveTable) -> bool {
        if !self.items.any_checked() {
            return true;
        }
        let Some(sentinel) = self.items.sentinel() else {
            return true;
        };

        let values = self.category.values(dive, table);
        if values.is_empty() {
            return sentinel.checked != self.negate;
        }

        let hit = self
            .items
            .values()
            .iter()
            .filter(|item| item.checked)
            .any(|item| {
                values
                    .iter()
                    .any(|v| names_match(v, &item.name, self.case_sensitive))
            });
        hit != self.negate
    }

    /// Panics when `index` is out of range.
    pub fn set_checked(&mut self, index: usize, checked: bool) {
        self.items.set_checked(index, checked);
        tracing::trace!(category = ?self.category, index, checked, "set filter entry");
        self.notify();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.items.select_all();
        self.notify();
    }

    pub fn invert(&mut self) {
        self.items.invert();
        self.notify();
    }

    pub fn set_negate(&mut self, negate: bool) {
        self.negate = negate;
        self.notify();
    }

    /// Follow a location rename so the selection survives the next
    /// repopulation.
    pub fn rename_location(&mut self, old: &str, new: &str) {
        if self.category != FilterCategory::Location {
            tracing::warn!(category = ?self.category, "rename ignored on non-location filter");
            return;
        }
        if self.items.rename(old, new) {
            if self.pending.iter().any(|n| n == old) {
                self.pending.retain(|n| n != old && n != new);
                self.pending.push(new.to_string());
            }
            self.notify();
        }
    }

    /// Register a freshly created location; see [`FilterItems::prepend_checked`].
    pub fn add_location(&mut self, name: &str) {
        if self.category != FilterCategory::Location {
            tracing::warn!(category = ?self.category, "insert ignored on non-location filter");
            return;
        }
        if self.items.prepend_checked(name) {
            self.pending.push(name.to_string());
            self.notify();
        }
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener.filter_changed(self.category);
        }
    }
}

/// Number of dives with `name` among their values; `""` counts dives without
/// any value.
fn count_dives(
    category: FilterCategory,
    case_sensitive: bool,
    name: &str,
    table: &DiveTable,
) -> u32 {
    let matching = table.dives().iter().filter(|dive| {
        let values = category.values(dive, table);
        if name.is_empty() {
            values.is_empty()
        } else {
            values.iter().any(|v| names_match(v, name, case_sensitive))
        }
    });
    matching.count() as u32
}

fn names_match(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Site, SiteId, Tag};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_table() -> DiveTable {
        let tags = |list: &[&str]| -> Vec<Tag> {
            list.iter().map(|t| Tag(t.to_string())).collect()
        };
        DiveTable::from_parts(
            vec![
                Site {
                    id: SiteId(1),
                    name: "Reef Point".to_string(),
                },
                Site {
                    id: SiteId(2),
                    name: "Anchor Bay".to_string(),
                },
            ],
            vec![
                Dive {
                    tags: tags(&["reef", "night"]),
                    buddy: "Alice, Bob".to_string(),
                    suit: "Wetsuit".to_string(),
                    site_id: Some(SiteId(1)),
                    ..Dive::new(1)
                },
                Dive {
                    tags: tags(&["wreck"]),
                    buddy: "bob".to_string(),
                    divemaster: "Carol".to_string(),
                    suit: "Wetsuit".to_string(),
                    site_id: Some(SiteId(2)),
                    ..Dive::new(2)
                },
                Dive { ..Dive::new(3) },
            ],
        )
    }

    fn populated(category: FilterCategory, table: &DiveTable) -> CategoryFilter {
        let mut filter = CategoryFilter::new(category).with_case_sensitive(false);
        filter.repopulate(table);
        filter
    }

    fn index_of(filter: &CategoryFilter, name: &str) -> usize {
        filter
            .entries()
            .iter()
            .position(|i| i.name == name)
            .unwrap()
    }

    fn passing(filter: &CategoryFilter, table: &DiveTable) -> Vec<u32> {
        table
            .dives()
            .iter()
            .filter(|d| filter.passes(d, table))
            .map(|d| d.id.0)
            .collect()
    }

    struct Counter(AtomicUsize);

    impl FilterListener for Counter {
        fn filter_changed(&self, _category: FilterCategory) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_repopulate_suit_entries() {
        let table = create_test_table();
        let filter = populated(FilterCategory::Suit, &table);
        assert_eq!(
            filter.entries(),
            &[
                FilterItem {
                    name: "Wetsuit".to_string(),
                    checked: false,
                    count: 2
                },
                FilterItem {
                    name: "No suit set".to_string(),
                    checked: false,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_repopulate_buddy_entries_are_sorted_and_distinct() {
        let table = create_test_table();
        let filter = populated(FilterCategory::Buddy, &table);
        let names: Vec<&str> = filter.entries().iter().map(|i| i.name.as_str()).collect();
        // distinctness is exact, so "bob" and "Bob" are separate rows
        assert_eq!(names, vec!["Alice", "Bob", "Carol", "bob", "No buddies"]);
        assert_eq!(filter.entries()[index_of(&filter, "Bob")].count, 2);
        assert_eq!(filter.entries()[4].count, 1);
    }

    #[test]
    fn test_repopulate_location_uses_site_names() {
        let table = create_test_table();
        let filter = populated(FilterCategory::Location, &table);
        let names: Vec<&str> = filter.entries().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Anchor Bay", "Reef Point", "No location set"]);
    }

    #[test]
    fn test_nothing_checked_passes_everything() {
        let table = create_test_table();
        for category in FilterCategory::ALL {
            let mut filter = populated(category, &table);
            assert_eq!(passing(&filter, &table), vec![1, 2, 3]);
            filter.set_negate(true);
            assert_eq!(passing(&filter, &table), vec![1, 2, 3]);
        }
        let empty = CategoryFilter::new(FilterCategory::Tag);
        assert_eq!(passing(&empty, &table), vec![1, 2, 3]);
    }

    #[test]
    fn test_tag_filter_matches_any_tag() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Tag, &table);
        filter.set_checked(index_of(&filter, "night"), true);
        assert_eq!(passing(&filter, &table), vec![1]);

        filter.set_checked(index_of(&filter, "wreck"), true);
        assert_eq!(passing(&filter, &table), vec![1, 2]);
    }

    #[test]
    fn test_sentinel_selects_dives_without_value() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Tag, &table);
        let sentinel = filter.len() - 1;
        filter.set_checked(sentinel, true);
        assert_eq!(passing(&filter, &table), vec![3]);

        filter.set_negate(true);
        assert_eq!(passing(&filter, &table), vec![1, 2]);
    }

    #[test]
    fn test_negate_inverts_non_permissive_result() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Suit, &table);
        filter.set_checked(0, true);
        let plain: Vec<bool> = table.dives().iter().map(|d| filter.passes(d, &table)).collect();
        filter.set_negate(true);
        let negated: Vec<bool> = table.dives().iter().map(|d| filter.passes(d, &table)).collect();
        assert_eq!(plain, vec![true, true, false]);
        assert!(plain.iter().zip(&negated).all(|(a, b)| a != b));
    }

    #[test]
    fn test_buddy_matching_case_insensitive_by_default() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Buddy, &table);
        filter.set_checked(index_of(&filter, "Bob"), true);
        assert_eq!(passing(&filter, &table), vec![1, 2]);
    }

    #[test]
    fn test_buddy_matching_case_sensitive_setting() {
        let table = create_test_table();
        let mut filter = CategoryFilter::new(FilterCategory::Buddy).with_case_sensitive(true);
        filter.repopulate(&table);
        filter.set_checked(index_of(&filter, "Bob"), true);
        assert_eq!(passing(&filter, &table), vec![1]);
        assert_eq!(filter.entries()[index_of(&filter, "Bob")].count, 1);
    }

    #[test]
    fn test_divemaster_counts_as_buddy() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Buddy, &table);
        filter.set_checked(index_of(&filter, "Carol"), true);
        assert_eq!(passing(&filter, &table), vec![2]);
    }

    #[test]
    fn test_repopulate_keeps_checked_entries() {
        let mut table = create_test_table();
        let mut filter = populated(FilterCategory::Tag, &table);
        filter.set_checked(index_of(&filter, "reef"), true);

        filter.repopulate(&table);
        assert!(filter.entries()[index_of(&filter, "reef")].checked);

        table.upsert_dive(Dive {
            number: 1,
            tags: vec![Tag("night".to_string())],
            ..Dive::new(1)
        });
        filter.repopulate(&table);
        assert!(filter.entries().iter().all(|i| i.name != "reef"));
        assert!(!filter.any_checked());
    }

    #[test]
    fn test_location_rename_and_insert() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Location, &table);
        filter.set_checked(index_of(&filter, "Reef Point"), true);

        filter.rename_location("Reef Point", "Reef Pt");
        assert!(filter.entries()[index_of(&filter, "Reef Pt")].checked);

        filter.add_location("Kelp Forest");
        assert_eq!(filter.entries()[0].name, "Kelp Forest");
        assert!(filter.entries()[0].checked);
    }

    #[test]
    fn test_added_location_survives_repopulate_until_used() {
        let mut table = create_test_table();
        let mut filter = populated(FilterCategory::Location, &table);
        filter.set_checked(index_of(&filter, "Reef Point"), true);
        filter.add_location("Kelp Forest");

        // no dive uses the new site yet
        filter.repopulate(&table);
        let kelp = &filter.entries()[0];
        assert_eq!((kelp.name.as_str(), kelp.checked, kelp.count), ("Kelp Forest", true, 0));
        assert_eq!(passing(&filter, &table), vec![1]);

        table.upsert_site(Site {
            id: SiteId(3),
            name: "Kelp Forest".to_string(),
        });
        table.upsert_dive(Dive {
            site_id: Some(SiteId(3)),
            ..Dive::new(4)
        });
        filter.repopulate(&table);
        let names: Vec<&str> = filter.entries().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Anchor Bay", "Kelp Forest", "Reef Point", "No location set"]
        );
        assert!(filter.entries()[1].checked);
        assert_eq!(filter.entries()[1].count, 1);
        assert_eq!(passing(&filter, &table), vec![1, 4]);
    }

    #[test]
    fn test_unchecked_added_location_dropped_on_repopulate() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Location, &table);
        filter.set_checked(index_of(&filter, "Reef Point"), true);
        filter.add_location("Kelp Forest");
        filter.set_checked(0, false);

        filter.repopulate(&table);
        assert!(filter.entries().iter().all(|i| i.name != "Kelp Forest"));
        assert!(filter.entries()[index_of(&filter, "Reef Point")].checked);
    }

    #[test]
    fn test_renamed_added_location_stays_listed() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Location, &table);
        filter.set_checked(index_of(&filter, "Anchor Bay"), true);
        filter.add_location("Kelp");
        filter.rename_location("Kelp", "Kelp Forest");

        filter.repopulate(&table);
        assert_eq!(filter.entries()[0].name, "Kelp Forest");
        assert!(filter.entries()[0].checked);
    }

    #[test]
    fn test_new_buddy_filter_ignores_case() {
        let table = create_test_table();
        let mut filter = CategoryFilter::new(FilterCategory::Buddy);
        filter.repopulate(&table);
        filter.set_checked(index_of(&filter, "bob"), true);
        assert_eq!(passing(&filter, &table), vec![1, 2]);

        // other categories stay exact
        let mut suits = CategoryFilter::new(FilterCategory::Suit);
        suits.repopulate(&DiveTable::from_parts(
            vec![],
            vec![Dive {
                suit: "wetsuit".to_string(),
                ..Dive::new(9)
            }],
        ));
        suits.set_checked(0, true);
        assert!(passing(&suits, &table).is_empty());
    }

    /// Check exactly the entries whose bit is set in `mask`.
    fn apply_mask(filter: &mut CategoryFilter, mask: u32) {
        filter.clear();
        for index in 0..filter.len() {
            if mask & (1 << index) != 0 {
                filter.set_checked(index, true);
            }
        }
    }

    #[test]
    fn test_sentinel_decides_only_dives_without_value() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Tag, &table);
        let sentinel_bit = 1 << (filter.len() - 1);
        let untagged = &table.dives()[2];

        for mask in 1..(1u32 << filter.len()) {
            for negate in [false, true] {
                filter.set_negate(negate);
                apply_mask(&mut filter, mask);
                let sentinel_checked = mask & sentinel_bit != 0;
                assert_eq!(
                    filter.passes(untagged, &table),
                    sentinel_checked != negate,
                    "mask {mask:#b} negate {negate}"
                );

                // toggling the sentinel never changes tagged dives while a value stays checked
                if mask & !sentinel_bit != 0 {
                    let tagged: Vec<bool> =
                        table.dives()[..2].iter().map(|d| filter.passes(d, &table)).collect();
                    apply_mask(&mut filter, mask ^ sentinel_bit);
                    let toggled: Vec<bool> =
                        table.dives()[..2].iter().map(|d| filter.passes(d, &table)).collect();
                    assert_eq!(tagged, toggled, "mask {mask:#b} negate {negate}");
                }
            }
        }
    }

    #[test]
    fn test_negate_is_exact_complement_for_every_selection() {
        let table = create_test_table();
        for category in FilterCategory::ALL {
            let mut filter = populated(category, &table);
            for mask in 1..(1u32 << filter.len()) {
                apply_mask(&mut filter, mask);
                filter.set_negate(false);
                let plain: Vec<bool> =
                    table.dives().iter().map(|d| filter.passes(d, &table)).collect();
                filter.set_negate(true);
                let negated: Vec<bool> =
                    table.dives().iter().map(|d| filter.passes(d, &table)).collect();
                assert!(
                    plain.iter().zip(&negated).all(|(a, b)| a != b),
                    "{category:?} mask {mask:#b}: {plain:?} vs {negated:?}"
                );
            }
        }
    }

    #[test]
    fn test_location_ops_ignored_on_other_categories() {
        let table = create_test_table();
        let mut filter = populated(FilterCategory::Suit, &table);
        filter.set_checked(0, true);
        let before = filter.entries().to_vec();
        filter.rename_location("Wetsuit", "Shorty");
        filter.add_location("Drysuit");
        assert_eq!(filter.entries(), before.as_slice());
    }

    #[test]
    fn test_listeners_notified_on_every_mutation() {
        let table = create_test_table();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let mut filter = CategoryFilter::new(FilterCategory::Suit);
        let id = filter.subscribe(counter.clone());

        filter.repopulate(&table);
        filter.set_checked(0, true);
        filter.set_negate(true);
        filter.invert();
        filter.select_all();
        filter.clear();
        assert_eq!(counter.0.load(Ordering::SeqCst), 6);

        filter.unsubscribe(id);
        filter.clear();
        assert_eq!(counter.0.load(Ordering::SeqCst), 6);
    }
}
