//! Combines the category filters into one visibility decision per dive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::FilterSettings;
use crate::dive_table::DiveTable;
use crate::error::FilterError;
use crate::filter::category::{CategoryFilter, FilterCategory, FilterListener, ListenerId};
use crate::filter::text::TextFilter;
use crate::models::{Dive, SiteId};

/// Outcome of one full recomputation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub displayed: u32,
    pub total: u32,
}

/// Told once per finished recomputation.
pub trait FilterObserver: Send + Sync {
    fn filter_finished(&self, summary: FilterSummary);
}

/// Set by registered filters whenever they change.
#[derive(Debug, Default)]
struct Invalidation {
    dirty: AtomicBool,
}

impl FilterListener for Invalidation {
    fn filter_changed(&self, category: FilterCategory) {
        tracing::trace!(?category, "filter invalidated");
        self.dirty.store(true, Ordering::SeqCst);
    }
}

struct Slot {
    filter: CategoryFilter,
    registration: Option<ListenerId>,
}

/// Owns one [`CategoryFilter`] per category and decides dive visibility.
///
/// Only registered filters take part in [`evaluate`](Self::evaluate), and
/// only their changes schedule a recomputation. A dive-site override, when
/// set, replaces every other criterion.
pub struct FilterCoordinator {
    slots: Vec<Slot>,
    active: Vec<FilterCategory>,
    dive_site: Option<SiteId>,
    text: Option<TextFilter>,
    settings: FilterSettings,
    displayed: u32,
    invalidation: Arc<Invalidation>,
    observers: Vec<Box<dyn FilterObserver>>,
}

impl FilterCoordinator {
    pub fn new(settings: FilterSettings) -> Self {
        let slots = FilterCategory::ALL
            .into_iter()
            .map(|category| Slot {
                filter: CategoryFilter::new(category)
                    .with_case_sensitive(settings.buddy_case_sensitive),
                registration: None,
            })
            .collect();
        Self {
            slots,
            active: Vec::new(),
            dive_site: None,
            text: None,
            settings,
            displayed: 0,
            invalidation: Arc::new(Invalidation::default()),
            observers: Vec::new(),
        }
    }

    fn slot(&self, category: FilterCategory) -> &Slot {
        // every category gets a slot in `new`, in `ALL` order
        &self.slots[category as usize]
    }

    fn slot_mut(&mut self, category: FilterCategory) -> &mut Slot {
        &mut self.slots[category as usize]
    }

    pub fn filter(&self, category: FilterCategory) -> &CategoryFilter {
        &self.slot(category).filter
    }

    /// Mutations made through this reference only schedule a recomputation;
    /// callers must follow up with [`refresh`](Self::refresh).
    pub(crate) fn filter_mut(&mut self, category: FilterCategory) -> &mut CategoryFilter {
        &mut self.slot_mut(category).filter
    }

    /// Apply `change` to one filter. If the filter is registered the dives
    /// are recomputed before this returns.
    pub fn update_filter<F>(
        &mut self,
        category: FilterCategory,
        table: &mut DiveTable,
        change: F,
    ) -> FilterSummary
    where
        F: FnOnce(&mut CategoryFilter),
    {
        change(self.filter_mut(category));
        self.refresh(table)
            .unwrap_or_else(|| self.summary(table))
    }

    pub fn set_checked(
        &mut self,
        category: FilterCategory,
        index: usize,
        checked: bool,
        table: &mut DiveTable,
    ) -> Result<FilterSummary, FilterError> {
        let len = self.filter(category).len();
        if index >= len {
            return Err(FilterError::IndexOutOfRange {
                index: index as u32,
                len: len as u32,
            });
        }
        Ok(self.update_filter(category, table, |f| f.set_checked(index, checked)))
    }

    pub fn active_filters(&self) -> &[FilterCategory] {
        &self.active
    }

    pub fn is_active(&self, category: FilterCategory) -> bool {
        self.active.contains(&category)
    }

    pub fn add_filter(&mut self, category: FilterCategory) {
        if self.is_active(category) {
            return;
        }
        let listener: Arc<dyn FilterListener> = self.invalidation.clone();
        let slot = self.slot_mut(category);
        slot.registration = Some(slot.filter.subscribe(listener));
        self.active.push(category);
        self.invalidate();
    }

    pub fn remove_filter(&mut self, category: FilterCategory) {
        let slot = self.slot_mut(category);
        let Some(id) = slot.registration.take() else {
            return;
        };
        slot.filter.unsubscribe(id);
        self.active.retain(|c| *c != category);
        self.invalidate();
    }

    pub fn add_observer(&mut self, observer: Box<dyn FilterObserver>) {
        self.observers.push(observer);
    }

    pub fn dive_site_filter(&self) -> Option<SiteId> {
        self.dive_site
    }

    pub fn text_filter(&self) -> Option<&TextFilter> {
        self.text.as_ref()
    }

    pub fn displayed_count(&self) -> u32 {
        self.displayed
    }

    /// Result of the last recomputation against the current table size.
    pub fn summary(&self, table: &DiveTable) -> FilterSummary {
        FilterSummary {
            displayed: self.displayed,
            total: table.len() as u32,
        }
    }

    pub fn needs_refresh(&self) -> bool {
        self.invalidation.dirty.load(Ordering::SeqCst)
    }

    fn invalidate(&self) {
        self.invalidation.dirty.store(true, Ordering::SeqCst);
    }

    pub fn evaluate(&self, dive: &Dive, table: &DiveTable) -> bool {
        if let Some(site_id) = self.dive_site {
            return matches_site(dive, site_id, table);
        }

        if let Some(text) = &self.text {
            if !text.matches(dive, table) {
                return false;
            }
        }

        self.active
            .iter()
            .all(|category| self.filter(*category).passes(dive, table))
    }

    /// Re-evaluate every dive, update its flags and report the result.
    ///
    /// Hidden dives are deselected; visible ones keep their selection.
    pub fn recompute_all(&mut self, table: &mut DiveTable) -> FilterSummary {
        self.invalidation.dirty.store(false, Ordering::SeqCst);

        let verdicts: Vec<bool> = table
            .dives()
            .iter()
            .map(|dive| self.evaluate(dive, table))
            .collect();

        let mut displayed = 0;
        for (dive, show) in table.dives_mut().zip(verdicts) {
            dive.hidden_by_filter = !show;
            if show {
                displayed += 1;
            } else {
                dive.selected = false;
            }
        }
        self.displayed = displayed;

        let summary = FilterSummary {
            displayed,
            total: table.len() as u32,
        };
        tracing::debug!(
            displayed = summary.displayed,
            total = summary.total,
            dive_site = ?self.dive_site,
            active = self.active.len(),
            "filter finished"
        );
        for observer in &self.observers {
            observer.filter_finished(summary);
        }
        summary
    }

    /// Recompute only if something changed since the last pass.
    pub fn refresh(&mut self, table: &mut DiveTable) -> Option<FilterSummary> {
        self.needs_refresh().then(|| self.recompute_all(table))
    }

    pub fn set_dive_site_filter(
        &mut self,
        site: Option<SiteId>,
        table: &mut DiveTable,
    ) -> FilterSummary {
        self.dive_site = site;
        self.recompute_all(table)
    }

    pub fn set_text_filter(&mut self, text: &str, table: &mut DiveTable) -> FilterSummary {
        self.text = TextFilter::new(
            text,
            self.settings.fulltext_case_sensitive,
            self.settings.fulltext_include_notes,
        );
        self.recompute_all(table)
    }

    /// Clear the selection of every registered filter, then recompute once.
    pub fn clear_all(&mut self, table: &mut DiveTable) -> FilterSummary {
        for category in self.active.clone() {
            self.filter_mut(category).clear();
        }
        self.recompute_all(table)
    }

    /// Rebuild every filter's entries after the dive table changed.
    pub fn repopulate(&mut self, table: &mut DiveTable) -> FilterSummary {
        for slot in &mut self.slots {
            slot.filter.repopulate(table);
        }
        self.recompute_all(table)
    }
}

/// Same site by name, or by id.
fn matches_site(dive: &Dive, site_id: SiteId, table: &DiveTable) -> bool {
    let Some(site) = table.dive_site(dive) else {
        return false;
    };
    let same_name = table
        .site(site_id)
        .is_some_and(|wanted| wanted.name == site.name);
    same_name || site.id == site_id
}
