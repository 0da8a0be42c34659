//! Dive table plus filter coordinator, kept consistent after every call.
//!
//! Each mutating method finishes the cascade it triggers: dataset edits
//! repopulate all category filters and recompute visibility, entry edits on a
//! registered filter recompute visibility.

use crate::config::FilterSettings;
use crate::dive_table::DiveTable;
use crate::error::FilterError;
use crate::filter::{
    CategoryFilter, FilterCategory, FilterCoordinator, FilterItem, FilterObserver, FilterSummary,
};
use crate::models::{Dive, DiveId, Site, SiteId, TripId};

/// Snapshot of one category filter, for rendering its checkbox list.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterState {
    pub category: FilterCategory,
    pub entries: Vec<FilterItem>,
    pub any_checked: bool,
    pub negate: bool,
    pub active: bool,
}

pub struct FilterEngine {
    table: DiveTable,
    coordinator: FilterCoordinator,
}

impl FilterEngine {
    /// Engine with all four category filters registered.
    pub fn new(settings: FilterSettings) -> Self {
        let mut coordinator = FilterCoordinator::new(settings);
        for category in FilterCategory::ALL {
            coordinator.add_filter(category);
        }
        let mut engine = Self {
            table: DiveTable::new(),
            coordinator,
        };
        engine.dataset_changed();
        engine
    }

    pub fn table(&self) -> &DiveTable {
        &self.table
    }

    pub fn coordinator(&self) -> &FilterCoordinator {
        &self.coordinator
    }

    pub fn filter(&self, category: FilterCategory) -> &CategoryFilter {
        self.coordinator.filter(category)
    }

    pub fn filter_state(&self, category: FilterCategory) -> FilterState {
        let filter = self.coordinator.filter(category);
        FilterState {
            category,
            entries: filter.entries().to_vec(),
            any_checked: filter.any_checked(),
            negate: filter.negate(),
            active: self.coordinator.is_active(category),
        }
    }

    pub fn displayed_count(&self) -> u32 {
        self.coordinator.displayed_count()
    }

    pub fn add_observer(&mut self, observer: Box<dyn FilterObserver>) {
        self.coordinator.add_observer(observer);
    }

    fn dataset_changed(&mut self) -> FilterSummary {
        self.coordinator.repopulate(&mut self.table)
    }

    fn with_filter<F>(&mut self, category: FilterCategory, change: F) -> FilterSummary
    where
        F: FnOnce(&mut CategoryFilter),
    {
        self.coordinator
            .update_filter(category, &mut self.table, change)
    }

    // dataset

    pub fn load(&mut self, sites: Vec<Site>, dives: Vec<Dive>) -> FilterSummary {
        self.table = DiveTable::from_parts(sites, dives);
        tracing::debug!(
            dives = self.table.len(),
            sites = self.table.sites().len(),
            "loaded dive table"
        );
        self.dataset_changed()
    }

    pub fn upsert_dive(&mut self, dive: Dive) -> FilterSummary {
        self.table.upsert_dive(dive);
        self.dataset_changed()
    }

    pub fn remove_dive(&mut self, id: DiveId) -> Result<FilterSummary, FilterError> {
        self.table
            .remove_dive(id)
            .ok_or(FilterError::UnknownDive(id.0))?;
        Ok(self.dataset_changed())
    }

    /// Add or rename a dive site, keeping the location selection in step.
    pub fn upsert_site(&mut self, site: Site) -> FilterSummary {
        let new_name = site.name.clone();
        let location = self.coordinator.filter_mut(FilterCategory::Location);
        match self.table.upsert_site(site) {
            Some(previous) => location.rename_location(&previous.name, &new_name),
            None => location.add_location(&new_name),
        }
        self.dataset_changed()
    }

    pub fn rename_site(&mut self, id: SiteId, name: &str) -> FilterSummary {
        self.upsert_site(Site {
            id,
            name: name.to_string(),
        })
    }

    // category filters

    pub fn set_checked(
        &mut self,
        category: FilterCategory,
        index: usize,
        checked: bool,
    ) -> Result<FilterSummary, FilterError> {
        self.coordinator
            .set_checked(category, index, checked, &mut self.table)
    }

    pub fn clear_filter(&mut self, category: FilterCategory) -> FilterSummary {
        self.with_filter(category, CategoryFilter::clear)
    }

    pub fn select_all(&mut self, category: FilterCategory) -> FilterSummary {
        self.with_filter(category, CategoryFilter::select_all)
    }

    pub fn invert_selection(&mut self, category: FilterCategory) -> FilterSummary {
        self.with_filter(category, CategoryFilter::invert)
    }

    pub fn set_negate(&mut self, category: FilterCategory, negate: bool) -> FilterSummary {
        self.with_filter(category, |f| f.set_negate(negate))
    }

    pub fn add_filter(&mut self, category: FilterCategory) -> FilterSummary {
        self.coordinator.add_filter(category);
        self.coordinator.recompute_all(&mut self.table)
    }

    pub fn remove_filter(&mut self, category: FilterCategory) -> FilterSummary {
        self.coordinator.remove_filter(category);
        self.coordinator.recompute_all(&mut self.table)
    }

    pub fn clear_all(&mut self) -> FilterSummary {
        self.coordinator.clear_all(&mut self.table)
    }

    // overrides

    pub fn start_dive_site_filter(&mut self, site: SiteId) -> FilterSummary {
        self.coordinator
            .set_dive_site_filter(Some(site), &mut self.table)
    }

    pub fn stop_dive_site_filter(&mut self) -> FilterSummary {
        self.coordinator.set_dive_site_filter(None, &mut self.table)
    }

    pub fn set_text_filter(&mut self, text: &str) -> FilterSummary {
        self.coordinator.set_text_filter(text, &mut self.table)
    }

    // per-dive queries

    pub fn is_visible(&self, id: DiveId) -> Result<bool, FilterError> {
        self.table
            .dive(id)
            .map(Dive::is_visible)
            .ok_or(FilterError::UnknownDive(id.0))
    }

    /// Select or deselect a dive. Hidden dives cannot be selected.
    pub fn set_selected(&mut self, id: DiveId, selected: bool) -> Result<(), FilterError> {
        let dive = self
            .table
            .dive_mut(id)
            .ok_or(FilterError::UnknownDive(id.0))?;
        dive.selected = selected && dive.is_visible();
        Ok(())
    }

    pub fn visible_dive_ids(&self) -> Vec<DiveId> {
        self.table.visible_ids()
    }

    pub fn selected_dive_ids(&self) -> Vec<DiveId> {
        self.table.selected_ids()
    }

    pub fn trip_shown_dives(&self, trip: TripId) -> u32 {
        self.table.trip_shown_dives(trip) as u32
    }

    pub fn is_trip_visible(&self, trip: TripId) -> bool {
        self.table.is_trip_visible(trip)
    }
}
