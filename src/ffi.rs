//! Object exported to the host UI through uniffi.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::FilterSettings;
use crate::engine::{FilterEngine, FilterState};
use crate::error::FilterError;
use crate::filter::{FilterCategory, FilterObserver, FilterSummary};
use crate::models::{Dive, DiveId, DiveRecord, DiveSite, Site, SiteId, TripId};

pub struct DiveFilterSession {
    engine: Mutex<FilterEngine>,
}

impl DiveFilterSession {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            engine: Mutex::new(FilterEngine::new(settings)),
        }
    }

    fn engine(&self) -> MutexGuard<'_, FilterEngine> {
        // a panicking observer must not wedge the session
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observers accumulate; each one hears every later recomputation.
    pub fn add_observer(&self, observer: Box<dyn FilterObserver>) {
        self.engine().add_observer(observer);
    }

    pub fn load(&self, sites: Vec<DiveSite>, dives: Vec<DiveRecord>) -> FilterSummary {
        self.engine().load(
            sites.into_iter().map(Site::from).collect(),
            dives.into_iter().map(Dive::from).collect(),
        )
    }

    pub fn upsert_dive(&self, dive: DiveRecord) -> FilterSummary {
        self.engine().upsert_dive(dive.into())
    }

    pub fn remove_dive(&self, id: u32) -> Result<FilterSummary, FilterError> {
        self.engine().remove_dive(DiveId(id))
    }

    pub fn upsert_site(&self, site: DiveSite) -> FilterSummary {
        self.engine().upsert_site(site.into())
    }

    pub fn filter_state(&self, category: FilterCategory) -> FilterState {
        self.engine().filter_state(category)
    }

    pub fn set_checked(
        &self,
        category: FilterCategory,
        index: u32,
        checked: bool,
    ) -> Result<FilterSummary, FilterError> {
        self.engine()
            .set_checked(category, index as usize, checked)
    }

    pub fn clear_filter(&self, category: FilterCategory) -> FilterSummary {
        self.engine().clear_filter(category)
    }

    pub fn select_all(&self, category: FilterCategory) -> FilterSummary {
        self.engine().select_all(category)
    }

    pub fn invert_selection(&self, category: FilterCategory) -> FilterSummary {
        self.engine().invert_selection(category)
    }

    pub fn set_negate(&self, category: FilterCategory, negate: bool) -> FilterSummary {
        self.engine().set_negate(category, negate)
    }

    pub fn add_filter(&self, category: FilterCategory) -> FilterSummary {
        self.engine().add_filter(category)
    }

    pub fn remove_filter(&self, category: FilterCategory) -> FilterSummary {
        self.engine().remove_filter(category)
    }

    pub fn clear_all(&self) -> FilterSummary {
        self.engine().clear_all()
    }

    pub fn start_dive_site_filter(&self, site_id: u32) -> FilterSummary {
        self.engine().start_dive_site_filter(SiteId(site_id))
    }

    pub fn stop_dive_site_filter(&self) -> FilterSummary {
        self.engine().stop_dive_site_filter()
    }

    pub fn set_text_filter(&self, text: String) -> FilterSummary {
        self.engine().set_text_filter(&text)
    }

    pub fn is_visible(&self, id: u32) -> Result<bool, FilterError> {
        self.engine().is_visible(DiveId(id))
    }

    pub fn set_selected(&self, id: u32, selected: bool) -> Result<(), FilterError> {
        self.engine().set_selected(DiveId(id), selected)
    }

    pub fn visible_dive_ids(&self) -> Vec<u32> {
        self.engine()
            .visible_dive_ids()
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    pub fn selected_dive_ids(&self) -> Vec<u32> {
        self.engine()
            .selected_dive_ids()
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    pub fn displayed_count(&self) -> u32 {
        self.engine().displayed_count()
    }

    pub fn trip_shown_dives(&self, trip_id: u32) -> u32 {
        self.engine().trip_shown_dives(TripId(trip_id))
    }

    pub fn is_trip_visible(&self, trip_id: u32) -> bool {
        self.engine().is_trip_visible(TripId(trip_id))
    }
}
