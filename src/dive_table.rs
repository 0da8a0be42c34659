//! In-memory dive table shared between the host application and the filters.
//!
//! The host owns the contents; filters read dive fields and write only the
//! per-dive `hidden_by_filter` and `selected` flags.

use crate::models::{Dive, DiveId, Site, SiteId, TripId};

#[derive(Clone, Debug, Default)]
pub struct DiveTable {
    dives: Vec<Dive>,
    sites: Vec<Site>,
}

impl DiveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(sites: Vec<Site>, dives: Vec<Dive>) -> Self {
        Self { dives, sites }
    }

    pub fn len(&self) -> usize {
        self.dives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dives.is_empty()
    }

    pub fn dives(&self) -> &[Dive] {
        &self.dives
    }

    pub fn dives_mut(&mut self) -> impl Iterator<Item = &mut Dive> {
        self.dives.iter_mut()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn index_of(&self, id: DiveId) -> Option<usize> {
        self.dives.iter().position(|d| d.id == id)
    }

    pub fn dive(&self, id: DiveId) -> Option<&Dive> {
        self.dives.iter().find(|d| d.id == id)
    }

    pub fn dive_mut(&mut self, id: DiveId) -> Option<&mut Dive> {
        self.dives.iter_mut().find(|d| d.id == id)
    }

    /// Replace the dive with the same id, or append it.
    ///
    /// A dive without a number (0) gets the next free one.
    pub fn upsert_dive(&mut self, mut dive: Dive) {
        if dive.number == 0 {
            dive.number = self.next_dive_number();
        }
        match self.index_of(dive.id) {
            Some(idx) => {
                // filter flags belong to the filter core, not the caller
                dive.hidden_by_filter = self.dives[idx].hidden_by_filter;
                dive.selected = self.dives[idx].selected;
                self.dives[idx] = dive;
            }
            None => self.dives.push(dive),
        }
    }

    pub fn remove_dive(&mut self, id: DiveId) -> Option<Dive> {
        let idx = self.index_of(id)?;
        Some(self.dives.remove(idx))
    }

    pub fn next_dive_number(&self) -> i32 {
        self.dives.iter().map(|d| d.number).max().unwrap_or(0).max(0) + 1
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    /// Insert or replace a site. Returns the previous site, if any.
    pub fn upsert_site(&mut self, site: Site) -> Option<Site> {
        match self.sites.iter().position(|s| s.id == site.id) {
            Some(idx) => Some(std::mem::replace(&mut self.sites[idx], site)),
            None => {
                self.sites.push(site);
                None
            }
        }
    }

    /// The dive's site, if it has one that still exists.
    pub fn dive_site(&self, dive: &Dive) -> Option<&Site> {
        dive.site_id.and_then(|id| self.site(id))
    }

    /// Location name of a dive; empty when it has no (known) site.
    pub fn dive_location(&self, dive: &Dive) -> &str {
        self.dive_site(dive).map(|s| s.name.as_str()).unwrap_or("")
    }

    pub fn visible_ids(&self) -> Vec<DiveId> {
        self.dives
            .iter()
            .filter(|d| d.is_visible())
            .map(|d| d.id)
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<DiveId> {
        self.dives
            .iter()
            .filter(|d| d.selected)
            .map(|d| d.id)
            .collect()
    }

    pub fn trip_shown_dives(&self, trip: TripId) -> usize {
        self.dives
            .iter()
            .filter(|d| d.trip_id == Some(trip) && d.is_visible())
            .count()
    }

    /// A trip is shown as long as any of its dives is.
    pub fn is_trip_visible(&self, trip: TripId) -> bool {
        self.trip_shown_dives(trip) > 0
    }
}
