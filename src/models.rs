#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiveId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
}

/// A logged dive as seen by the filter core.
///
/// Everything except `hidden_by_filter` and `selected` is owned by the host
/// application; the filter core only reads those fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dive {
    pub id: DiveId,
    pub number: i32,
    pub tags: Vec<Tag>,
    pub buddy: String,
    pub divemaster: String,
    pub suit: String,
    pub notes: String,
    pub site_id: Option<SiteId>,
    pub trip_id: Option<TripId>,
    pub hidden_by_filter: bool,
    pub selected: bool,
}

impl Dive {
    pub fn new(id: u32) -> Self {
        Self {
            id: DiveId(id),
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden_by_filter
    }

    /// Buddy and divemaster names, split on commas and trimmed.
    pub fn persons(&self) -> Vec<&str> {
        self.buddy
            .split(',')
            .chain(self.divemaster.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.0.as_str())
    }
}

/// Record shape of a dive as passed across the FFI boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiveRecord {
    pub id: u32,
    pub number: i32,
    pub tags: Vec<String>,
    pub buddy: String,
    pub divemaster: String,
    pub suit: String,
    pub notes: String,
    pub site_id: Option<u32>,
    pub trip_id: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiveSite {
    pub id: u32,
    pub name: String,
}

impl From<DiveRecord> for Dive {
    fn from(record: DiveRecord) -> Self {
        Self {
            id: DiveId(record.id),
            number: record.number,
            tags: record.tags.into_iter().map(Tag).collect(),
            buddy: record.buddy,
            divemaster: record.divemaster,
            suit: record.suit,
            notes: record.notes,
            site_id: record.site_id.map(SiteId),
            trip_id: record.trip_id.map(TripId),
            hidden_by_filter: false,
            selected: false,
        }
    }
}

impl From<DiveSite> for Site {
    fn from(site: DiveSite) -> Self {
        Self {
            id: SiteId(site.id),
            name: site.name,
        }
    }
}
