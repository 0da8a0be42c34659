pub mod config;
pub mod dive_table;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod models;

uniffi::include_scaffolding!("divelog_filter");

pub use config::{default_settings, load_settings, FilterSettings};
pub use dive_table::DiveTable;
pub use engine::{FilterEngine, FilterState};
pub use error::FilterError;
pub use ffi::DiveFilterSession;
pub use filter::{
    CategoryFilter, FilterCategory, FilterCoordinator, FilterItem, FilterItems, FilterListener,
    FilterObserver, FilterSummary, TextFilter,
};
pub use models::{Dive, DiveId, DiveRecord, DiveSite, Site, SiteId, Tag, TripId};
