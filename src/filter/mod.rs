//! Dive list filtering.
//!
//! Four [`CategoryFilter`]s (tag, buddy, location, suit) each keep a list of
//! checkable entries with dive counts. A [`FilterCoordinator`] ANDs the
//! registered ones, optionally together with a free-text [`TextFilter`], into
//! one visibility flag per dive. A dive-site override bypasses all of them.

pub mod category;
pub mod coordinator;
pub mod item;
pub mod text;

pub use category::{CategoryFilter, FilterCategory, FilterListener, ListenerId};
pub use coordinator::{FilterCoordinator, FilterObserver, FilterSummary};
pub use item::{FilterItem, FilterItems};
pub use text::TextFilter;
