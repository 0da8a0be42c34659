//! Checkbox entries backing one category filter.

use std::fmt;

/// One selectable row of a category filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterItem {
    pub name: String,
    pub checked: bool,
    /// Number of dives carrying this value, as of the last repopulation.
    pub count: u32,
}

impl FilterItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
            count: 0,
        }
    }
}

impl fmt::Display for FilterItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.count)
    }
}

/// Ordered entries of one category. The last entry, when present, is the
/// sentinel standing for dives without a value in this category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterItems {
    items: Vec<FilterItem>,
    any_checked: bool,
}

impl FilterItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[FilterItem] {
        &self.items
    }

    pub fn any_checked(&self) -> bool {
        self.any_checked
    }

    pub fn sentinel(&self) -> Option<&FilterItem> {
        self.items.last()
    }

    /// Entries carrying a real value, i.e. everything but the sentinel.
    pub fn values(&self) -> &[FilterItem] {
        match self.items.split_last() {
            Some((_, values)) => values,
            None => &[],
        }
    }

    /// Replace the entries with `names`, whose last element is the sentinel.
    ///
    /// Checked state survives for every old value whose name is still
    /// present; the sentinel carries its state over separately. `count` is
    /// called with each value name and with `""` for the sentinel.
    pub fn update_list<F>(&mut self, names: Vec<String>, count: F)
    where
        F: Fn(&str) -> u32,
    {
        let old = std::mem::take(&mut self.items);
        self.items = names.into_iter().map(FilterItem::new).collect();
        self.any_checked = false;

        let value_count = self.items.len().saturating_sub(1);
        if let Some((old_sentinel, old_values)) = old.split_last() {
            for entry in old_values.iter().filter(|e| e.checked) {
                if let Some(item) = self.items[..value_count]
                    .iter_mut()
                    .find(|i| i.name == entry.name)
                {
                    item.checked = true;
                    self.any_checked = true;
                }
            }

            if old_sentinel.checked {
                if let Some(sentinel) = self.items.last_mut() {
                    sentinel.checked = true;
                    self.any_checked = true;
                }
            }
        }

        for (idx, item) in self.items.iter_mut().enumerate() {
            item.count = if idx < value_count {
                count(&item.name)
            } else {
                count("")
            };
        }
    }

    /// Panics when `index` is out of range.
    pub fn set_checked(&mut self, index: usize, checked: bool) {
        assert!(
            index < self.items.len(),
            "filter entry {index} out of range ({} entries)",
            self.items.len()
        );
        self.items[index].checked = checked;
        self.refresh_any_checked();
    }

    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.checked = false;
        }
        self.any_checked = false;
    }

    pub fn select_all(&mut self) {
        for item in &mut self.items {
            item.checked = true;
        }
        self.refresh_any_checked();
    }

    pub fn invert(&mut self) {
        for item in &mut self.items {
            item.checked = !item.checked;
        }
        self.refresh_any_checked();
    }

    /// Rename a value entry. If an entry called `new` already exists the two
    /// are merged: checked state is OR-ed and counts are summed.
    ///
    /// Returns false when nothing was renamed.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old.is_empty() || new.is_empty() || old == new {
            return false;
        }
        let value_count = self.items.len().saturating_sub(1);
        let values = &self.items[..value_count];
        let Some(old_idx) = values.iter().position(|i| i.name == old) else {
            return false;
        };

        match values.iter().position(|i| i.name == new) {
            Some(new_idx) => {
                let merged = self.items.remove(old_idx);
                let target = if new_idx > old_idx { new_idx - 1 } else { new_idx };
                self.items[target].checked |= merged.checked;
                self.items[target].count += merged.count;
            }
            None => self.items[old_idx].name = new.to_string(),
        }
        true
    }

    /// Put a new value in front of the list, already checked, so it stays
    /// visible under an active selection. Only applies while something is
    /// checked and the name is not yet listed.
    pub fn prepend_checked(&mut self, name: &str) -> bool {
        if !self.any_checked || name.is_empty() || self.values().iter().any(|i| i.name == name) {
            return false;
        }
        self.items.insert(
            0,
            FilterItem {
                name: name.to_string(),
                checked: true,
                count: 0,
            },
        );
        true
    }

    fn refresh_any_checked(&mut self) {
        self.any_checked = self.items.iter().any(|i| i.checked);
    }
}
