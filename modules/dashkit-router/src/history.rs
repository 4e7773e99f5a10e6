//! Back/forward stack of visited locations.

use crate::params::Location;

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Location>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh visit. Drops anything ahead of the cursor.
    pub fn push(&mut self, location: Location) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push(location);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Overwrite the current entry, or record a first one.
    pub fn replace(&mut self, location: Location) {
        if let Some(entry) = self.cursor.and_then(|cursor| self.entries.get_mut(cursor)) {
            *entry = location;
            return;
        }
        self.push(location);
    }

    pub fn current(&self) -> Option<&Location> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    pub fn back(&mut self) -> Option<Location> {
        let cursor = self.cursor?.checked_sub(1)?;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    pub fn forward(&mut self) -> Option<Location> {
        let cursor = self.cursor? + 1;
        let location = self.entries.get(cursor).cloned()?;
        self.cursor = Some(cursor);
        Some(location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
