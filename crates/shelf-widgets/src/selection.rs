#![forbid(unsafe_code)]

//! Selected-id set shared by the list, table and grid containers.
//!
//! Selection is keyed by record id, not by position, so it survives sorting
//! and scrolling. Ids are kept in the order they were selected.

use std::collections::HashSet;
use std::hash::Hash;

/// Ordered set of selected ids.
#[derive(Debug, Clone)]
pub struct Selection<Id> {
    order: Vec<Id>,
    members: HashSet<Id>,
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash> Selection<Id> {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.members.contains(id)
    }

    /// Add `id`. Returns `true` if it was not selected before.
    pub fn select(&mut self, id: Id) -> bool {
        if self.members.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Remove `id`. Returns `true` if it was selected.
    pub fn deselect(&mut self, id: &Id) -> bool {
        if self.members.remove(id) {
            self.order.retain(|x| x != id);
            true
        } else {
            false
        }
    }

    /// Flip `id`. Returns the new state.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.deselect(&id) {
            false
        } else {
            self.select(id);
            true
        }
    }

    /// Select every id in `ids` (the "select all" checkbox over the current
    /// visible set). Already-selected ids keep their position.
    pub fn select_all<I: IntoIterator<Item = Id>>(&mut self, ids: I) {
        for id in ids {
            self.select(id);
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Check if every id in `ids` is selected.
    ///
    /// An empty `ids` is never "all selected", so the header checkbox of an
    /// empty table stays unchecked.
    #[must_use]
    pub fn is_all_selected<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let mut any = false;
        for id in ids {
            if !self.members.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Drop ids that are not in `present`. Returns how many were removed.
    ///
    /// Call after the collection is refetched or refiltered.
    pub fn retain_present<'a, I>(&mut self, present: I) -> usize
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let present: HashSet<&Id> = present.into_iter().collect();
        let before = self.order.len();
        self.order.retain(|id| present.contains(id));
        if self.order.len() != before {
            self.members = self.order.iter().cloned().collect();
        }
        before - self.order.len()
    }

    /// Selected ids in selection order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Id> {
        self.order.iter()
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<Id: Clone + Eq + Hash> FromIterator<Id> for Selection<Id> {
    fn from_iter<T: IntoIterator<Item = Id>>(iter: T) -> Self {
        let mut selection = Self::new();
        selection.select_all(iter);
        selection
    }
}

impl<Id: Eq + Hash> PartialEq for Selection<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<Id: Eq + Hash> Eq for Selection<Id> {}
