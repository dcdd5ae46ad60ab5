use ahash::HashMap;
use egui::{Rect, Vec2};

use super::host::{ItemHandle, same_item};

/// A currently mounted grid cell plus the render state the engine drives for it.
pub struct RegisteredItem {
    pub(super) index: usize,
    pub(super) handle: ItemHandle,
    pub(super) is_dragging: bool,
    pub(super) gap_offset: Vec2,
}

impl RegisteredItem {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rect(&self) -> Option<Rect> {
        self.handle.rect()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn gap_offset(&self) -> Vec2 {
        self.gap_offset
    }
}

impl std::fmt::Debug for RegisteredItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredItem")
            .field("index", &self.index)
            .field("rect", &self.rect())
            .field("is_dragging", &self.is_dragging)
            .field("gap_offset", &self.gap_offset)
            .finish()
    }
}

/// Mounted cells keyed by index, remembering registration order.
///
/// Hit-testing walks items in registration order; neighbor lookups go by numeric index.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: HashMap<usize, RegisteredItem>,
    order: Vec<usize>,
}

impl ItemRegistry {
    /// Insert or replace the cell at `index`.
    ///
    /// A replaced cell keeps its registration slot but starts from a clean render state.
    pub(super) fn insert(&mut self, index: usize, handle: ItemHandle) -> &mut RegisteredItem {
        use std::collections::hash_map::Entry;

        match self.items.entry(index) {
            Entry::Occupied(entry) => {
                let item = entry.into_mut();
                item.handle = handle;
                item.is_dragging = false;
                item.gap_offset = Vec2::ZERO;
                item
            }
            Entry::Vacant(entry) => {
                self.order.push(index);
                entry.insert(RegisteredItem {
                    index,
                    handle,
                    is_dragging: false,
                    gap_offset: Vec2::ZERO,
                })
            }
        }
    }

    /// Remove the cell at `index`, but only if it is still `handle`.
    ///
    /// Returns `false` for a stale unregister (the slot was already taken over by a newer cell).
    pub(super) fn remove_if_same(&mut self, index: usize, handle: &ItemHandle) -> bool {
        let is_same = self
            .items
            .get(&index)
            .is_some_and(|item| same_item(&item.handle, handle));
        if !is_same {
            return false;
        }
        self.items.remove(&index);
        self.order.retain(|&i| i != index);
        true
    }

    pub fn contains(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&RegisteredItem> {
        self.items.get(&index)
    }

    pub(super) fn get_mut(&mut self, index: usize) -> Option<&mut RegisteredItem> {
        self.items.get_mut(&index)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered items, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredItem> + '_ {
        self.order.iter().filter_map(|index| self.items.get(index))
    }

    /// Registered indices, in registration order.
    pub fn indices(&self) -> &[usize] {
        &self.order
    }

    /// Zero every gap offset. Returns the indices whose offset actually changed.
    pub(super) fn reset_all_gaps(&mut self) -> Vec<usize> {
        let mut changed = Vec::new();
        for &index in &self.order {
            if let Some(item) = self.items.get_mut(&index)
                && item.gap_offset != Vec2::ZERO
            {
                item.gap_offset = Vec2::ZERO;
                changed.push(index);
            }
        }
        changed
    }

    /// Clear every dragging flag. Returns the indices that were flagged.
    pub(super) fn clear_dragging(&mut self) -> Vec<usize> {
        let mut changed = Vec::new();
        for &index in &self.order {
            if let Some(item) = self.items.get_mut(&index)
                && item.is_dragging
            {
                item.is_dragging = false;
                changed.push(index);
            }
        }
        changed
    }
}
