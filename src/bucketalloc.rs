// Copyright 2025 Lars Brubaker
// License: MIT
//
// Slot arena with a free list. Quad-edge records live here and are addressed by
// stable u32 slot numbers; deleting an edge returns its slot to the free list
// and the next allocation reuses it. Growth reports allocation failure through
// `TessError::OutOfMemory` instead of aborting the process.

use std::ops::{Index, IndexMut};

use crate::error::Result;

pub struct BucketAlloc<T> {
    items: Vec<Option<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> BucketAlloc<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store `value`, returning its slot.
    pub fn alloc(&mut self, value: T) -> Result<u32> {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.items[idx as usize] = Some(value);
                idx
            }
            None => {
                self.items.try_reserve(1)?;
                // Room to free every slot without allocating.
                self.free_list.try_reserve(self.items.len() + 1 - self.free_list.len())?;
                let idx = self.items.len() as u32;
                self.items.push(Some(value));
                idx
            }
        };
        self.live += 1;
        Ok(idx)
    }

    /// Release a slot. Returns the stored value, or `None` if the slot was
    /// already free or never allocated.
    pub fn free(&mut self, idx: u32) -> Option<T> {
        let value = self.items.get_mut(idx as usize)?.take()?;
        self.free_list.push(idx);
        self.live -= 1;
        Some(value)
    }

    #[inline]
    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.items.get_mut(idx as usize)?.as_mut()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| item.as_ref().map(|v| (i as u32, v)))
    }

    /// Mutable access to every occupied slot, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> + '_ {
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(|(i, item)| item.as_mut().map(|v| (i as u32, v)))
    }

    /// Occupied slot numbers in slot order.
    pub fn slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|(i, _)| i)
    }
}

impl<T> Default for BucketAlloc<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Indexing a free slot is an invariant violation, like indexing a Vec out of
// bounds.
impl<T> Index<u32> for BucketAlloc<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: u32) -> &T {
        match self.get(idx) {
            Some(v) => v,
            None => panic!("arena slot {} is not allocated", idx),
        }
    }
}

impl<T> IndexMut<u32> for BucketAlloc<T> {
    #[inline]
    fn index_mut(&mut self, idx: u32) -> &mut T {
        match self.get_mut(idx) {
            Some(v) => v,
            None => panic!("arena slot {} is not allocated", idx),
        }
    }
}
