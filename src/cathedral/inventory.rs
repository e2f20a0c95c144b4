/// Inventory management for the Lamplighter's satchel
use serde::{Deserialize, Serialize};

use super::types::{Item, ItemId, INVENTORY_CAPACITY};

/// Ordered, fixed-capacity item list. Insertion order is kept; dropping an item
/// closes the gap so the remaining items keep their relative order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= INVENTORY_CAPACITY
    }

    pub fn free_slots(&self) -> usize {
        INVENTORY_CAPACITY.saturating_sub(self.items.len())
    }

    /// Add an item, handing it back when there is no room.
    pub fn add(&mut self, item: Item) -> Result<(), Item> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// First held item matching an upper-cased noun phrase.
    pub fn find(&self, phrase: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.answers_to(phrase))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Slot labels for the status panel, always `INVENTORY_CAPACITY` long.
    pub fn slot_labels(&self) -> Vec<String> {
        (0..INVENTORY_CAPACITY)
            .map(|i| match self.items.get(i) {
                Some(item) => item.name.clone(),
                None => "[empty]".to_string(),
            })
            .collect()
    }
}
