//! Client cart state as an explicit value, mirrored to the `cart_items` table
//! by the cart service. Quantities are always >= 1; mutations that would drop
//! an entry to zero delete it instead.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<Uuid, i32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the mapping from persisted rows. Non-positive quantities are
    /// dropped rather than stored.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Uuid, i32)>,
    {
        let items = entries
            .into_iter()
            .filter(|(_, quantity)| *quantity > 0)
            .collect();
        Self { items }
    }

    /// Increment by one, creating the entry at 1.
    pub fn add(&mut self, product_id: Uuid) {
        *self.items.entry(product_id).or_insert(0) += 1;
    }

    /// Decrement by one, deleting the entry when it would reach 0.
    pub fn remove(&mut self, product_id: Uuid) {
        if let Some(quantity) = self.items.get_mut(&product_id) {
            if *quantity > 1 {
                *quantity -= 1;
            } else {
                self.items.remove(&product_id);
            }
        }
    }

    /// Set an absolute quantity; anything <= 0 deletes the entry.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.items.remove(&product_id);
        } else {
            self.items.insert(product_id, quantity);
        }
    }

    pub fn quantity(&self, product_id: Uuid) -> i32 {
        self.items.get(&product_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Uuid, i32)> + '_ {
        self.items.iter().map(|(id, quantity)| (*id, *quantity))
    }

    pub fn total_items(&self) -> i64 {
        self.items.values().map(|quantity| *quantity as i64).sum()
    }

    /// Total against the current catalog snapshot. Prices are not frozen while
    /// shopping; entries whose product is missing from the snapshot count as 0.
    pub fn total_price(&self, prices: &HashMap<Uuid, i64>) -> i64 {
        self.items
            .iter()
            .map(|(id, quantity)| prices.get(id).copied().unwrap_or(0) * *quantity as i64)
            .sum()
    }
}
