// 🗃️ Keyed Repository - unique-key store shared by every exercise
//
// Identity is the key, everything else is a value that may change.
// The repository owns its entities: `add` moves them in, `remove` hands
// them back. Keys are unique by construction, never assumed.
//
// Not synchronized. Wrap in a Mutex if more than one thread needs it.

use crate::error::{RecordError, RecordResult};
use indexmap::IndexMap;
use std::fmt::Display;
use std::hash::Hash;
use tracing::{debug, warn};

// ============================================================================
// CAPABILITY TRAITS
// ============================================================================

/// Anything with a stable, readable identifier
pub trait Entity {
    type Key: Eq + Hash + Clone + Display;

    fn id(&self) -> Self::Key;
}

/// Entities carrying a mutable quantity (stock level, balance)
///
/// `Quantity::default()` is the zero below which updates are rejected.
pub trait Stocked {
    type Quantity: Copy + PartialOrd + Default + Display;

    fn quantity(&self) -> Self::Quantity;
    fn set_quantity(&mut self, quantity: Self::Quantity);
}

// ============================================================================
// KEYED REPOSITORY
// ============================================================================

/// In-memory store keyed by entity id
///
/// Invariant: every key equals `id()` of the entity stored under it.
/// Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct KeyedRepository<K, V> {
    items: IndexMap<K, V>,
}

impl<K, V> KeyedRepository<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Entity<Key = K>,
{
    pub fn new() -> Self {
        KeyedRepository {
            items: IndexMap::new(),
        }
    }

    /// Insert a new entity; fails if its key is already stored
    pub fn add(&mut self, item: V) -> RecordResult<()> {
        let key = item.id();
        if self.items.contains_key(&key) {
            warn!(key = %key, "rejected duplicate key");
            return Err(RecordError::duplicate(&key));
        }
        debug!(key = %key, "added entity");
        self.items.insert(key, item);
        Ok(())
    }

    pub fn get_by_id(&self, key: &K) -> RecordResult<&V> {
        self.items.get(key).ok_or_else(|| RecordError::not_found(key))
    }

    /// Delete an entity and return it to the caller
    pub fn remove(&mut self, key: &K) -> RecordResult<V> {
        match self.items.shift_remove(key) {
            Some(item) => {
                debug!(key = %key, "removed entity");
                Ok(item)
            }
            None => {
                warn!(key = %key, "remove on missing key");
                Err(RecordError::not_found(key))
            }
        }
    }

    /// First entity matching `predicate`, in insertion order
    pub fn find<P>(&self, predicate: P) -> RecordResult<&V>
    where
        P: Fn(&V) -> bool,
    {
        self.items
            .values()
            .find(|item| predicate(item))
            .ok_or_else(|| RecordError::not_found("matching predicate"))
    }

    /// Remove every entity matching `predicate` and return them
    pub fn remove_where<P>(&mut self, predicate: P) -> Vec<V>
    where
        P: Fn(&V) -> bool,
    {
        let keys: Vec<K> = self
            .items
            .iter()
            .filter(|(_, item)| predicate(item))
            .map(|(key, _)| key.clone())
            .collect();

        keys.iter()
            .filter_map(|key| self.items.shift_remove(key))
            .collect()
    }

    /// Swap the whole contents for `items`
    ///
    /// All-or-nothing: a duplicate key inside `items` leaves the
    /// repository exactly as it was.
    pub fn replace_all<I>(&mut self, items: I) -> RecordResult<usize>
    where
        I: IntoIterator<Item = V>,
    {
        let mut next = IndexMap::new();
        for item in items {
            let key = item.id();
            if next.contains_key(&key) {
                warn!(key = %key, "duplicate key in replacement set");
                return Err(RecordError::duplicate(&key));
            }
            next.insert(key, item);
        }
        self.items = next;
        Ok(self.items.len())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.items.values()
    }
}

impl<K, V> KeyedRepository<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Entity<Key = K> + Clone,
{
    /// Snapshot of all entities; changing it does not touch the repository
    pub fn get_all(&self) -> Vec<V> {
        self.items.values().cloned().collect()
    }

    /// Change a stored entity through `update_fn`
    ///
    /// The entity is restored if `update_fn` fails or changes its id, so
    /// the stored key always matches the entity's identity.
    pub fn update<F, R>(&mut self, key: &K, update_fn: F) -> RecordResult<R>
    where
        F: FnOnce(&mut V) -> RecordResult<R>,
    {
        let item = self
            .items
            .get_mut(key)
            .ok_or_else(|| RecordError::not_found(key))?;
        let previous = item.clone();

        let outcome = update_fn(&mut *item).and_then(|value| {
            if item.id() == *key {
                Ok(value)
            } else {
                warn!(key = %key, new_key = %item.id(), "rejected identity change");
                Err(RecordError::invalid(
                    "id",
                    format!("Identity of {} cannot change.", key),
                ))
            }
        });

        if outcome.is_err() {
            *item = previous;
        } else {
            debug!(key = %key, "updated entity");
        }
        outcome
    }
}

impl<K, V> KeyedRepository<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Entity<Key = K> + Stocked,
{
    /// Set the stored quantity in place
    ///
    /// The value is checked before the key: a negative quantity on a
    /// missing key reports `InvalidValue`.
    pub fn update_quantity(&mut self, key: &K, quantity: V::Quantity) -> RecordResult<()> {
        if quantity < V::Quantity::default() {
            warn!(key = %key, quantity = %quantity, "rejected negative quantity");
            return Err(RecordError::invalid("quantity", "Quantity cannot be negative."));
        }

        let item = self
            .items
            .get_mut(key)
            .ok_or_else(|| RecordError::not_found(key))?;
        item.set_quantity(quantity);
        debug!(key = %key, quantity = %quantity, "updated quantity");
        Ok(())
    }
}

impl<K, V> Default for KeyedRepository<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Entity<Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i32,
        name: String,
        qty: i32,
    }

    impl Item {
        fn new(id: i32, name: &str, qty: i32) -> Self {
            Item {
                id,
                name: name.to_string(),
                qty,
            }
        }
    }

    impl Entity for Item {
        type Key = i32;

        fn id(&self) -> i32 {
            self.id
        }
    }

    impl Stocked for Item {
        type Quantity = i32;

        fn quantity(&self) -> i32 {
            self.qty
        }

        fn set_quantity(&mut self, quantity: i32) {
            self.qty = quantity;
        }
    }

    fn laptop_and_mouse() -> KeyedRepository<i32, Item> {
        let mut repo = KeyedRepository::new();
        repo.add(Item::new(1, "Laptop", 10)).unwrap();
        repo.add(Item::new(2, "Mouse", 15)).unwrap();
        repo
    }

    #[test]
    fn test_add_then_get_returns_equal_entity() {
        let mut repo = KeyedRepository::new();
        let item = Item::new(7, "Cable", 3);
        repo.add(item.clone()).unwrap();

        assert_eq!(repo.get_by_id(&7).unwrap(), &item);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_duplicate_add_leaves_repository_unchanged() {
        let mut repo = KeyedRepository::new();
        repo.add(Item::new(101, "Milk", 20)).unwrap();

        let result = repo.add(Item::new(101, "Bread", 30));

        assert_eq!(result, Err(RecordError::duplicate(101)));
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get_by_id(&101).unwrap().name, "Milk");
        assert_eq!(repo.get_by_id(&101).unwrap().qty, 20);
    }

    #[test]
    fn test_get_missing_fails() {
        let repo = laptop_and_mouse();
        assert!(matches!(
            repo.get_by_id(&42),
            Err(RecordError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_missing_keeps_size() {
        let mut repo = laptop_and_mouse();

        let result = repo.remove(&999);

        assert_eq!(result, Err(RecordError::not_found(999)));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_remove_returns_ownership() {
        let mut repo = laptop_and_mouse();
        let mouse = repo.remove(&2).unwrap();

        assert_eq!(mouse.name, "Mouse");
        assert!(!repo.contains(&2));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut repo = laptop_and_mouse();

        let result = repo.update_quantity(&1, -5);

        assert!(matches!(result, Err(RecordError::InvalidValue { .. })));
        assert_eq!(repo.get_by_id(&1).unwrap().quantity(), 10);
    }

    #[test]
    fn test_negative_quantity_checked_before_key() {
        let mut repo = laptop_and_mouse();
        assert!(matches!(
            repo.update_quantity(&999, -1),
            Err(RecordError::InvalidValue { .. })
        ));
        assert!(matches!(
            repo.update_quantity(&999, 1),
            Err(RecordError::NotFound { .. })
        ));
    }

    #[test]
    fn test_zero_quantity_allowed() {
        let mut repo = laptop_and_mouse();
        repo.update_quantity(&2, 0).unwrap();
        assert_eq!(repo.get_by_id(&2).unwrap().quantity(), 0);
    }

    #[test]
    fn test_update_changes_values_in_place() {
        let mut repo = laptop_and_mouse();

        let name = repo
            .update(&2, |item| {
                item.name = "Wireless Mouse".to_string();
                Ok(item.name.clone())
            })
            .unwrap();

        assert_eq!(name, "Wireless Mouse");
        assert_eq!(repo.get_by_id(&2).unwrap().name, "Wireless Mouse");
    }

    #[test]
    fn test_update_cannot_change_identity() {
        let mut repo = laptop_and_mouse();

        let result = repo.update(&1, |item| {
            item.id = 2;
            item.qty = 99;
            Ok(())
        });

        assert!(matches!(result, Err(RecordError::InvalidValue { .. })));
        let laptop = repo.get_by_id(&1).unwrap();
        assert_eq!(laptop.id, 1);
        assert_eq!(laptop.qty, 10);
        let ids: Vec<i32> = repo.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_update_rolls_back_on_failure() {
        let mut repo = laptop_and_mouse();

        let result: RecordResult<()> = repo.update(&1, |item| {
            item.qty = 0;
            Err(RecordError::invalid("qty", "refused"))
        });

        assert!(result.is_err());
        assert_eq!(repo.get_by_id(&1).unwrap().qty, 10);
        assert!(matches!(
            repo.update(&42, |_| Ok(())),
            Err(RecordError::NotFound { .. })
        ));
    }

    #[test]
    fn test_get_all_is_a_snapshot() {
        let repo = laptop_and_mouse();

        let mut snapshot = repo.get_all();
        snapshot[0].qty = 999;
        snapshot.clear();

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.get_by_id(&1).unwrap().qty, 10);
    }

    #[test]
    fn test_laptop_mouse_scenario() {
        let mut repo = laptop_and_mouse();
        assert_eq!(repo.get_all().len(), 2);

        repo.update_quantity(&1, 20).unwrap();
        assert_eq!(repo.get_by_id(&1).unwrap().qty, 20);

        repo.remove(&2).unwrap();
        let all = repo.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 1);
    }

    #[test]
    fn test_count_tracks_adds_minus_removes() {
        let mut repo = KeyedRepository::new();
        for id in 0..10 {
            repo.add(Item::new(id, "x", id)).unwrap();
        }
        // a failed add and a failed remove count for nothing
        assert!(repo.add(Item::new(3, "dup", 0)).is_err());
        assert!(repo.remove(&50).is_err());
        for id in 0..4 {
            repo.remove(&id).unwrap();
        }
        assert_eq!(repo.get_all().len(), 6);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut repo = KeyedRepository::new();
        for id in [5, 1, 3] {
            repo.add(Item::new(id, "x", 1)).unwrap();
        }
        repo.remove(&1).unwrap();
        repo.add(Item::new(2, "y", 1)).unwrap();

        let ids: Vec<i32> = repo.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![5, 3, 2]);
    }

    #[test]
    fn test_find_and_remove_where() {
        let mut repo = laptop_and_mouse();
        repo.add(Item::new(3, "Mousepad", 4)).unwrap();

        assert_eq!(repo.find(|i| i.name == "Laptop").unwrap().id, 1);
        assert!(repo.find(|i| i.name == "Tablet").is_err());

        let removed = repo.remove_where(|i| i.name.starts_with("Mouse"));
        assert_eq!(removed.len(), 2);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_replace_all_is_all_or_nothing() {
        let mut repo = laptop_and_mouse();

        let bad = vec![Item::new(8, "a", 1), Item::new(8, "b", 2)];
        assert_eq!(repo.replace_all(bad), Err(RecordError::duplicate(8)));
        assert_eq!(repo.len(), 2);
        assert!(repo.contains(&1));

        let good = vec![Item::new(8, "a", 1), Item::new(9, "b", 2)];
        assert_eq!(repo.replace_all(good), Ok(2));
        assert!(!repo.contains(&1));
        assert!(repo.contains(&9));
    }

    #[test]
    fn test_string_keys() {
        #[derive(Debug, Clone)]
        struct Named(String);

        impl Entity for Named {
            type Key = String;

            fn id(&self) -> String {
                self.0.clone()
            }
        }

        let mut repo = KeyedRepository::new();
        repo.add(Named("SB1".to_string())).unwrap();
        assert!(repo.add(Named("SB1".to_string())).is_err());
        assert!(repo.get_by_id(&"SB1".to_string()).is_ok());
    }
}
