use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::error::StoreError;

pub type Result<T, K> = std::result::Result<T, StoreError<K>>;

/// The store contract consumed by the access layer
pub trait Storer<K: Debug, V>: Send + Sync {
    /// Insert the key, or overwrite its current value
    fn put(&self, key: K, value: V);

    fn get(&self, key: &K) -> Result<V, K>;

    /// Overwrite the value of an existing key
    fn update(&self, key: &K, value: V) -> Result<(), K>;

    /// Remove the key, returning the value it held
    fn delete(&self, key: &K) -> Result<V, K>;

    fn exists(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory key-value store
///
/// Every operation takes the lock once and releases it before returning.
/// Reads share the lock; writes hold it exclusively, including the presence
/// check that `update` and `delete` perform before mutating.
pub struct Store<K, V> {
    data: RwLock<HashMap<K, V>>,
}

impl<K, V> Store<K, V> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    // A writer only panics inside a single HashMap call, which never leaves
    // the map half-written, so a poisoned guard is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.data.read().unwrap_or_else(|poisoned| {
            warn!("Store lock poisoned, recovering read guard");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.data.write().unwrap_or_else(|poisoned| {
            warn!("Store lock poisoned, recovering write guard");
            poisoned.into_inner()
        })
    }
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash + Debug,
{
    /// Set a key to the given value, replacing any previous value
    pub fn put(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    /// Get a copy of the value for a key
    pub fn get<Q>(&self, key: &Q) -> Result<V, K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        V: Clone,
    {
        self.read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    /// Overwrite the value of a key only if it is already present
    pub fn update<Q>(&self, key: &Q, value: V) -> Result<(), K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let mut data = self.write();
        match data.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_owned())),
        }
    }

    /// Remove a key and return the value it held
    pub fn delete<Q>(&self, key: &Q) -> Result<V, K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.write()
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    pub fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().contains_key(key)
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<K, V> Default for Store<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Storer<K, V> for Store<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V) {
        Store::put(self, key, value)
    }

    fn get(&self, key: &K) -> Result<V, K> {
        Store::get(self, key)
    }

    fn update(&self, key: &K, value: V) -> Result<(), K> {
        Store::update(self, key, value)
    }

    fn delete(&self, key: &K) -> Result<V, K> {
        Store::delete(self, key)
    }

    fn exists(&self, key: &K) -> bool {
        Store::exists(self, key)
    }

    fn len(&self) -> usize {
        Store::len(self)
    }
}
