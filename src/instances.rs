use alloc::{collections::btree_map::Entry, string::String};

use crate::{
    any::{self, Instance},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Instance table: module id to memoized instance.
///
/// Every registry keeps one for its live instances.
/// A caller-built table passed to [`crate::Registry::require_with`] replaces it for a single call,
/// which is how dependencies are faked.
#[derive(Clone, Default)]
pub struct Instances {
    pub(crate) map: any::Map,
}

impl Instances {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { map: any::Map::new() }
    }

    #[inline]
    pub fn insert<T: SendSafety + SyncSafety + 'static>(&mut self, id: impl Into<String>, value: T) -> Option<Instance> {
        self.insert_rc(id, RcThreadSafety::new(value))
    }

    #[inline]
    pub fn insert_rc<T: SendSafety + SyncSafety + 'static>(&mut self, id: impl Into<String>, value: RcThreadSafety<T>) -> Option<Instance> {
        self.map.insert(id.into(), value)
    }

    #[inline]
    pub fn insert_instance(&mut self, id: impl Into<String>, instance: Instance) -> Option<Instance> {
        self.map.insert(id.into(), instance)
    }

    /// Returns the instance for `id` if present and of type `T`
    #[must_use]
    pub fn get<T: SendSafety + SyncSafety + 'static>(&self, id: &str) -> Option<RcThreadSafety<T>> {
        self.map.get(id).and_then(|instance| instance.clone().downcast().ok())
    }

    #[inline]
    #[must_use]
    pub fn get_instance(&self, id: &str) -> Option<&Instance> {
        self.map.get(id)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Memoizes `instance` unless `id` already has one, returning whichever is stored
    pub(crate) fn get_or_insert(&mut self, id: &str, instance: Instance) -> Instance {
        match self.map.entry(id.into()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => entry.insert(instance).clone(),
        }
    }
}

impl<Id: Into<String>> FromIterator<(Id, Instance)> for Instances {
    fn from_iter<I: IntoIterator<Item = (Id, Instance)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|(id, instance)| (id.into(), instance)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instances;
    use crate::utils::thread_safety::RcThreadSafety;

    #[test]
    fn test_insert_get() {
        let mut instances = Instances::new();
        assert!(instances.insert("a", 42i32).is_none());
        assert!(instances.insert("b", "value").is_none());

        assert_eq!(*instances.get::<i32>("a").unwrap(), 42);
        assert_eq!(*instances.get::<&str>("b").unwrap(), "value");
        assert!(instances.get::<u8>("a").is_none());
        assert!(instances.get::<i32>("c").is_none());
        assert_eq!(instances.len(), 2);
    }

    #[test]
    fn test_get_or_insert_keeps_first() {
        let mut instances = Instances::new();
        let first = RcThreadSafety::new(1i32);
        instances.insert_rc("a", first.clone());

        let stored = instances.get_or_insert("a", RcThreadSafety::new(2i32));

        assert_eq!(*stored.downcast::<i32>().unwrap(), 1);
        assert!(RcThreadSafety::ptr_eq(&instances.get::<i32>("a").unwrap(), &first));
    }
}
