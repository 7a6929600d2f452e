//! The keyspace: a key→object map with notify and delete hooks.
//!
//! This is the only shared mutable state commands see. Alongside the data
//! map it carries the per-database blocking table (key → ordered waiter
//! list) used by the rendezvous layer; the two live together because a
//! database owns both its data and the clients parked against it.
//!
//! Typed accessors (`set_mut`, `list_or_create_mut`, …) centralise the
//! wrong-type checks so command handlers never match on [`Object`]
//! themselves.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use tessera_collections::{List, Set};
use tessera_core::{Error, Result, Value};

use crate::client::ClientId;

/// A value stored at a key.
#[derive(Debug, Clone)]
pub enum Object {
    /// A set container.
    Set(Set),
    /// A list container.
    List(List),
    /// A plain string value.
    Str(Value),
}

impl Object {
    /// Human-readable type name, used in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Set(_) => "set",
            Object::List(_) => "list",
            Object::Str(_) => "string",
        }
    }

    /// Borrow the contained set, if this is one.
    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Object::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the contained list, if this is one.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }
}

/// A single database: the key→object map plus its blocking table.
#[derive(Debug, Default)]
pub struct Db {
    map: HashMap<String, Object>,
    /// Per-key FIFO lists of clients blocked on that key.
    pub(crate) blocking_keys: HashMap<String, VecDeque<ClientId>>,
    modified: u64,
}

impl Db {
    /// Create an empty database.
    pub fn new() -> Self {
        Db::default()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the keyspace holds no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Whether `key` exists.
    pub fn exists(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Look up the object at `key`.
    pub fn lookup(&self, key: &str) -> Option<&Object> {
        self.map.get(key)
    }

    /// Look up the object at `key` for mutation.
    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.map.get_mut(key)
    }

    /// Install `object` at `key`. The key must not already exist; callers
    /// delete first when replacing.
    pub fn add(&mut self, key: String, object: Object) {
        let previous = self.map.insert(key, object);
        debug_assert!(previous.is_none(), "add over an existing key");
    }

    /// Delete `key`. Returns whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    /// Record that `key` was touched by a mutation.
    ///
    /// External collaborators (watch machinery, caches) hang off this hook;
    /// inside the engine it is a trace event and a monotonic counter.
    pub fn signal_modified(&mut self, key: &str) {
        self.modified += 1;
        trace!(key, "key modified");
    }

    /// How many times `signal_modified` has fired.
    pub fn modified_events(&self) -> u64 {
        self.modified
    }

    // ========== Typed accessors ==========

    /// The set at `key`, or `None` when missing.
    pub fn set(&self, key: &str) -> Result<Option<&Set>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Object::Set(s)) => Ok(Some(s)),
            Some(_) => Err(Error::WrongType),
        }
    }

    /// The set at `key` for mutation, or `None` when missing.
    pub fn set_mut(&mut self, key: &str) -> Result<Option<&mut Set>> {
        match self.map.get_mut(key) {
            None => Ok(None),
            Some(Object::Set(s)) => Ok(Some(s)),
            Some(_) => Err(Error::WrongType),
        }
    }

    /// The list at `key`, or `None` when missing.
    pub fn list(&self, key: &str) -> Result<Option<&List>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Object::List(l)) => Ok(Some(l)),
            Some(_) => Err(Error::WrongType),
        }
    }

    /// The list at `key` for mutation, or `None` when missing.
    pub fn list_mut(&mut self, key: &str) -> Result<Option<&mut List>> {
        match self.map.get_mut(key) {
            None => Ok(None),
            Some(Object::List(l)) => Ok(Some(l)),
            Some(_) => Err(Error::WrongType),
        }
    }

    /// The set at `key`, creating an empty one suited to `first` when the
    /// key is missing.
    pub fn set_or_create_mut(&mut self, key: &str, first: &Value) -> Result<&mut Set> {
        if !self.map.contains_key(key) {
            self.map
                .insert(key.to_string(), Object::Set(Set::for_value(first)));
        }
        match self.map.get_mut(key) {
            Some(Object::Set(s)) => Ok(s),
            Some(_) => Err(Error::WrongType),
            None => unreachable!("key inserted above"),
        }
    }

    /// The list at `key`, creating an empty packed list when the key is
    /// missing.
    pub fn list_or_create_mut(&mut self, key: &str) -> Result<&mut List> {
        if !self.map.contains_key(key) {
            self.map.insert(key.to_string(), Object::List(List::new()));
        }
        match self.map.get_mut(key) {
            Some(Object::List(l)) => Ok(l),
            Some(_) => Err(Error::WrongType),
            None => unreachable!("key inserted above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_lookup_delete() {
        let mut db = Db::new();
        assert!(!db.exists("k"));
        db.add("k".into(), Object::Str(Value::encoded(b"v")));
        assert!(db.exists("k"));
        assert!(db.delete("k"));
        assert!(!db.delete("k"));
    }

    #[test]
    fn test_typed_accessors_enforce_types() {
        let mut db = Db::new();
        db.add("s".into(), Object::Str(Value::encoded(b"v")));
        assert!(matches!(db.set("s"), Err(Error::WrongType)));
        assert!(matches!(db.list_mut("s"), Err(Error::WrongType)));
        assert!(db.set("missing").unwrap().is_none());
    }

    #[test]
    fn test_or_create_accessors() {
        let mut db = Db::new();
        db.list_or_create_mut("l").unwrap();
        assert!(matches!(db.lookup("l"), Some(Object::List(_))));

        let first = Value::encoded(b"9");
        db.set_or_create_mut("i", &first).unwrap();
        assert!(matches!(db.lookup("i"), Some(Object::Set(_))));

        // Creating over the wrong type fails without replacing it.
        assert_eq!(db.list_or_create_mut("i").unwrap_err(), Error::WrongType);
        assert!(matches!(db.lookup("i"), Some(Object::Set(_))));
    }

    #[test]
    fn test_signal_modified_counts() {
        let mut db = Db::new();
        assert_eq!(db.modified_events(), 0);
        db.signal_modified("k");
        db.signal_modified("k");
        assert_eq!(db.modified_events(), 2);
    }
}
