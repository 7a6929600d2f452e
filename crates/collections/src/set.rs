//! The set container: unique elements behind two interchangeable encodings.
//!
//! A set created for an integer-representable element starts in the packed
//! integer encoding and promotes to a hash table when it outgrows
//! `set_max_intset_entries` or receives a non-integer element. Promotion is
//! one-way; a set never demotes.
//!
//! Every operation accepts or produces [`Literal`] views so callers can
//! probe and move elements between encodings without allocating for the
//! integer case.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use tessera_core::{CollectionLimits, Literal, Value};

/// Physical encoding of a [`Set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetEncoding {
    /// Sorted packed integer array.
    IntSet,
    /// Hash table of value objects.
    HashTable,
}

/// An unordered collection of unique elements.
#[derive(Debug, Clone)]
pub struct Set {
    repr: Repr,
}

#[derive(Debug, Clone)]
enum Repr {
    Ints(crate::intset::IntSet),
    Hash(HashSet<Value>),
}

impl Set {
    /// Create an empty set in the packed integer encoding.
    pub fn new_intset() -> Self {
        Set {
            repr: Repr::Ints(crate::intset::IntSet::new()),
        }
    }

    /// Create an empty set in the hash encoding.
    pub fn new_hash() -> Self {
        Set {
            repr: Repr::Hash(HashSet::new()),
        }
    }

    /// Create an empty set that can hold `value`: packed when the value is
    /// integer-representable, hash otherwise.
    pub fn for_value(value: &Value) -> Self {
        if value.as_int().is_some() {
            Set::new_intset()
        } else {
            Set::new_hash()
        }
    }

    /// Current physical encoding.
    pub fn encoding(&self) -> SetEncoding {
        match &self.repr {
            Repr::Ints(_) => SetEncoding::IntSet,
            Repr::Hash(_) => SetEncoding::HashTable,
        }
    }

    /// Cardinality.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Ints(ints) => ints.len(),
            Repr::Hash(hash) => hash.len(),
        }
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an element. Returns `false` on duplicate.
    ///
    /// On the packed encoding, an integer insert that pushes cardinality
    /// past `set_max_intset_entries` promotes to the hash encoding after
    /// inserting; a non-integer element promotes first and then inserts.
    pub fn insert(&mut self, element: &Literal<'_>, limits: &CollectionLimits) -> bool {
        match &mut self.repr {
            Repr::Ints(ints) => {
                if let Some(v) = element.as_int() {
                    if !ints.insert(v) {
                        return false;
                    }
                    if ints.len() > limits.set_max_intset_entries {
                        let cardinality = ints.len();
                        self.convert_to_hash();
                        debug!(cardinality, "set promoted to hash encoding on size");
                    }
                    true
                } else {
                    self.convert_to_hash();
                    debug!("set promoted to hash encoding on non-integer element");
                    let inserted = match &mut self.repr {
                        Repr::Hash(hash) => hash.insert(element.to_value()),
                        Repr::Ints(_) => unreachable!("conversion left set packed"),
                    };
                    // The set held only integers, so a non-integer cannot collide.
                    assert!(inserted, "non-integer element collided during promotion");
                    true
                }
            }
            Repr::Hash(hash) => hash.insert(element.to_value()),
        }
    }

    /// Remove an element. Returns `false` if it was not a member.
    ///
    /// Only integer-representable elements can match in the packed
    /// encoding.
    pub fn remove(&mut self, element: &Literal<'_>) -> bool {
        match &mut self.repr {
            Repr::Ints(ints) => match element.as_int() {
                Some(v) => ints.remove(v),
                None => false,
            },
            Repr::Hash(hash) => hash.remove(&element.to_value()),
        }
    }

    /// Membership test.
    pub fn contains(&self, element: &Literal<'_>) -> bool {
        match &self.repr {
            Repr::Ints(ints) => match element.as_int() {
                Some(v) => ints.contains(v),
                None => false,
            },
            Repr::Hash(hash) => hash.contains(&element.to_value()),
        }
    }

    /// A uniformly random member, borrowed from the set.
    pub fn random_member(&self) -> Option<Literal<'_>> {
        if self.is_empty() {
            return None;
        }
        let pick = rand::thread_rng().gen_range(0..self.len());
        match &self.repr {
            Repr::Ints(ints) => ints.get(pick).map(Literal::Int),
            Repr::Hash(hash) => hash.iter().nth(pick).map(Literal::from_value),
        }
    }

    /// Iterate every element exactly once. Order is unspecified but stable
    /// while the set is not mutated; the borrow rules prevent mutation
    /// while the iterator is live.
    pub fn iter(&self) -> SetIter<'_> {
        match &self.repr {
            Repr::Ints(ints) => SetIter(IterRepr::Ints(Box::new(ints.iter()))),
            Repr::Hash(hash) => SetIter(IterRepr::Hash(hash.iter())),
        }
    }

    /// Promote the packed encoding to a hash table presized to the current
    /// cardinality.
    ///
    /// # Panics
    ///
    /// Panics if the set is already hash encoded; only packed→hash is a
    /// defined conversion.
    pub fn convert_to_hash(&mut self) {
        match &self.repr {
            Repr::Ints(ints) => {
                let mut hash = HashSet::with_capacity(ints.len());
                for v in ints.iter() {
                    hash.insert(Value::Int(v));
                }
                self.repr = Repr::Hash(hash);
            }
            Repr::Hash(_) => panic!("unsupported set conversion"),
        }
    }
}

impl Default for Set {
    fn default() -> Self {
        Set::new_intset()
    }
}

/// Borrowed iterator over a set's elements.
pub struct SetIter<'a>(IterRepr<'a>);

enum IterRepr<'a> {
    Ints(Box<dyn Iterator<Item = i64> + 'a>),
    Hash(std::collections::hash_set::Iter<'a, Value>),
}

impl<'a> Iterator for SetIter<'a> {
    type Item = Literal<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            IterRepr::Ints(ints) => ints.next().map(Literal::Int),
            IterRepr::Hash(hash) => hash.next().map(Literal::from_value),
        }
    }
}
