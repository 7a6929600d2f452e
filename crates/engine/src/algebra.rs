//! Multi-key set algebra: intersection, union, difference.
//!
//! All three walk source sets through literal views, so probing across
//! mixed encodings allocates only when an element has to be materialised
//! for the reply or the accumulator.
//!
//! The destination install always happens after source iteration has
//! finished (the accumulator is a separate owned set while the sources are
//! borrowed), so storing into a key that is also a source reads the
//! pre-operation contents.

use tessera_core::{Error, Result};

use tessera_collections::Set;

use crate::keyspace::Object;
use crate::reply::Reply;
use crate::server::Server;

/// Which accumulate-style operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetOp {
    /// Add every element of every source.
    Union,
    /// Seed with the first source, subtract the rest.
    Diff,
}

/// `SINTER` / `SINTERSTORE`
///
/// Sources are sorted by cardinality and the smallest is iterated, probing
/// the rest in ascending size order and bailing on the first miss. Any
/// missing source short-circuits to an empty result.
pub(crate) fn sinter(
    srv: &mut Server,
    keys: &[String],
    destination: Option<&str>,
) -> Result<Reply> {
    // A missing source empties the whole intersection; sources before it
    // must still be sets. Keys after the first missing one are not examined.
    for key in keys {
        match srv.db.lookup(key) {
            None => return Ok(empty_intersection(srv, destination)),
            Some(Object::Set(_)) => {}
            Some(_) => return Err(Error::WrongType),
        }
    }

    let mut sources: Vec<&Set> = Vec::with_capacity(keys.len());
    for key in keys {
        match srv.db.lookup(key) {
            Some(Object::Set(set)) => sources.push(set),
            _ => unreachable!("sources validated above"),
        }
    }
    sources.sort_by_key(|set| set.len());

    let mut accumulator = destination.map(|_| Set::new_intset());
    let mut items: Vec<Reply> = Vec::new();

    if let Some((smallest, rest)) = sources.split_first() {
        for element in smallest.iter() {
            if !rest.iter().all(|set| set.contains(&element)) {
                continue;
            }
            match &mut accumulator {
                Some(acc) => {
                    acc.insert(&element, &srv.limits);
                }
                None => items.push(Reply::Bulk(element.to_value())),
            }
        }
    }

    match (destination, accumulator) {
        (Some(dst), Some(result)) => Ok(install(srv, dst, result)),
        _ => Ok(Reply::Array(items)),
    }
}

/// `SUNION` / `SUNIONSTORE` / `SDIFF` / `SDIFFSTORE`
///
/// Accumulates into a fresh set (compact encoding, promoting as needed).
/// Union treats missing sources as empty; difference seeds from the first
/// source and bails as soon as the accumulator empties.
pub(crate) fn sunion_diff(
    srv: &mut Server,
    keys: &[String],
    destination: Option<&str>,
    op: SetOp,
) -> Result<Reply> {
    let mut sources: Vec<Option<&Set>> = Vec::with_capacity(keys.len());
    for key in keys {
        match srv.db.lookup(key) {
            None => sources.push(None),
            Some(Object::Set(set)) => sources.push(Some(set)),
            Some(_) => return Err(Error::WrongType),
        }
    }

    let mut accumulator = Set::new_intset();
    for (position, source) in sources.iter().enumerate() {
        if op == SetOp::Diff && position == 0 && source.is_none() {
            // Nothing to subtract from.
            break;
        }
        let Some(set) = source else { continue };

        for element in set.iter() {
            if op == SetOp::Union || position == 0 {
                accumulator.insert(&element, &srv.limits);
            } else {
                accumulator.remove(&element);
            }
        }
        if op == SetOp::Diff && accumulator.is_empty() {
            break;
        }
    }

    match destination {
        Some(dst) => Ok(install(srv, dst, accumulator)),
        None => {
            let items = accumulator
                .iter()
                .map(|element| Reply::Bulk(element.to_value()))
                .collect();
            Ok(Reply::Array(items))
        }
    }
}

/// Destination discipline shared by every store variant: replace whatever
/// the key held, but never create the key for an empty result.
fn install(srv: &mut Server, destination: &str, result: Set) -> Reply {
    srv.db.delete(destination);
    let cardinality = result.len();
    if cardinality > 0 {
        srv.db.add(destination.to_string(), Object::Set(result));
    }
    srv.db.signal_modified(destination);
    srv.dirty += 1;
    Reply::Int(cardinality as i64)
}

fn empty_intersection(srv: &mut Server, destination: Option<&str>) -> Reply {
    match destination {
        Some(dst) => {
            if srv.db.delete(dst) {
                srv.db.signal_modified(dst);
                srv.dirty += 1;
            }
            Reply::Int(0)
        }
        None => Reply::Array(Vec::new()),
    }
}
