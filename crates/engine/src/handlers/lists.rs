//! List command handlers.
//!
//! Every end-push consults the blocking rendezvous first: when a parked
//! client can take the element, it is handed over directly and never lands
//! in the list. The `*PUSHX` variants skip that check: a key with waiters
//! is never present in the keyspace (pushes to it are delivered instead of
//! stored), so a push that requires an existing key cannot race a waiter.

use tessera_core::{Error, Literal, Result, Value};

use tessera_collections::{End, Side};

use crate::blocking;
use crate::keyspace::Object;
use crate::reply::Reply;
use crate::server::Server;

/// `LPUSH` / `RPUSH`
pub(crate) fn push(srv: &mut Server, key: &str, value: &[u8], end: End) -> Result<Reply> {
    let value = Value::encoded(value);
    let existed = match srv.db.lookup(key) {
        None => false,
        Some(Object::List(_)) => true,
        Some(_) => return Err(Error::WrongType),
    };

    if blocking::try_deliver(srv, key, &value)? {
        if existed {
            srv.db.signal_modified(key);
        }
        return Ok(Reply::Int(1));
    }

    let list = srv.db.list_or_create_mut(key)?;
    list.push(value, end, &srv.limits);
    let len = list.len();
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Int(len as i64))
}

/// `LPUSHX` / `RPUSHX`
pub(crate) fn pushx(srv: &mut Server, key: &str, value: &[u8], end: End) -> Result<Reply> {
    let value = Value::encoded(value);
    let Some(list) = srv.db.list_mut(key)? else {
        return Ok(Reply::Int(0));
    };
    list.push(value, end, &srv.limits);
    let len = list.len();
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Int(len as i64))
}

/// `LINSERT key BEFORE|AFTER pivot value`
pub(crate) fn linsert(
    srv: &mut Server,
    key: &str,
    side: Side,
    pivot: &[u8],
    value: &[u8],
) -> Result<Reply> {
    let pivot = Value::encoded(pivot);
    let value = Value::encoded(value);
    let len = {
        let Some(list) = srv.db.list_mut(key)? else {
            return Ok(Reply::Int(0));
        };
        if !list.insert_relative(&Literal::from_value(&pivot), value, side, &srv.limits) {
            // Pivot not found: distinct from the missing-key 0.
            return Ok(Reply::Int(-1));
        }
        list.len()
    };
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Int(len as i64))
}

/// `LLEN key`
pub(crate) fn llen(srv: &mut Server, key: &str) -> Result<Reply> {
    let Some(list) = srv.db.list(key)? else {
        return Ok(Reply::Int(0));
    };
    Ok(Reply::Int(list.len() as i64))
}

/// `LINDEX key index`
pub(crate) fn lindex(srv: &mut Server, key: &str, index: i64) -> Result<Reply> {
    let Some(list) = srv.db.list(key)? else {
        return Ok(Reply::Nil);
    };
    match list.index(index) {
        Some(value) => Ok(Reply::Bulk(value)),
        None => Ok(Reply::Nil),
    }
}

/// `LSET key index value`
pub(crate) fn lset(srv: &mut Server, key: &str, index: i64, value: &[u8]) -> Result<Reply> {
    let value = Value::encoded(value);
    let Some(list) = srv.db.list_mut(key)? else {
        return Err(Error::NoSuchKey);
    };
    list.set(index, value, &srv.limits)?;
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Ok)
}

/// `LPOP` / `RPOP`
pub(crate) fn pop(srv: &mut Server, key: &str, end: End) -> Result<Reply> {
    let (value, emptied) = {
        let Some(list) = srv.db.list_mut(key)? else {
            return Ok(Reply::Nil);
        };
        match list.pop(end) {
            None => return Ok(Reply::Nil),
            Some(value) => (value, list.is_empty()),
        }
    };
    if emptied {
        srv.db.delete(key);
    }
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Bulk(value))
}

/// `LRANGE key start stop`
pub(crate) fn lrange(srv: &mut Server, key: &str, start: i64, stop: i64) -> Result<Reply> {
    let Some(list) = srv.db.list(key)? else {
        return Ok(Reply::Array(Vec::new()));
    };
    let items = list
        .range(start, stop)
        .into_iter()
        .map(Reply::Bulk)
        .collect();
    Ok(Reply::Array(items))
}

/// `LTRIM key start stop`
pub(crate) fn ltrim(srv: &mut Server, key: &str, start: i64, stop: i64) -> Result<Reply> {
    let emptied = {
        let Some(list) = srv.db.list_mut(key)? else {
            return Ok(Reply::Ok);
        };
        list.trim(start, stop);
        list.is_empty()
    };
    if emptied {
        srv.db.delete(key);
    }
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Ok)
}

/// `LREM key count value`
pub(crate) fn lrem(srv: &mut Server, key: &str, count: i64, value: &[u8]) -> Result<Reply> {
    let value = Value::encoded(value);
    let (removed, emptied) = {
        let Some(list) = srv.db.list_mut(key)? else {
            return Ok(Reply::Int(0));
        };
        let removed = list.remove(count, &Literal::from_value(&value));
        (removed, list.is_empty())
    };
    if emptied {
        srv.db.delete(key);
    }
    if removed > 0 {
        srv.db.signal_modified(key);
        srv.dirty += removed as u64;
    }
    Ok(Reply::Int(removed as i64))
}

/// `RPOPLPUSH source destination`
pub(crate) fn rpoplpush(srv: &mut Server, source: &str, destination: &str) -> Result<Reply> {
    {
        let Some(list) = srv.db.list(source)? else {
            return Ok(Reply::Nil);
        };
        if list.is_empty() {
            return Ok(Reply::Nil);
        }
    }
    // Check the destination's type before popping anything.
    srv.db.list(destination)?;

    let value = {
        let Some(list) = srv.db.list_mut(source)? else {
            return Ok(Reply::Nil);
        };
        match list.pop(End::Tail) {
            Some(value) => value,
            None => return Ok(Reply::Nil),
        }
    };

    push_to_destination(srv, destination, &value)?;

    // With source == destination the push above refilled the list; re-check
    // before deleting.
    let emptied = matches!(srv.db.list(source), Ok(Some(list)) if list.is_empty());
    if emptied {
        srv.db.delete(source);
    }
    srv.db.signal_modified(source);
    srv.dirty += 1;
    Ok(Reply::Bulk(value))
}

/// Land a popped element on `destination`: hand it to a waiter parked on
/// that key when one can take it, otherwise push it onto the head, creating
/// the list if needed.
///
/// Shared by `RPOPLPUSH` and by rendezvous delivery for the blocking
/// variant, which is what makes chained hand-offs work.
pub(crate) fn push_to_destination(
    srv: &mut Server,
    destination: &str,
    value: &Value,
) -> Result<()> {
    if blocking::try_deliver(srv, destination, value)? {
        return Ok(());
    }
    let list = srv.db.list_or_create_mut(destination)?;
    list.push(value.clone(), End::Head, &srv.limits);
    srv.db.signal_modified(destination);
    srv.dirty += 1;
    Ok(())
}
