//! Set command handlers.
//!
//! Semantics worth calling out:
//!
//! - every mutation that observes cardinality 0 deletes the key
//! - `SMOVE` with identical source and destination keys is a no-op that
//!   replies 1 after the type checks, without probing the member
//! - `SPOP` journals itself as an `SREM` of the popped member, so
//!   replication sees a deterministic command

use tessera_core::{Literal, Result, Value};

use crate::command::Command;
use crate::reply::Reply;
use crate::server::Server;

/// `SADD key member`
pub(crate) fn sadd(srv: &mut Server, key: &str, member: &[u8]) -> Result<Reply> {
    let member = Value::encoded(member);
    let set = srv.db.set_or_create_mut(key, &member)?;
    if set.insert(&Literal::from_value(&member), &srv.limits) {
        srv.db.signal_modified(key);
        srv.dirty += 1;
        Ok(Reply::Int(1))
    } else {
        Ok(Reply::Int(0))
    }
}

/// `SREM key member`
pub(crate) fn srem(srv: &mut Server, key: &str, member: &[u8]) -> Result<Reply> {
    let member = Value::encoded(member);
    let emptied = {
        let Some(set) = srv.db.set_mut(key)? else {
            return Ok(Reply::Int(0));
        };
        if !set.remove(&Literal::from_value(&member)) {
            return Ok(Reply::Int(0));
        }
        set.is_empty()
    };
    if emptied {
        srv.db.delete(key);
    }
    srv.db.signal_modified(key);
    srv.dirty += 1;
    Ok(Reply::Int(1))
}

/// `SMOVE source destination member`
pub(crate) fn smove(
    srv: &mut Server,
    source: &str,
    destination: &str,
    member: &[u8],
) -> Result<Reply> {
    // Missing source replies 0; a wrong-typed source or destination is an
    // error before anything moves.
    if !srv.db.exists(source) {
        return Ok(Reply::Int(0));
    }
    srv.db.set(source)?;
    srv.db.set(destination)?;

    if source == destination {
        return Ok(Reply::Int(1));
    }

    let member = Value::encoded(member);
    let emptied = {
        let Some(srcset) = srv.db.set_mut(source)? else {
            return Ok(Reply::Int(0));
        };
        if !srcset.remove(&Literal::from_value(&member)) {
            return Ok(Reply::Int(0));
        }
        srcset.is_empty()
    };
    if emptied {
        srv.db.delete(source);
    }
    srv.db.signal_modified(source);
    srv.db.signal_modified(destination);
    srv.dirty += 1;

    let dstset = srv.db.set_or_create_mut(destination, &member)?;
    if dstset.insert(&Literal::from_value(&member), &srv.limits) {
        // A second key changed.
        srv.dirty += 1;
    }
    Ok(Reply::Int(1))
}

/// `SISMEMBER key member`
pub(crate) fn sismember(srv: &mut Server, key: &str, member: &[u8]) -> Result<Reply> {
    let Some(set) = srv.db.set(key)? else {
        return Ok(Reply::Int(0));
    };
    let member = Value::encoded(member);
    if set.contains(&Literal::from_value(&member)) {
        Ok(Reply::Int(1))
    } else {
        Ok(Reply::Int(0))
    }
}

/// `SCARD key`
pub(crate) fn scard(srv: &mut Server, key: &str) -> Result<Reply> {
    let Some(set) = srv.db.set(key)? else {
        return Ok(Reply::Int(0));
    };
    Ok(Reply::Int(set.len() as i64))
}

/// `SPOP key`
pub(crate) fn spop(srv: &mut Server, key: &str) -> Result<Reply> {
    let (popped, emptied) = {
        let Some(set) = srv.db.set_mut(key)? else {
            return Ok(Reply::Nil);
        };
        let popped = match set.random_member() {
            Some(member) => member.to_value(),
            None => return Ok(Reply::Nil),
        };
        let removed = set.remove(&Literal::from_value(&popped));
        assert!(removed, "random member vanished from its set");
        (popped, set.is_empty())
    };
    if emptied {
        srv.db.delete(key);
    }
    srv.db.signal_modified(key);
    srv.dirty += 1;

    // Replicate the random choice deterministically.
    srv.repl_override = Some(Command::SRem {
        key: key.to_string(),
        member: popped.to_decoded(),
    });
    Ok(Reply::Bulk(popped))
}

/// `SRANDMEMBER key`
pub(crate) fn srandmember(srv: &mut Server, key: &str) -> Result<Reply> {
    let Some(set) = srv.db.set(key)? else {
        return Ok(Reply::Nil);
    };
    match set.random_member() {
        Some(member) => Ok(Reply::Bulk(member.to_value())),
        None => Ok(Reply::Nil),
    }
}
