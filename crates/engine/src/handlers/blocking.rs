//! Blocking command fronts: pop now if anything is there, park otherwise.

use tessera_core::{Error, Result, Value};

use tessera_collections::End;

use crate::blocking::block_for_keys;
use crate::client::ClientId;
use crate::keyspace::Object;
use crate::reply::Reply;
use crate::server::Server;

/// `BLPOP` / `BRPOP`
///
/// Scans the candidate keys in order; the first key holding data is popped
/// immediately with a `[key, value]` reply, exactly like the non-blocking
/// pop. With nothing available the client parks, unless it is inside an
/// atomic batch, where blocking is forbidden and the reply is an immediate
/// nil array.
pub(crate) fn blocking_pop(
    srv: &mut Server,
    client: ClientId,
    keys: &[String],
    timeout: u64,
    end: End,
) -> Result<Option<Reply>> {
    for key in keys {
        let popped = match srv.db.lookup_mut(key) {
            None => None,
            Some(Object::List(list)) => list.pop(end),
            Some(_) => return Err(Error::WrongType),
        };
        let Some(value) = popped else { continue };

        let emptied = matches!(srv.db.lookup(key), Some(Object::List(list)) if list.is_empty());
        if emptied {
            srv.db.delete(key);
        }
        srv.db.signal_modified(key);
        srv.dirty += 1;
        return Ok(Some(Reply::Array(vec![
            Reply::Bulk(Value::raw(key.as_bytes())),
            Reply::Bulk(value),
        ])));
    }

    if srv.client(client).in_multi {
        return Ok(Some(Reply::NilArray));
    }

    let deadline = absolute_deadline(srv, timeout);
    block_for_keys(srv, client, keys, deadline, None);
    Ok(None)
}

/// `BRPOPLPUSH source destination timeout`
///
/// With data in the source this is a plain `RPOPLPUSH`; with the source
/// missing the client parks carrying the destination as its hand-off
/// target.
pub(crate) fn brpoplpush(
    srv: &mut Server,
    client: ClientId,
    source: &str,
    destination: &str,
    timeout: u64,
) -> Result<Option<Reply>> {
    match srv.db.lookup(source) {
        None => {
            if srv.client(client).in_multi {
                return Ok(Some(Reply::Nil));
            }
            let deadline = absolute_deadline(srv, timeout);
            block_for_keys(
                srv,
                client,
                &[source.to_string()],
                deadline,
                Some(destination.to_string()),
            );
            Ok(None)
        }
        Some(Object::List(_)) => {
            super::lists::rpoplpush(srv, source, destination).map(Some)
        }
        Some(_) => Err(Error::WrongType),
    }
}

fn absolute_deadline(srv: &Server, timeout: u64) -> u64 {
    if timeout > 0 {
        srv.now() + timeout
    } else {
        0
    }
}
