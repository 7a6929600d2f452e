//! The blocking-key rendezvous.
//!
//! Clients that pop from empty or missing keys park here instead of
//! polling: [`block_for_keys`] records the client under every key it waits
//! on, and the next push to any of those keys routes through
//! [`try_deliver`], which hands the element to the oldest waiter directly;
//! the element never lands in the list.
//!
//! The tables form a bidirectional index: the keyspace maps key → waiter
//! queue, and each client's blocking record holds its key list. The two are
//! only ever reconciled by [`unblock`], which is the single exit path for
//! all three cancellation modes (delivery, deadline expiry, disconnect);
//! after it returns the client appears in no table.

use tracing::debug;

use tessera_core::{Error, Result, Value};

use crate::client::{BlockedPop, ClientId};
use crate::handlers::lists;
use crate::reply::Reply;
use crate::server::Server;

/// Park `client` against `keys` until a push arrives or `deadline` (in
/// absolute seconds, 0 meaning never) elapses. For the pop-and-push
/// variant, `target` carries the destination key.
///
/// The caller has already verified none of the keys holds data; the
/// connection's read side stays detached until [`unblock`] queues the
/// client for the dispatch loop to re-attach.
pub(crate) fn block_for_keys(
    srv: &mut Server,
    client: ClientId,
    keys: &[String],
    deadline: u64,
    target: Option<String>,
) {
    for key in keys {
        srv.db
            .blocking_keys
            .entry(key.clone())
            .or_default()
            .push_back(client);
    }
    srv.client_mut(client).blocked = Some(BlockedPop {
        keys: keys.to_vec(),
        deadline,
        target,
    });
    debug!(%client, ?keys, deadline, "client parked on keys");
}

/// Remove `client` from every per-key waiter list it appears in, dropping
/// lists that become empty, and queue it for the dispatch loop.
///
/// A no-op when the client is not blocked.
pub(crate) fn unblock(srv: &mut Server, client: ClientId) {
    let Some(record) = srv.client_mut(client).blocked.take() else {
        return;
    };
    for key in &record.keys {
        if let Some(waiters) = srv.db.blocking_keys.get_mut(key) {
            waiters.retain(|waiter| *waiter != client);
            if waiters.is_empty() {
                srv.db.blocking_keys.remove(key);
            }
        }
    }
    srv.unblocked.push_back(client);
    debug!(%client, "client unblocked");
}

/// Offer `element`, about to be pushed onto `key`, to the oldest waiter.
///
/// Returns `true` when a waiter took the element, in which case the caller
/// must not perform its push. Waiters are tried in FIFO order, at most as
/// many as were parked when the offer started; a pop-and-push waiter whose
/// target key exists with a non-list type is unblocked onto the wrong-type
/// error path and the next waiter is tried.
pub(crate) fn try_deliver(srv: &mut Server, key: &str, element: &Value) -> Result<bool> {
    let Some(waiters) = srv.db.blocking_keys.get(key) else {
        return Ok(false);
    };
    // Waiters that park during delivery are not considered this round.
    let mut remaining = waiters.len();

    while remaining > 0 {
        remaining -= 1;
        let Some(receiver) = srv
            .db
            .blocking_keys
            .get(key)
            .and_then(|queue| queue.front().copied())
        else {
            break;
        };
        let target = srv
            .client(receiver)
            .blocked
            .as_ref()
            .and_then(|record| record.target.clone());

        // Unblocking pops the receiver off this key's queue (and all its
        // other queues) whether or not the hand-off below succeeds.
        unblock(srv, receiver);

        match target {
            None => {
                let reply = Reply::Array(vec![
                    Reply::Bulk(Value::raw(key.as_bytes())),
                    Reply::Bulk(element.clone()),
                ]);
                srv.client_mut(receiver).replies.push_back(reply);
                debug!(%receiver, key, "element delivered to waiter");
                return Ok(true);
            }
            Some(destination) => {
                if matches!(srv.db.lookup(&destination), Some(object) if object.as_list().is_none())
                {
                    // The waiter's destination went wrong-typed while it was
                    // parked; skip it and try the next waiter.
                    srv.client_mut(receiver)
                        .replies
                        .push_back(Reply::Error(Error::WrongType));
                    debug!(%receiver, %destination, "waiter skipped: destination not a list");
                    continue;
                }
                lists::push_to_destination(srv, &destination, element)?;
                srv.client_mut(receiver)
                    .replies
                    .push_back(Reply::Bulk(element.clone()));
                debug!(%receiver, key, %destination, "element delivered through waiter target");
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Unblock every parked client whose deadline is set and has elapsed,
/// queueing the nil reply shape of its command.
pub(crate) fn sweep_expired(srv: &mut Server) {
    let now = srv.now;
    let expired: Vec<(ClientId, bool)> = srv
        .clients
        .iter()
        .filter_map(|(id, client)| client.blocked.as_ref().map(|record| (*id, record)))
        .filter(|(_, record)| record.deadline != 0 && now > record.deadline)
        .map(|(id, record)| (id, record.target.is_some()))
        .collect();

    for (client, has_target) in expired {
        unblock(srv, client);
        let reply = if has_target {
            Reply::Nil
        } else {
            Reply::NilArray
        };
        srv.client_mut(client).replies.push_back(reply);
        debug!(%client, "blocked client timed out");
    }
}
