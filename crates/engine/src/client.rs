//! Engine-level client handles.
//!
//! The network connection itself is out of scope; what the engine tracks
//! per client is the part command execution needs: a queue for replies that
//! arrive asynchronously (rendezvous deliveries, timeout nils), the
//! blocking record while the client is parked, and the atomic-batch flag
//! that forbids blocking inside a transaction.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reply::Reply;

/// Opaque identifier of a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub(crate) u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client#{}", self.0)
    }
}

/// The blocking record a parked client carries.
///
/// The client appears in the per-key waiter list of every key in `keys`;
/// unblocking removes it from all of them atomically.
#[derive(Debug, Clone)]
pub(crate) struct BlockedPop {
    /// Keys the client waits on, in command order.
    pub keys: Vec<String>,
    /// Absolute deadline in wall-clock seconds; 0 means no expiry.
    pub deadline: u64,
    /// Destination key for the pop-and-push variant.
    pub target: Option<String>,
}

/// Per-client execution state.
#[derive(Debug, Default)]
pub(crate) struct Client {
    /// Replies that arrived outside the client's own command flow.
    pub replies: VecDeque<Reply>,
    /// Present while the client is parked in the rendezvous tables.
    pub blocked: Option<BlockedPop>,
    /// Whether the client is inside an atomic batch; blocking commands
    /// return an immediate nil instead of parking.
    pub in_multi: bool,
}
