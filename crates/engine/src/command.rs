//! The command instruction set.
//!
//! Every operation the engine performs is a variant of [`Command`]:
//! self-contained, typed, serializable pure data. The wire names are
//! contractual (they appear on the wire and in the replication journal);
//! [`Command::name`] returns them. Conversion from raw argv lives in
//! [`crate::parse`].

use serde::{Deserialize, Serialize};

use tessera_collections::Side;

/// A self-contained, serializable engine operation.
///
/// Member and value payloads are raw bytes as they arrived on the wire;
/// handlers apply the integer encoding when storing them. Keys are treated
/// as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    // ==================== Sets ====================
    /// Add a member to a set. Replies 1 if added, 0 on duplicate.
    SAdd {
        /// Set key.
        key: String,
        /// Member payload.
        member: Vec<u8>,
    },
    /// Remove a member from a set. Replies 1 if removed.
    SRem {
        /// Set key.
        key: String,
        /// Member payload.
        member: Vec<u8>,
    },
    /// Move a member between sets. Replies 1 if moved.
    SMove {
        /// Source set key.
        source: String,
        /// Destination set key.
        destination: String,
        /// Member payload.
        member: Vec<u8>,
    },
    /// Membership test. Replies 0/1.
    SIsMember {
        /// Set key.
        key: String,
        /// Member payload.
        member: Vec<u8>,
    },
    /// Cardinality of a set.
    SCard {
        /// Set key.
        key: String,
    },
    /// Remove and return a random member.
    SPop {
        /// Set key.
        key: String,
    },
    /// Return a random member without removing it.
    SRandMember {
        /// Set key.
        key: String,
    },
    /// Intersect sets, replying with the members.
    SInter {
        /// Source set keys.
        keys: Vec<String>,
    },
    /// Intersect sets into a destination key, replying with the cardinality.
    SInterStore {
        /// Destination key.
        destination: String,
        /// Source set keys.
        keys: Vec<String>,
    },
    /// Union sets, replying with the members.
    SUnion {
        /// Source set keys.
        keys: Vec<String>,
    },
    /// Union sets into a destination key.
    SUnionStore {
        /// Destination key.
        destination: String,
        /// Source set keys.
        keys: Vec<String>,
    },
    /// Subtract sets from the first, replying with the members.
    SDiff {
        /// Source set keys.
        keys: Vec<String>,
    },
    /// Subtract sets into a destination key.
    SDiffStore {
        /// Destination key.
        destination: String,
        /// Source set keys.
        keys: Vec<String>,
    },

    // ==================== Lists ====================
    /// Push a value onto the head. Replies with the new length.
    LPush {
        /// List key.
        key: String,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Push a value onto the tail.
    RPush {
        /// List key.
        key: String,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Head push that is a no-op when the key is missing. Replies 0 then.
    LPushX {
        /// List key.
        key: String,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Tail push that is a no-op when the key is missing.
    RPushX {
        /// List key.
        key: String,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Insert next to the first element equal to `pivot`. Replies with the
    /// new length, -1 when the pivot is missing, 0 when the key is.
    LInsert {
        /// List key.
        key: String,
        /// Which side of the pivot to insert on.
        side: Side,
        /// Pivot payload.
        pivot: Vec<u8>,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Length of a list.
    LLen {
        /// List key.
        key: String,
    },
    /// The element at `index`; negative counts from the tail.
    LIndex {
        /// List key.
        key: String,
        /// Element index.
        index: i64,
    },
    /// Replace the element at `index`.
    LSet {
        /// List key.
        key: String,
        /// Element index.
        index: i64,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Pop from the head.
    LPop {
        /// List key.
        key: String,
    },
    /// Pop from the tail.
    RPop {
        /// List key.
        key: String,
    },
    /// The inclusive subsequence from `start` to `stop`.
    LRange {
        /// List key.
        key: String,
        /// First index.
        start: i64,
        /// Last index, inclusive.
        stop: i64,
    },
    /// Keep only the inclusive subsequence from `start` to `stop`.
    LTrim {
        /// List key.
        key: String,
        /// First index.
        start: i64,
        /// Last index, inclusive.
        stop: i64,
    },
    /// Remove elements equal to `value`; sign of `count` picks the scan
    /// direction, 0 removes all.
    LRem {
        /// List key.
        key: String,
        /// Match budget and direction.
        count: i64,
        /// Value payload.
        value: Vec<u8>,
    },
    /// Pop the source's tail and push it onto the destination's head.
    RPopLPush {
        /// Source list key.
        source: String,
        /// Destination list key.
        destination: String,
    },

    // ==================== Blocking ====================
    /// Head pop that parks the client until data arrives or the timeout
    /// elapses.
    BLPop {
        /// Candidate list keys, checked in order.
        keys: Vec<String>,
        /// Relative timeout in seconds; 0 never expires.
        timeout: u64,
    },
    /// Tail pop that parks the client.
    BRPop {
        /// Candidate list keys, checked in order.
        keys: Vec<String>,
        /// Relative timeout in seconds; 0 never expires.
        timeout: u64,
    },
    /// Blocking pop-and-push: like `RPopLPush`, parking until the source
    /// has data.
    BRPopLPush {
        /// Source list key.
        source: String,
        /// Destination list key.
        destination: String,
        /// Relative timeout in seconds; 0 never expires.
        timeout: u64,
    },
}

impl Command {
    /// The contractual wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SAdd { .. } => "sadd",
            Command::SRem { .. } => "srem",
            Command::SMove { .. } => "smove",
            Command::SIsMember { .. } => "sismember",
            Command::SCard { .. } => "scard",
            Command::SPop { .. } => "spop",
            Command::SRandMember { .. } => "srandmember",
            Command::SInter { .. } => "sinter",
            Command::SInterStore { .. } => "sinterstore",
            Command::SUnion { .. } => "sunion",
            Command::SUnionStore { .. } => "sunionstore",
            Command::SDiff { .. } => "sdiff",
            Command::SDiffStore { .. } => "sdiffstore",
            Command::LPush { .. } => "lpush",
            Command::RPush { .. } => "rpush",
            Command::LPushX { .. } => "lpushx",
            Command::RPushX { .. } => "rpushx",
            Command::LInsert { .. } => "linsert",
            Command::LLen { .. } => "llen",
            Command::LIndex { .. } => "lindex",
            Command::LSet { .. } => "lset",
            Command::LPop { .. } => "lpop",
            Command::RPop { .. } => "rpop",
            Command::LRange { .. } => "lrange",
            Command::LTrim { .. } => "ltrim",
            Command::LRem { .. } => "lrem",
            Command::RPopLPush { .. } => "rpoplpush",
            Command::BLPop { .. } => "blpop",
            Command::BRPop { .. } => "brpop",
            Command::BRPopLPush { .. } => "brpoplpush",
        }
    }
}
