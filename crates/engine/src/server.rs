//! The command dispatcher.
//!
//! [`Server`] owns everything a command can touch: the keyspace, the
//! promotion limits, the client registry, the dirty counter, the engine
//! clock and the replication journal. Execution is strictly serial; a
//! command runs to completion before the next one starts, which is what
//! makes the no-lock design sound.
//!
//! ## Replies
//!
//! [`Server::execute`] returns the issuing client's reply directly, or
//! `None` when the command parked the client. Replies produced for *other*
//! clients (rendezvous deliveries, timeout nils) land in their reply
//! queues; drain them with [`Server::take_reply`].
//!
//! ## Replication journal
//!
//! Every command that dirtied the keyspace is appended to the journal so
//! persistence and replication collaborators can observe it. A handler may
//! override its journal entry to keep replication deterministic; `SPOP`
//! journals itself as an `SREM` of the member it happened to pop.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use tessera_collections::End;
use tessera_core::{CollectionLimits, Result};

use crate::blocking;
use crate::client::{Client, ClientId};
use crate::command::Command;
use crate::handlers::{lists, sets};
use crate::keyspace::Db;
use crate::reply::Reply;
use crate::{algebra, handlers};

/// The collection engine: keyspace, clients and command execution.
#[derive(Debug)]
pub struct Server {
    pub(crate) db: Db,
    pub(crate) limits: CollectionLimits,
    pub(crate) clients: HashMap<ClientId, Client>,
    next_client: u64,
    pub(crate) dirty: u64,
    pub(crate) now: u64,
    pub(crate) unblocked: VecDeque<ClientId>,
    repl_log: Vec<Command>,
    pub(crate) repl_override: Option<Command>,
}

impl Server {
    /// Create an engine with default limits.
    pub fn new() -> Self {
        Server::with_limits(CollectionLimits::default())
    }

    /// Create an engine with explicit promotion limits.
    pub fn with_limits(limits: CollectionLimits) -> Self {
        Server {
            db: Db::new(),
            limits,
            clients: HashMap::new(),
            next_client: 0,
            dirty: 0,
            now: 0,
            unblocked: VecDeque::new(),
            repl_log: Vec::new(),
            repl_override: None,
        }
    }

    // ========== Introspection ==========

    /// The keyspace.
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Mutable keyspace access, for embedders that seed state directly.
    pub fn db_mut(&mut self) -> &mut Db {
        &mut self.db
    }

    /// The promotion limits in effect.
    pub fn limits(&self) -> &CollectionLimits {
        &self.limits
    }

    /// Process-wide count of mutating operations.
    pub fn dirty(&self) -> u64 {
        self.dirty
    }

    /// Current engine time in wall-clock seconds, as last set by
    /// [`Server::tick`].
    pub fn now(&self) -> u64 {
        self.now
    }

    /// The replication journal: every mutating command in execution order,
    /// with nondeterministic commands rewritten to deterministic ones.
    pub fn repl_log(&self) -> &[Command] {
        &self.repl_log
    }

    // ========== Client lifecycle ==========

    /// Register a client and return its handle.
    pub fn connect(&mut self) -> ClientId {
        self.next_client += 1;
        let id = ClientId(self.next_client);
        self.clients.insert(id, Client::default());
        id
    }

    /// Deregister a client. A blocked client is unblocked first, so after
    /// this returns it appears in no blocking table.
    pub fn disconnect(&mut self, client: ClientId) {
        if self
            .clients
            .get(&client)
            .is_some_and(|c| c.blocked.is_some())
        {
            blocking::unblock(self, client);
            debug!(%client, "blocked client disconnected");
        }
        self.clients.remove(&client);
        self.unblocked.retain(|c| *c != client);
    }

    /// Mark the client as inside (or outside) an atomic batch. Blocking
    /// commands issued inside one return an immediate nil.
    pub fn set_multi(&mut self, client: ClientId, in_multi: bool) {
        self.client_mut(client).in_multi = in_multi;
    }

    /// Whether the client is currently parked in the blocking tables.
    pub fn is_blocked(&self, client: ClientId) -> bool {
        self.clients
            .get(&client)
            .is_some_and(|c| c.blocked.is_some())
    }

    /// Pop the next reply queued for `client` outside its own command flow
    /// (a rendezvous delivery or a timeout nil).
    pub fn take_reply(&mut self, client: ClientId) -> Option<Reply> {
        self.clients.get_mut(&client)?.replies.pop_front()
    }

    /// Pop the next client the rendezvous layer has unblocked; the dispatch
    /// loop re-attaches its connection and re-examines its input.
    pub fn take_unblocked(&mut self) -> Option<ClientId> {
        self.unblocked.pop_front()
    }

    pub(crate) fn client(&self, client: ClientId) -> &Client {
        match self.clients.get(&client) {
            Some(c) => c,
            None => panic!("{client} is not connected"),
        }
    }

    pub(crate) fn client_mut(&mut self, client: ClientId) -> &mut Client {
        match self.clients.get_mut(&client) {
            Some(c) => c,
            None => panic!("{client} is not connected"),
        }
    }

    // ========== Time ==========

    /// Advance the engine clock and run the deadline sweep, unblocking any
    /// parked client whose deadline has elapsed with a nil reply. Called by
    /// the event loop's timer.
    pub fn tick(&mut self, now_secs: u64) {
        self.now = now_secs;
        blocking::sweep_expired(self);
    }

    // ========== Execution ==========

    /// Execute one command on behalf of `client`.
    ///
    /// Returns the reply, or `None` when the command blocked the client;
    /// its eventual reply will arrive through [`Server::take_reply`].
    /// Errors come back as [`Reply::Error`] with all state unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `client` is not connected.
    pub fn execute(&mut self, client: ClientId, command: Command) -> Option<Reply> {
        // Touch the registry so a bogus handle fails fast even for
        // commands that never look at the client.
        let _ = self.client(client);

        let dirty_before = self.dirty;
        self.repl_override = None;
        let journal_copy = command.clone();

        let outcome = self.dispatch(client, command);

        match self.repl_override.take() {
            Some(rewritten) => self.repl_log.push(rewritten),
            None if self.dirty > dirty_before => self.repl_log.push(journal_copy),
            None => {}
        }

        match outcome {
            Ok(reply) => reply,
            Err(err) => Some(Reply::Error(err)),
        }
    }

    fn dispatch(&mut self, client: ClientId, command: Command) -> Result<Option<Reply>> {
        let reply = match command {
            // Sets
            Command::SAdd { key, member } => Some(sets::sadd(self, &key, &member)?),
            Command::SRem { key, member } => Some(sets::srem(self, &key, &member)?),
            Command::SMove {
                source,
                destination,
                member,
            } => Some(sets::smove(self, &source, &destination, &member)?),
            Command::SIsMember { key, member } => Some(sets::sismember(self, &key, &member)?),
            Command::SCard { key } => Some(sets::scard(self, &key)?),
            Command::SPop { key } => Some(sets::spop(self, &key)?),
            Command::SRandMember { key } => Some(sets::srandmember(self, &key)?),
            Command::SInter { keys } => Some(algebra::sinter(self, &keys, None)?),
            Command::SInterStore { destination, keys } => {
                Some(algebra::sinter(self, &keys, Some(&destination))?)
            }
            Command::SUnion { keys } => {
                Some(algebra::sunion_diff(self, &keys, None, algebra::SetOp::Union)?)
            }
            Command::SUnionStore { destination, keys } => Some(algebra::sunion_diff(
                self,
                &keys,
                Some(&destination),
                algebra::SetOp::Union,
            )?),
            Command::SDiff { keys } => {
                Some(algebra::sunion_diff(self, &keys, None, algebra::SetOp::Diff)?)
            }
            Command::SDiffStore { destination, keys } => Some(algebra::sunion_diff(
                self,
                &keys,
                Some(&destination),
                algebra::SetOp::Diff,
            )?),

            // Lists
            Command::LPush { key, value } => Some(lists::push(self, &key, &value, End::Head)?),
            Command::RPush { key, value } => Some(lists::push(self, &key, &value, End::Tail)?),
            Command::LPushX { key, value } => Some(lists::pushx(self, &key, &value, End::Head)?),
            Command::RPushX { key, value } => Some(lists::pushx(self, &key, &value, End::Tail)?),
            Command::LInsert {
                key,
                side,
                pivot,
                value,
            } => Some(lists::linsert(self, &key, side, &pivot, &value)?),
            Command::LLen { key } => Some(lists::llen(self, &key)?),
            Command::LIndex { key, index } => Some(lists::lindex(self, &key, index)?),
            Command::LSet { key, index, value } => Some(lists::lset(self, &key, index, &value)?),
            Command::LPop { key } => Some(lists::pop(self, &key, End::Head)?),
            Command::RPop { key } => Some(lists::pop(self, &key, End::Tail)?),
            Command::LRange { key, start, stop } => Some(lists::lrange(self, &key, start, stop)?),
            Command::LTrim { key, start, stop } => Some(lists::ltrim(self, &key, start, stop)?),
            Command::LRem { key, count, value } => Some(lists::lrem(self, &key, count, &value)?),
            Command::RPopLPush {
                source,
                destination,
            } => Some(lists::rpoplpush(self, &source, &destination)?),

            // Blocking
            Command::BLPop { keys, timeout } => {
                handlers::blocking::blocking_pop(self, client, &keys, timeout, End::Head)?
            }
            Command::BRPop { keys, timeout } => {
                handlers::blocking::blocking_pop(self, client, &keys, timeout, End::Tail)?
            }
            Command::BRPopLPush {
                source,
                destination,
                timeout,
            } => handlers::blocking::brpoplpush(self, client, &source, &destination, timeout)?,
        };
        Ok(reply)
    }
}

impl Default for Server {
    fn default() -> Self {
        Server::new()
    }
}
