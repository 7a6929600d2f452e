//! The tessera engine: keyspace, command dispatch, set algebra and the
//! blocking rendezvous.
//!
//! This crate orchestrates the layers below it:
//! - [`Db`]: the key→object map with notify/delete hooks and the per-key
//!   blocking tables
//! - [`Command`] / [`Reply`]: the typed instruction set and its fixed
//!   reply shapes, with [`parse_command`] converting raw wire argv
//! - [`Server`]: the single entry point; serial execution, client
//!   registry, dirty counter, replication journal, deadline sweep
//!
//! The engine is the only component that knows about clients, keys and
//! cross-container coordination; the containers themselves live in
//! `tessera-collections`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod algebra;
mod blocking;
mod client;
pub mod command;
mod handlers;
pub mod keyspace;
pub mod parse;
pub mod reply;
pub mod server;

pub use client::ClientId;
pub use command::Command;
pub use keyspace::{Db, Object};
pub use parse::parse_command;
pub use reply::Reply;
pub use server::Server;

// Container types that appear in the public surface.
pub use tessera_collections::{End, List, ListEncoding, Set, SetEncoding, Side};
