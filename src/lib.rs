//! # Tessera
//!
//! The in-memory collection engine of a single-threaded key/value server:
//! sets and lists with two interchangeable physical encodings each, multi-key
//! set algebra, and a blocking-pop rendezvous that hands pushed elements
//! directly to parked clients.
//!
//! # Quick Start
//!
//! ```
//! use tessera::{Command, Reply, Server};
//!
//! let mut server = Server::new();
//! let client = server.connect();
//!
//! server.execute(client, Command::RPush { key: "jobs".into(), value: b"a".to_vec() });
//! server.execute(client, Command::RPush { key: "jobs".into(), value: b"b".to_vec() });
//!
//! let reply = server.execute(client, Command::LRange { key: "jobs".into(), start: 0, stop: -1 });
//! assert!(matches!(reply, Some(Reply::Array(items)) if items.len() == 2));
//! ```
//!
//! # Architecture
//!
//! The [`Server`] struct is the single entry point: commands go in as the
//! [`Command`] instruction set, results come out as [`Reply`] values. The
//! wire codec and event loop sit outside this crate; they feed parsed
//! commands in and drain reply queues out.
//!
//! Internal crates (`tessera-core`, `tessera-collections`) are re-exported
//! only where their types appear in the public surface.

pub use tessera_core::{CollectionLimits, Error, Result, Value};
pub use tessera_engine::*;
