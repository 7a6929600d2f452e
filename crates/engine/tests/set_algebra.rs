//! Multi-key set algebra: intersection, union, difference, and the store
//! variants' destination discipline.

use std::collections::BTreeSet;

use tessera_core::Error;
use tessera_engine::{ClientId, Command, Reply, Server};

fn seed(srv: &mut Server, c: ClientId, key: &str, members: &[&str]) {
    for member in members {
        srv.execute(
            c,
            Command::SAdd {
                key: key.into(),
                member: member.as_bytes().to_vec(),
            },
        );
    }
}

fn members_of(reply: Reply) -> BTreeSet<String> {
    let Reply::Array(items) = reply else {
        panic!("expected an array reply, got {reply:?}");
    };
    items
        .into_iter()
        .map(|item| match item {
            Reply::Bulk(value) => String::from_utf8(value.to_decoded()).unwrap(),
            other => panic!("expected bulk items, got {other:?}"),
        })
        .collect()
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn sinter(srv: &mut Server, c: ClientId, keys: &[&str]) -> Reply {
    srv.execute(
        c,
        Command::SInter {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        },
    )
    .expect("sinter never blocks")
}

fn sunion(srv: &mut Server, c: ClientId, keys: &[&str]) -> Reply {
    srv.execute(
        c,
        Command::SUnion {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        },
    )
    .expect("sunion never blocks")
}

fn sdiff(srv: &mut Server, c: ClientId, keys: &[&str]) -> Reply {
    srv.execute(
        c,
        Command::SDiff {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        },
    )
    .expect("sdiff never blocks")
}

#[test]
fn test_sinter_and_sinterstore() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1", "2", "3"]);
    seed(&mut srv, c, "b", &["2", "3", "4"]);

    assert_eq!(members_of(sinter(&mut srv, c, &["a", "b"])), names(&["2", "3"]));

    let reply = srv
        .execute(
            c,
            Command::SInterStore {
                destination: "d".into(),
                keys: vec!["a".into(), "b".into()],
            },
        )
        .unwrap();
    assert_eq!(reply, Reply::Int(2));
    // The stored set equals the reply-mode result.
    assert_eq!(members_of(sinter(&mut srv, c, &["d"])), names(&["2", "3"]));
}

#[test]
fn test_sinter_is_commutative() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["x", "y", "1"]);
    seed(&mut srv, c, "b", &["y", "1", "z"]);

    assert_eq!(
        members_of(sinter(&mut srv, c, &["a", "b"])),
        members_of(sinter(&mut srv, c, &["b", "a"]))
    );
    // A ∩ A = A.
    assert_eq!(
        members_of(sinter(&mut srv, c, &["a", "a"])),
        names(&["x", "y", "1"])
    );
}

#[test]
fn test_sinter_missing_source_short_circuits() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1"]);

    assert_eq!(members_of(sinter(&mut srv, c, &["a", "ghost"])), names(&[]));

    // Store mode deletes a pre-existing destination on an empty result.
    seed(&mut srv, c, "d", &["stale"]);
    let reply = srv
        .execute(
            c,
            Command::SInterStore {
                destination: "d".into(),
                keys: vec!["a".into(), "ghost".into()],
            },
        )
        .unwrap();
    assert_eq!(reply, Reply::Int(0));
    assert!(!srv.db().exists("d"));
}

#[test]
fn test_sunion_laws() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1", "2"]);
    seed(&mut srv, c, "b", &["2", "3"]);

    let expected = names(&["1", "2", "3"]);
    assert_eq!(members_of(sunion(&mut srv, c, &["a", "b"])), expected);
    // Commutative and idempotent.
    assert_eq!(members_of(sunion(&mut srv, c, &["b", "a"])), expected);
    assert_eq!(
        members_of(sunion(&mut srv, c, &["a", "a", "b", "b"])),
        expected
    );
    // Missing sources act as empty sets.
    assert_eq!(
        members_of(sunion(&mut srv, c, &["a", "ghost", "b"])),
        expected
    );
}

#[test]
fn test_sunionstore() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1", "2"]);
    seed(&mut srv, c, "b", &["3"]);

    let reply = srv
        .execute(
            c,
            Command::SUnionStore {
                destination: "d".into(),
                keys: vec!["a".into(), "b".into()],
            },
        )
        .unwrap();
    assert_eq!(reply, Reply::Int(3));
    assert_eq!(
        members_of(sinter(&mut srv, c, &["d"])),
        names(&["1", "2", "3"])
    );
}

#[test]
fn test_sdiff_semantics() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1", "2", "3"]);
    seed(&mut srv, c, "b", &["2"]);
    seed(&mut srv, c, "self", &["x"]);

    assert_eq!(members_of(sdiff(&mut srv, c, &["a", "b"])), names(&["1", "3"]));
    // A \ A = ∅.
    assert_eq!(members_of(sdiff(&mut srv, c, &["self", "self"])), names(&[]));
    // A missing first source empties the result.
    assert_eq!(members_of(sdiff(&mut srv, c, &["ghost", "a"])), names(&[]));
    // Missing later sources are no-ops.
    assert_eq!(
        members_of(sdiff(&mut srv, c, &["a", "ghost", "b"])),
        names(&["1", "3"])
    );
}

#[test]
fn test_sdiffstore_empty_result_removes_destination() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1"]);
    seed(&mut srv, c, "b", &["1"]);
    seed(&mut srv, c, "d", &["stale"]);

    let reply = srv
        .execute(
            c,
            Command::SDiffStore {
                destination: "d".into(),
                keys: vec!["a".into(), "b".into()],
            },
        )
        .unwrap();
    assert_eq!(reply, Reply::Int(0));
    assert!(!srv.db().exists("d"), "empty results never create or keep the key");
}

#[test]
fn test_store_into_a_source_key_reads_pre_operation_contents() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1", "2", "3"]);
    seed(&mut srv, c, "b", &["2", "3", "4"]);

    let reply = srv
        .execute(
            c,
            Command::SInterStore {
                destination: "a".into(),
                keys: vec!["a".into(), "b".into()],
            },
        )
        .unwrap();
    assert_eq!(reply, Reply::Int(2));
    assert_eq!(members_of(sinter(&mut srv, c, &["a"])), names(&["2", "3"]));
}

#[test]
fn test_wrong_typed_source_aborts_without_side_effects() {
    let mut srv = Server::new();
    let c = srv.connect();
    seed(&mut srv, c, "a", &["1"]);
    srv.execute(
        c,
        Command::RPush {
            key: "l".into(),
            value: b"v".to_vec(),
        },
    );
    seed(&mut srv, c, "d", &["keep"]);
    let dirty_before = srv.dirty();

    for reply in [
        sinter(&mut srv, c, &["a", "l"]),
        sunion(&mut srv, c, &["a", "l"]),
        sdiff(&mut srv, c, &["a", "l"]),
        srv.execute(
            c,
            Command::SInterStore {
                destination: "d".into(),
                keys: vec!["a".into(), "l".into()],
            },
        )
        .unwrap(),
    ] {
        assert_eq!(reply, Reply::Error(Error::WrongType));
    }

    assert_eq!(srv.dirty(), dirty_before, "aborted operations mutate nothing");
    assert!(srv.db().exists("d"));
}

#[test]
fn test_mixed_encoding_intersection() {
    let mut srv = Server::new();
    let c = srv.connect();
    // "ints" stays packed; "mixed" promotes to hash.
    seed(&mut srv, c, "ints", &["1", "2", "3"]);
    seed(&mut srv, c, "mixed", &["2", "3", "word"]);

    assert_eq!(
        members_of(sinter(&mut srv, c, &["ints", "mixed"])),
        names(&["2", "3"])
    );
    assert_eq!(
        members_of(sdiff(&mut srv, c, &["mixed", "ints"])),
        names(&["word"])
    );
}
