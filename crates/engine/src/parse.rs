//! Wire argv → [`Command`] conversion.
//!
//! The codec hands over a vector of raw argument payloads; this module owns
//! arity checks, integer parsing, sub-keyword matching and timeout
//! validation, so handlers downstream only ever see well-formed typed
//! commands.

use tessera_collections::Side;
use tessera_core::{parse_i64_strict, Error, Result};

use crate::command::Command;

fn key(arg: &[u8]) -> String {
    String::from_utf8_lossy(arg).into_owned()
}

fn keys(args: &[&[u8]]) -> Vec<String> {
    args.iter().map(|a| key(a)).collect()
}

fn int(arg: &[u8]) -> Result<i64> {
    parse_i64_strict(arg).ok_or(Error::NotAnInteger)
}

fn timeout(arg: &[u8]) -> Result<u64> {
    match parse_i64_strict(arg) {
        None => Err(Error::TimeoutNotInteger),
        Some(t) if t < 0 => Err(Error::TimeoutNegative),
        Some(t) => Ok(t as u64),
    }
}

fn side(arg: &[u8]) -> Result<Side> {
    if arg.eq_ignore_ascii_case(b"before") {
        Ok(Side::Before)
    } else if arg.eq_ignore_ascii_case(b"after") {
        Ok(Side::After)
    } else {
        Err(Error::Syntax)
    }
}

fn arity(command: &'static str, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::WrongArity { command })
    }
}

/// Parse a raw argv into a typed [`Command`].
///
/// The first argument is the case-insensitive command name; the rest are
/// its operands as raw payloads.
pub fn parse_command(argv: &[&[u8]]) -> Result<Command> {
    let Some(first) = argv.first() else {
        return Err(Error::Syntax);
    };
    let name = String::from_utf8_lossy(first).to_ascii_lowercase();
    let argc = argv.len();

    match name.as_str() {
        // ==================== Sets ====================
        "sadd" => {
            arity("sadd", argc == 3)?;
            Ok(Command::SAdd {
                key: key(argv[1]),
                member: argv[2].to_vec(),
            })
        }
        "srem" => {
            arity("srem", argc == 3)?;
            Ok(Command::SRem {
                key: key(argv[1]),
                member: argv[2].to_vec(),
            })
        }
        "smove" => {
            arity("smove", argc == 4)?;
            Ok(Command::SMove {
                source: key(argv[1]),
                destination: key(argv[2]),
                member: argv[3].to_vec(),
            })
        }
        "sismember" => {
            arity("sismember", argc == 3)?;
            Ok(Command::SIsMember {
                key: key(argv[1]),
                member: argv[2].to_vec(),
            })
        }
        "scard" => {
            arity("scard", argc == 2)?;
            Ok(Command::SCard { key: key(argv[1]) })
        }
        "spop" => {
            arity("spop", argc == 2)?;
            Ok(Command::SPop { key: key(argv[1]) })
        }
        "srandmember" => {
            arity("srandmember", argc == 2)?;
            Ok(Command::SRandMember { key: key(argv[1]) })
        }
        "sinter" => {
            arity("sinter", argc >= 2)?;
            Ok(Command::SInter {
                keys: keys(&argv[1..]),
            })
        }
        "sinterstore" => {
            arity("sinterstore", argc >= 3)?;
            Ok(Command::SInterStore {
                destination: key(argv[1]),
                keys: keys(&argv[2..]),
            })
        }
        "sunion" => {
            arity("sunion", argc >= 2)?;
            Ok(Command::SUnion {
                keys: keys(&argv[1..]),
            })
        }
        "sunionstore" => {
            arity("sunionstore", argc >= 3)?;
            Ok(Command::SUnionStore {
                destination: key(argv[1]),
                keys: keys(&argv[2..]),
            })
        }
        "sdiff" => {
            arity("sdiff", argc >= 2)?;
            Ok(Command::SDiff {
                keys: keys(&argv[1..]),
            })
        }
        "sdiffstore" => {
            arity("sdiffstore", argc >= 3)?;
            Ok(Command::SDiffStore {
                destination: key(argv[1]),
                keys: keys(&argv[2..]),
            })
        }

        // ==================== Lists ====================
        "lpush" => {
            arity("lpush", argc == 3)?;
            Ok(Command::LPush {
                key: key(argv[1]),
                value: argv[2].to_vec(),
            })
        }
        "rpush" => {
            arity("rpush", argc == 3)?;
            Ok(Command::RPush {
                key: key(argv[1]),
                value: argv[2].to_vec(),
            })
        }
        "lpushx" => {
            arity("lpushx", argc == 3)?;
            Ok(Command::LPushX {
                key: key(argv[1]),
                value: argv[2].to_vec(),
            })
        }
        "rpushx" => {
            arity("rpushx", argc == 3)?;
            Ok(Command::RPushX {
                key: key(argv[1]),
                value: argv[2].to_vec(),
            })
        }
        "linsert" => {
            arity("linsert", argc == 5)?;
            Ok(Command::LInsert {
                key: key(argv[1]),
                side: side(argv[2])?,
                pivot: argv[3].to_vec(),
                value: argv[4].to_vec(),
            })
        }
        "llen" => {
            arity("llen", argc == 2)?;
            Ok(Command::LLen { key: key(argv[1]) })
        }
        "lindex" => {
            arity("lindex", argc == 3)?;
            Ok(Command::LIndex {
                key: key(argv[1]),
                index: int(argv[2])?,
            })
        }
        "lset" => {
            arity("lset", argc == 4)?;
            Ok(Command::LSet {
                key: key(argv[1]),
                index: int(argv[2])?,
                value: argv[3].to_vec(),
            })
        }
        "lpop" => {
            arity("lpop", argc == 2)?;
            Ok(Command::LPop { key: key(argv[1]) })
        }
        "rpop" => {
            arity("rpop", argc == 2)?;
            Ok(Command::RPop { key: key(argv[1]) })
        }
        "lrange" => {
            arity("lrange", argc == 4)?;
            Ok(Command::LRange {
                key: key(argv[1]),
                start: int(argv[2])?,
                stop: int(argv[3])?,
            })
        }
        "ltrim" => {
            arity("ltrim", argc == 4)?;
            Ok(Command::LTrim {
                key: key(argv[1]),
                start: int(argv[2])?,
                stop: int(argv[3])?,
            })
        }
        "lrem" => {
            arity("lrem", argc == 4)?;
            Ok(Command::LRem {
                key: key(argv[1]),
                count: int(argv[2])?,
                value: argv[3].to_vec(),
            })
        }
        "rpoplpush" => {
            arity("rpoplpush", argc == 3)?;
            Ok(Command::RPopLPush {
                source: key(argv[1]),
                destination: key(argv[2]),
            })
        }

        // ==================== Blocking ====================
        "blpop" => {
            arity("blpop", argc >= 3)?;
            Ok(Command::BLPop {
                keys: keys(&argv[1..argc - 1]),
                timeout: timeout(argv[argc - 1])?,
            })
        }
        "brpop" => {
            arity("brpop", argc >= 3)?;
            Ok(Command::BRPop {
                keys: keys(&argv[1..argc - 1]),
                timeout: timeout(argv[argc - 1])?,
            })
        }
        "brpoplpush" => {
            arity("brpoplpush", argc == 4)?;
            Ok(Command::BRPopLPush {
                source: key(argv[1]),
                destination: key(argv[2]),
                timeout: timeout(argv[3])?,
            })
        }

        _ => Err(Error::UnknownCommand { command: name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        let raw: Vec<&[u8]> = args.iter().map(|a| a.as_bytes()).collect();
        parse_command(&raw)
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(
            parse(&["SADD", "k", "v"]).unwrap(),
            Command::SAdd {
                key: "k".into(),
                member: b"v".to_vec()
            }
        );
        assert_eq!(
            parse(&["rpoplpush", "a", "b"]).unwrap(),
            Command::RPopLPush {
                source: "a".into(),
                destination: "b".into()
            }
        );
    }

    #[test]
    fn test_parse_arity_errors() {
        assert_eq!(
            parse(&["sadd", "k"]).unwrap_err(),
            Error::WrongArity { command: "sadd" }
        );
        assert_eq!(
            parse(&["blpop", "k"]).unwrap_err(),
            Error::WrongArity { command: "blpop" }
        );
    }

    #[test]
    fn test_parse_linsert_sides() {
        assert!(matches!(
            parse(&["linsert", "k", "BEFORE", "p", "v"]).unwrap(),
            Command::LInsert {
                side: Side::Before,
                ..
            }
        ));
        assert!(matches!(
            parse(&["linsert", "k", "after", "p", "v"]).unwrap(),
            Command::LInsert {
                side: Side::After,
                ..
            }
        ));
        assert_eq!(
            parse(&["linsert", "k", "sideways", "p", "v"]).unwrap_err(),
            Error::Syntax
        );
    }

    #[test]
    fn test_parse_integer_arguments() {
        assert!(matches!(
            parse(&["lrange", "k", "0", "-1"]).unwrap(),
            Command::LRange {
                start: 0,
                stop: -1,
                ..
            }
        ));
        assert_eq!(
            parse(&["lindex", "k", "abc"]).unwrap_err(),
            Error::NotAnInteger
        );
    }

    #[test]
    fn test_parse_timeouts() {
        assert!(matches!(
            parse(&["blpop", "a", "b", "30"]).unwrap(),
            Command::BLPop { timeout: 30, .. }
        ));
        assert_eq!(
            parse(&["blpop", "k", "soon"]).unwrap_err(),
            Error::TimeoutNotInteger
        );
        assert_eq!(
            parse(&["brpoplpush", "a", "b", "-1"]).unwrap_err(),
            Error::TimeoutNegative
        );
    }

    #[test]
    fn test_parse_multi_key_commands() {
        match parse(&["blpop", "a", "b", "c", "0"]).unwrap() {
            Command::BLPop { keys, timeout } => {
                assert_eq!(keys, vec!["a", "b", "c"]);
                assert_eq!(timeout, 0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        match parse(&["sinterstore", "dst", "a", "b"]).unwrap() {
            Command::SInterStore { destination, keys } => {
                assert_eq!(destination, "dst");
                assert_eq!(keys, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(
            parse(&["frobnicate", "k"]).unwrap_err(),
            Error::UnknownCommand { .. }
        ));
    }
}
