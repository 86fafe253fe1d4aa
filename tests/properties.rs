//! Property-based tests for line reading and parsing.
//!
//! Test coverage:
//! - Segment size never changes which logical lines come out
//! - Plain `KEY=VALUE` lines load the value unchanged
//! - Quoted values keep their hashes

use std::io::Cursor;

use envload::{LineSource, parse_line};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,24}".prop_map(String::from)
}

/// Values without separators, quotes, hashes or edge spaces.
fn plain_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./,+-]([a-zA-Z0-9_./,+ -]{0,60}[a-zA-Z0-9_./,+-])?".prop_map(String::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn segment_size_does_not_change_lines(
        lines in prop::collection::vec("[^\r\n]{0,120}", 1..12),
        segment_size in 16usize..64,
    ) {
        let mut input = lines.join("\n");
        input.push('\n');

        let read: Vec<String> = LineSource::new(Cursor::new(input.as_bytes()), segment_size)
            .collect::<std::io::Result<_>>()
            .expect("reading from memory should succeed");

        prop_assert_eq!(read, lines);
    }

    #[test]
    fn plain_assignments_keep_their_value(key in key_strategy(), value in plain_value_strategy()) {
        let line = format!("{key}={value}");

        prop_assert_eq!(parse_line(&line), Ok((key, value)));
    }

    #[test]
    fn quoted_hashes_survive(key in key_strategy(), head in "[a-z]{1,8}", tail in "[a-z]{1,8}") {
        let line = format!("{key}=\"{head}#{tail}\" # trailing");

        prop_assert_eq!(parse_line(&line), Ok((key, format!("{head}#{tail}"))));
    }
}
