use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::line_source::{DEFAULT_SEGMENT_SIZE, LineSource};
use crate::model::{Entry, ParseOutput};

const EXPORT_TOKEN: &str = "export";

/// Parse env entries from UTF-8 text.
///
/// Ignored lines produce nothing; malformed lines are reported in
/// [`ParseOutput::errors`] and do not stop the parse.
pub fn parse_str(input: &str) -> ParseOutput {
    parse_lines(input.lines().map(str::to_owned), None)
}

/// Parse env entries from a buffered reader, reassembling long lines.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParseOutput, Error> {
    let lines = LineSource::new(reader, DEFAULT_SEGMENT_SIZE).collect::<Result<Vec<_>, _>>()?;
    Ok(parse_lines(lines, None))
}

pub(crate) fn parse_lines<I>(lines: I, source: Option<&Path>) -> ParseOutput
where
    I: IntoIterator<Item = String>,
{
    let mut output = ParseOutput::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_num = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        if is_ignored_line(&line) {
            output.ignored += 1;
            continue;
        }

        match parse_line(&line) {
            Ok((key, value)) => output.entries.push(Entry {
                key,
                value,
                source: source.map(Path::to_path_buf),
                line: line_num,
            }),
            Err(kind) => output.errors.push(ParseError::new(line_num, kind)),
        }
    }

    output
}

/// Whether a line is blank or a full-line comment.
pub fn is_ignored_line(line: &str) -> bool {
    let trimmed = line.trim_matches([' ', '\n', '\t']);
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Extract a key and value from one non-ignored logical line.
///
/// Accepts `KEY=VALUE` and, when the line does not hold exactly one `=`,
/// `KEY: VALUE`. A leading `export` token is dropped from the key. The value
/// has trailing comments removed (hashes inside quotes are kept), is unwrapped
/// when fully quoted, and has `\"` and `\n` expanded.
pub fn parse_line(line: &str) -> Result<(String, String), ParseErrorKind> {
    if line.is_empty() {
        return Err(ParseErrorKind::ZeroLength);
    }

    let (raw_key, raw_value) = split_once_exact(line, '=')
        .or_else(|| split_once_exact(line, ':'))
        .ok_or(ParseErrorKind::MissingSeparator)?;

    let key = normalize_key(raw_key);
    if key.is_empty() {
        return Err(ParseErrorKind::EmptyKey);
    }

    let value = strip_comments(raw_value);
    let value = unquote(&value);
    let value = value.trim_matches(' ');

    Ok((key.to_owned(), value.to_owned()))
}

/// Split on `separator` only when it occurs exactly once.
fn split_once_exact(line: &str, separator: char) -> Option<(&str, &str)> {
    let (head, tail) = line.split_once(separator)?;
    if tail.contains(separator) {
        return None;
    }
    Some((head, tail))
}

fn normalize_key(raw: &str) -> &str {
    let raw = raw.trim_start_matches([' ', '\t']);
    let key = match raw.strip_prefix(EXPORT_TOKEN) {
        Some(rest) if rest.starts_with([' ', '\t']) => rest,
        _ => raw,
    };
    key.trim_matches([' ', '\t'])
}

/// Drop `#` comments from a value while keeping hashes inside quotes.
///
/// The value is cut at every `#`. The first piece is always kept. A piece
/// holding exactly one quote character toggles whether a quotation is open;
/// pieces that open or close a quotation, and pieces in between, are kept.
/// Everything else is comment text.
fn strip_comments(value: &str) -> String {
    if !value.contains('#') {
        return value.to_owned();
    }

    let mut quotes_open = false;
    let mut kept: Vec<&str> = Vec::new();
    for segment in value.split('#') {
        if count_unescaped(segment, '"') == 1 || count_unescaped(segment, '\'') == 1 {
            if quotes_open {
                quotes_open = false;
                kept.push(segment);
            } else {
                quotes_open = true;
            }
        }

        if kept.is_empty() || quotes_open {
            kept.push(segment);
        }
    }

    kept.join("#")
}

/// Unwrap a fully quoted value and expand `\"` and `\n`.
fn unquote(value: &str) -> String {
    if count_unescaped(value, '"') != 2 && count_unescaped(value, '\'') != 2 {
        return value.to_owned();
    }

    trim_quote_edges(value)
        .replace("\\\"", "\"")
        .replace("\\n", "\n")
}

/// Strip quote and space characters from both ends, stopping at a quote
/// that is escaped with a backslash.
fn trim_quote_edges(value: &str) -> &str {
    let is_edge = |ch: char| matches!(ch, '"' | '\'' | ' ');

    let mut trimmed = value.trim_start_matches(is_edge);
    while let Some(ch) = trimmed.chars().next_back() {
        let end = trimmed.len() - ch.len_utf8();
        if !is_edge(ch) || (ch != ' ' && is_preceded_by_odd_backslashes(trimmed.as_bytes(), end)) {
            break;
        }
        trimmed = &trimmed[..end];
    }
    trimmed
}

fn is_preceded_by_odd_backslashes(bytes: &[u8], idx: usize) -> bool {
    let backslashes = bytes[..idx]
        .iter()
        .rev()
        .take_while(|byte| **byte == b'\\')
        .count();
    backslashes % 2 == 1
}

/// Count `quote` characters that are not preceded by a backslash.
fn count_unescaped(text: &str, quote: char) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for ch in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            ch if ch == quote => count += 1,
            _ => {}
        }
    }
    count
}
