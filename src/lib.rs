//! Load `.env`-style variable files.
//!
//! Each line is `KEY=VALUE` or `KEY: VALUE`, optionally prefixed by `export`.
//! Blank lines and `#` comments are skipped, trailing comments are stripped
//! unless the `#` sits inside quotes, and fully quoted values are unwrapped
//! with `\"` and `\n` expanded. Malformed lines are skipped; a file that
//! cannot be read aborts the load.
//!
//! [`EnvLoader::load_into`] writes into any [`EnvSink`] and leaves the process
//! alone. [`load`] and [`dotenv`] write the process environment and are
//! `unsafe`, because callers must guarantee no concurrent process-environment
//! access.

mod env;
mod error;
mod line_source;
mod loader;
mod model;
mod parser;

pub use env::{EnvSink, TargetEnv};
pub use error::{Error, ParseError, ParseErrorKind};
pub use line_source::{DEFAULT_SEGMENT_SIZE, LineSource, MIN_SEGMENT_SIZE, Segment, SegmentReader};
pub use loader::{EnvLoader, dotenv, load};
pub use model::{Entry, LoadReport, ParseOutput};
pub use parser::{is_ignored_line, parse_line, parse_reader, parse_str};
