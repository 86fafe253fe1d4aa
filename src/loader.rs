use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::env::{EnvSink, TargetEnv};
use crate::error::Error;
use crate::line_source::{DEFAULT_SEGMENT_SIZE, LineSource};
use crate::model::{Entry, LoadReport, ParseOutput};
use crate::parser::parse_lines;

const DEFAULT_FILE: &str = ".env";

/// Load `.env` from the current working directory into the process
/// environment.
///
/// # Safety
///
/// Mutates the process environment; see [`TargetEnv::process`].
pub unsafe fn dotenv() -> Result<LoadReport, Error> {
    // SAFETY: forwarded to the caller.
    unsafe { load([DEFAULT_FILE]) }
}

/// Load env files, in order, into the process environment.
///
/// Stops at the first file that cannot be read. Later files overwrite keys
/// set by earlier ones.
///
/// # Safety
///
/// Mutates the process environment; see [`TargetEnv::process`].
pub unsafe fn load<I, P>(paths: I) -> Result<LoadReport, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    // SAFETY: forwarded to the caller.
    let target = unsafe { TargetEnv::process() };
    let mut loader = EnvLoader::new().paths(paths).target(target);
    loader.load()
}

/// Builder-style env file loader.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    paths: Vec<PathBuf>,
    override_existing: bool,
    segment_size: usize,
    target: TargetEnv,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    /// Whether file values replace keys already present in the target.
    /// Defaults to `true`.
    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// Upper bound for a single raw read. Longer lines are still read whole.
    pub fn segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = segment_size;
        self
    }

    pub fn target(mut self, target: TargetEnv) -> Self {
        self.target = target;
        self
    }

    pub fn target_env(&self) -> &TargetEnv {
        &self.target
    }

    pub fn into_target(self) -> TargetEnv {
        self.target
    }

    /// Parse every file without touching any environment.
    ///
    /// Entries come back in file order, then line order, duplicates included.
    pub fn parse_only(&self) -> Result<Vec<Entry>, Error> {
        let mut entries = Vec::new();
        for path in &self.paths {
            entries.extend(self.read_file(path)?.entries);
        }
        Ok(entries)
    }

    /// Resolve the final key/value map the files describe, later values
    /// winning, without touching any environment.
    pub fn read(&self) -> Result<BTreeMap<String, String>, Error> {
        let mut map = BTreeMap::new();
        for entry in self.parse_only()? {
            map.insert(entry.key, entry.value);
        }
        Ok(map)
    }

    /// Load into the configured target.
    pub fn load(&mut self) -> Result<LoadReport, Error> {
        let mut target = std::mem::take(&mut self.target);
        let result = self.load_into(&mut target);
        self.target = target;
        result
    }

    /// Load into a caller-supplied sink.
    ///
    /// Keys present before the call are only protected from the files, not
    /// from each other: with `override_existing(false)` a later file still
    /// replaces what an earlier file set.
    ///
    /// Each file is read completely before any of its entries are applied,
    /// so a file that fails to read leaves the sink as the previous files
    /// left it.
    pub fn load_into<S>(&self, sink: &mut S) -> Result<LoadReport, Error>
    where
        S: EnvSink + ?Sized,
    {
        let mut report = LoadReport::default();
        let mut written = HashSet::new();

        for path in &self.paths {
            let parsed = self.read_file(path)?;
            report.files_read += 1;
            report.ignored += parsed.ignored;
            report.malformed += parsed.errors.len();

            for err in &parsed.errors {
                tracing::warn!(
                    path = %path.display(),
                    line = err.line,
                    kind = %err.kind,
                    "skipping malformed line"
                );
            }

            for entry in parsed.entries {
                if !self.override_existing
                    && !written.contains(&entry.key)
                    && sink.contains_key(&entry.key)
                {
                    tracing::debug!(key = %entry.key, "skipping existing key");
                    report.skipped_existing += 1;
                    continue;
                }

                sink.set_var(&entry.key, &entry.value);
                report.loaded += 1;
                written.insert(entry.key);
            }
        }

        Ok(report)
    }

    fn read_file(&self, path: &Path) -> Result<ParseOutput, Error> {
        let lines = LineSource::open(path, self.segment_size)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| Error::file_access(path, err))?;
        let parsed = parse_lines(lines, Some(path));

        tracing::debug!(
            path = %path.display(),
            entries = parsed.entries.len(),
            ignored = parsed.ignored,
            "read env file"
        );

        Ok(parsed)
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            override_existing: true,
            segment_size: DEFAULT_SEGMENT_SIZE,
            target: TargetEnv::memory(),
        }
    }
}
