use std::collections::{BTreeMap, HashMap};

/// Something loaded entries can be written to.
///
/// The loader only ever reads a key to decide whether it already exists and
/// writes keys in file order, so any map-like store works. Pass one to
/// [`EnvLoader::load_into`](crate::EnvLoader::load_into) to keep the process
/// environment untouched.
pub trait EnvSink {
    fn get_var(&self, key: &str) -> Option<String>;

    fn set_var(&mut self, key: &str, value: &str);

    fn contains_key(&self, key: &str) -> bool {
        self.get_var(key).is_some()
    }
}

/// The built-in sink held by [`EnvLoader`](crate::EnvLoader): either the
/// live process environment or a map owned by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEnv {
    kind: TargetKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetKind {
    Process,
    Memory(BTreeMap<String, String>),
}

impl Default for TargetEnv {
    fn default() -> Self {
        Self::memory()
    }
}

impl TargetEnv {
    /// Write through to the process environment.
    ///
    /// # Safety
    ///
    /// Writing the process environment races with any other thread reading
    /// or writing it. Keep every other thread away from the environment
    /// until loads into this target are done.
    pub unsafe fn process() -> Self {
        Self {
            kind: TargetKind::Process,
        }
    }

    /// An empty map; loads leave the process untouched.
    pub fn memory() -> Self {
        Self::from_memory(BTreeMap::new())
    }

    /// A map seeded with `vars`, e.g. to test `override_existing(false)`.
    pub fn from_memory(vars: BTreeMap<String, String>) -> Self {
        Self {
            kind: TargetKind::Memory(vars),
        }
    }

    pub fn is_process(&self) -> bool {
        matches!(self.kind, TargetKind::Process)
    }

    /// Loaded variables, or `None` for the process target.
    pub fn as_memory(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            TargetKind::Memory(vars) => Some(vars),
            TargetKind::Process => None,
        }
    }

    pub fn into_memory(self) -> Option<BTreeMap<String, String>> {
        match self.kind {
            TargetKind::Memory(vars) => Some(vars),
            TargetKind::Process => None,
        }
    }
}

impl EnvSink for TargetEnv {
    fn get_var(&self, key: &str) -> Option<String> {
        match &self.kind {
            TargetKind::Process => {
                std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
            }
            TargetKind::Memory(vars) => vars.get(key).cloned(),
        }
    }

    fn set_var(&mut self, key: &str, value: &str) {
        match &mut self.kind {
            // SAFETY: a process target can only be built through the unsafe
            // `TargetEnv::process`, whose caller guarantees exclusive access.
            TargetKind::Process => unsafe { std::env::set_var(key, value) },
            TargetKind::Memory(vars) => {
                vars.insert(key.to_owned(), value.to_owned());
            }
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        match &self.kind {
            TargetKind::Process => std::env::var_os(key).is_some(),
            TargetKind::Memory(vars) => vars.contains_key(key),
        }
    }
}

impl EnvSink for BTreeMap<String, String> {
    fn get_var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.insert(key.to_owned(), value.to_owned());
    }

    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }
}

impl<S: std::hash::BuildHasher> EnvSink for HashMap<String, String, S> {
    fn get_var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.insert(key.to_owned(), value.to_owned());
    }

    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }
}
