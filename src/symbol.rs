//! Name pools for atoms and user-visible variable names.
//!
//! Both pools intern strings into dense integer handles so that equality
//! and hashing are single-word operations. The pools are process-wide:
//! terms carry handles, not strings, and resolve them on demand (display,
//! character-wise atom decomposition).

use lasso::{Spur, ThreadedRodeo};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Interned handle for an atom or variable name.
pub type NameId = Spur;

/// Prefix reserved for engine-generated variables. User variables whose
/// names start with this prefix are refused at construction time.
pub const FRESH_PREFIX: &str = "_AUTO_";

/// Thread-safe interning pool.
///
/// Guarantees:
/// - Same string always produces the same NameId
/// - Different strings always produce different NameIds
/// - A NameId resolves back to the original string
///
/// Readers never block each other; inserting a new name serializes writers.
pub struct NamePool {
    rodeo: ThreadedRodeo,
}

impl NamePool {
    fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Intern a name, returning its handle. Idempotent.
    pub fn intern(&self, name: &str) -> NameId {
        self.rodeo.get_or_intern(name)
    }

    /// Resolve a handle back to its string.
    ///
    /// Handles only originate from `intern` on the same process-wide pool,
    /// so resolution cannot miss.
    pub fn name_of(&self, id: NameId) -> &str {
        self.rodeo.resolve(&id)
    }

    /// Get the handle for a name if it was interned, without interning.
    pub fn get(&self, name: &str) -> Option<NameId> {
        self.rodeo.get(name)
    }

    /// Check whether a name has been interned.
    pub fn contains(&self, name: &str) -> bool {
        self.rodeo.contains(name)
    }
}

static ATOMS: OnceLock<NamePool> = OnceLock::new();
static VAR_NAMES: OnceLock<NamePool> = OnceLock::new();
static NEXT_FRESH: AtomicU64 = AtomicU64::new(0);

/// The process-wide atom name pool.
pub fn atoms() -> &'static NamePool {
    ATOMS.get_or_init(NamePool::new)
}

/// The process-wide variable name pool.
pub fn var_names() -> &'static NamePool {
    VAR_NAMES.get_or_init(NamePool::new)
}

/// Generate the name of a fresh global variable.
///
/// Successive calls see strictly increasing, non-repeating counters, so
/// every generated name is distinct from every other and - thanks to the
/// reserved prefix - from every user-supplied name.
pub fn fresh_name() -> NameId {
    let n = NEXT_FRESH.fetch_add(1, Ordering::Relaxed);
    var_names().intern(&format!("{FRESH_PREFIX}{n}"))
}
