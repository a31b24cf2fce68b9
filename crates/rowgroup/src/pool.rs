#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::Arc;

/// Handle to an interned string.
///
/// Two handles from the same [`StrPool`] are equal exactly when the strings
/// they were interned from are equal, so row equality on a string column is
/// a plain id comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sym(u32);

impl Sym {
    /// The reserved missing-value handle. [`StrPool::intern`] never returns
    /// it, so it is distinct from every interned string (the empty string
    /// included).
    pub const MISSING: Sym = Sym(0);

    pub fn is_missing(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

/// Interner handing out dense [`Sym`] ids, one per distinct string, in
/// first-seen order. Id 0 is reserved for [`Sym::MISSING`].
#[derive(Clone, Debug, Default)]
pub struct StrPool {
    // symbols[id - 1] is the text behind Sym(id).
    symbols: Vec<Arc<str>>,
    lookup: HashMap<Arc<str>, Sym>,
}

impl StrPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the same handle for equal strings.
    pub fn intern(&mut self, text: &str) -> Sym {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let shared: Arc<str> = Arc::from(text);
        let sym = Sym(self.symbols.len() as u32 + 1);
        self.symbols.push(shared.clone());
        self.lookup.insert(shared, sym);
        sym
    }

    /// The text behind a handle; `None` for [`Sym::MISSING`].
    pub fn resolve(&self, sym: Sym) -> Option<&str> {
        if sym.is_missing() {
            return None;
        }
        self.symbols.get(sym.0 as usize - 1).map(|s| s.as_ref())
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
