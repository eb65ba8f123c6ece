//! Non-fatal diagnostics.
//!
//! Recoverable anomalies (an unknown verb, a non-sequence collection) never
//! abort a call. They are recorded in a [`Diagnostics`] list returned next to
//! the result and logged at `warn` level as they occur.

use std::fmt;

/// A recoverable anomaly noticed while shaping a request or a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A method string did not name a canonical verb; GET was used instead.
    UnknownVerb {
        /// The method string as supplied.
        method: String,
    },
    /// A collection was built from a value that is not a sequence.
    NonSequenceCollection {
        /// The supplied value as JSON text.
        found: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVerb { method } => {
                write!(f, "Invalid method '{method}', falling back to GET")
            }
            Self::NonSequenceCollection { found } => {
                write!(f, "Collection models should be a sequence, got {found}")
            }
        }
    }
}

/// An ordered list of diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a diagnostic and logs it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the recorded diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Appends every diagnostic from `other`, without logging them again.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Consumes the list, returning the diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
