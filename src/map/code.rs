use std::{fmt, sync::Arc};

/// Canonicalize an administrative-unit code.
///
/// Village codes show up either as 3 digits (`"007"`) or with the
/// sub-district digit still attached (`"1007"`). A 4-character code loses
/// its first character; everything else is returned unchanged, so the
/// function is idempotent on already-short codes.
pub fn normalize_code(code: &str) -> &str {
    let mut chars = code.chars();
    if code.chars().count() == 4 {
        chars.next();
        return chars.as_str();
    }
    code
}

/// Normalized administrative-unit code.
/// Keeps the code text (with leading zeros) but avoids repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdminCode(Arc<str>);

impl AdminCode {
    /// Build a code, normalizing it on the way in.
    pub fn new(raw: &str) -> Self {
        Self(Arc::from(normalize_code(raw)))
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AdminCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdminCode {
    fn from(raw: &str) -> Self { Self::new(raw) }
}
