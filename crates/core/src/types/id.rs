//! Document identifiers for the JSON collection store.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Base-36 digits used for both the random and the time component.
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random component in base-36 characters.
///
/// Twelve characters carry ~62 bits of entropy, which makes collisions
/// between documents created in the same millisecond negligible.
const RANDOM_LEN: usize = 12;

/// A store-assigned document identifier.
///
/// Identifiers combine a high-entropy random component with a monotonic
/// time component (milliseconds since the Unix epoch, base-36 encoded).
/// They are opaque strings to every consumer; only the store generates them.
///
/// ## Examples
///
/// ```
/// use asti_core::DocumentId;
///
/// let a = DocumentId::generate();
/// let b = DocumentId::generate();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let mut rng = rand::rng();
        let mut id = String::with_capacity(RANDOM_LEN + 9);
        for _ in 0..RANDOM_LEN {
            let idx = rng.random_range(0..BASE36.len());
            id.push(char::from(BASE36[idx]));
        }
        id.push_str(&to_base36(unix_millis()));
        Self(id)
    }

    /// Wrap an existing identifier string (e.g. one read back from storage).
    #[must_use]
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// Milliseconds since the Unix epoch, saturating at zero for pre-epoch clocks.
fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Encode a number in base-36 (lowercase).
fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while n > 0 {
        #[allow(clippy::cast_possible_truncation)] // remainder is < 36
        let digit = (n % 36) as usize;
        out.push(BASE36.get(digit).copied().unwrap_or(b'0'));
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
