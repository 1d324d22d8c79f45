use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-part key identifying a single entry in a multi-key collection.
///
/// Equality and hashing are structural: two keys are equal exactly when both
/// their id parts and their name parts are equal, and the derived `Hash`
/// feeds both parts into the hasher so equal keys always hash equally.
///
/// The parts are private so a key cannot change once it has been used as a
/// map key. Read them through [`CompositeKey::id`] and [`CompositeKey::name`],
/// or take the key apart with [`CompositeKey::into_parts`].
///
/// ```rust
/// use turbo_types::CompositeKey;
///
/// let key = CompositeKey::new(7, "seven");
/// assert_eq!(*key.id(), 7);
/// assert_eq!(key, CompositeKey::from((7, "seven")));
///
/// let (id, name) = key.into_parts();
/// assert_eq!((id, name), (7, "seven"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey<I, N> {
    id: I,
    name: N,
}

impl<I, N> CompositeKey<I, N> {
    /// Create a key from its id and name parts
    pub const fn new(id: I, name: N) -> Self {
        Self { id, name }
    }

    /// The id part of the key
    pub const fn id(&self) -> &I {
        &self.id
    }

    /// The name part of the key
    pub const fn name(&self) -> &N {
        &self.name
    }

    /// Split the key into `(id, name)`
    pub fn into_parts(self) -> (I, N) {
        (self.id, self.name)
    }
}

impl<I, N> From<(I, N)> for CompositeKey<I, N> {
    fn from((id, name): (I, N)) -> Self {
        Self::new(id, name)
    }
}

impl<I, N> From<CompositeKey<I, N>> for (I, N) {
    fn from(key: CompositeKey<I, N>) -> Self {
        key.into_parts()
    }
}

impl<I: fmt::Display, N: fmt::Display> fmt::Display for CompositeKey<I, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.id, self.name)
    }
}
