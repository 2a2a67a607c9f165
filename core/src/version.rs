//! Driver API version numbers.
//!
//! [`Version`] is a `(major, minor)` pair ordered lexicographically. The set of
//! versions the API standard actually defines is fixed, which allows answering
//! whether a reported pair is a real version and finding the closest real
//! version at or below an arbitrary pair for capability decisions.

use std::fmt;

/// Every `(major, minor)` pair the API standard defines, in ascending order.
pub const VALID_VERSIONS: &[Version] = &[
    Version::new(1, 0),
    Version::new(1, 1),
    Version::new(1, 2),
    Version::new(1, 3),
    Version::new(1, 4),
    Version::new(1, 5),
    Version::new(2, 0),
    Version::new(2, 1),
    Version::new(3, 0),
    Version::new(3, 1),
    Version::new(3, 2),
    Version::new(3, 3),
    Version::new(4, 0),
    Version::new(4, 1),
    Version::new(4, 2),
    Version::new(4, 3),
    Version::new(4, 4),
    Version::new(4, 5),
    Version::new(4, 6),
];

/// A driver API version.
///
/// The derived ordering compares `major` first, then `minor`.
/// The default value `(0, 0)` is the null version.
///
/// # Example
///
/// ```
/// use glimmer_core::Version;
///
/// assert!(Version::new(4, 5) > Version::new(4, 2));
/// assert!(Version::default().is_null());
/// assert_eq!(Version::new(4, 7).nearest_valid_version(), Version::new(4, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    /// Major version number.
    pub major: i32,
    /// Minor version number.
    pub minor: i32,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }

    /// The null version `(0, 0)`.
    pub const fn null() -> Self {
        Self::new(0, 0)
    }

    /// Returns true for the `(0, 0)` pair.
    pub fn is_null(&self) -> bool {
        self.major == 0 && self.minor == 0
    }

    /// Returns true if the API standard defines this version.
    pub fn is_valid(&self) -> bool {
        VALID_VERSIONS.binary_search(self).is_ok()
    }

    /// The greatest defined version that is less than or equal to `self`.
    ///
    /// Returns the null version if `self` is below every defined version.
    pub fn nearest_valid_version(&self) -> Version {
        self.nearest_valid_in(VALID_VERSIONS)
    }

    /// The greatest version from `valid` that is less than or equal to `self`.
    ///
    /// `valid` does not need to be sorted. Returns the null version if no
    /// candidate qualifies.
    pub fn nearest_valid_in<'a>(&self, valid: impl IntoIterator<Item = &'a Version>) -> Version {
        valid
            .into_iter()
            .filter(|candidate| *candidate <= self)
            .max()
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl From<(i32, i32)> for Version {
    fn from((major, minor): (i32, i32)) -> Self {
        Self::new(major, minor)
    }
}
