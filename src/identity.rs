//! One authoritative gene identity map between two annotation releases.
//!
//! Identity claims come from two independent sources: coordinate overlap (see
//! [`crate::matcher`]) and the annotator's own cross-references (see
//! [`crate::xref`]). The [`Resolver`] arbitrates between them through
//! [`precedence()`], keeping exactly one [`IdentityMapping`] per gene and
//! recording every case where the sources disagree.

pub mod resolver;
pub mod source;

pub use resolver::CoverageStats;
pub use resolver::Resolver;
pub use source::IdentityMapping;
pub use source::MappingSource;
pub use source::precedence;

/// One of the two annotation releases being reconciled.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Version {
    /// Annotation release A (the space results are reported in).
    A,

    /// Annotation release B.
    B,
}

impl Version {
    /// Gets the other release.
    pub fn other(&self) -> Self {
        match self {
            Version::A => Version::B,
            Version::B => Version::A,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::A => write!(f, "A"),
            Version::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "A" => Ok(Version::A),
            "b" | "B" => Ok(Version::B),
            v => Err(format!("{v} is not a valid annotation version (expected `a` or `b`)")),
        }
    }
}
