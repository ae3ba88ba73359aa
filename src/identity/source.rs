//! Identity claims and the precedence between them.

use std::cmp::Ordering;

/// Where an identity claim came from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MappingSource {
    /// Inferred from coordinate overlap.
    Coordinate,

    /// Stated by the annotator's own cross-reference table.
    Canonical,
}

impl MappingSource {
    /// The rank of the source within [`precedence()`] (higher wins).
    fn rank(&self) -> u8 {
        match self {
            MappingSource::Coordinate => 0,
            MappingSource::Canonical => 1,
        }
    }
}

impl std::fmt::Display for MappingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingSource::Coordinate => write!(f, "coordinate"),
            MappingSource::Canonical => write!(f, "canonical"),
        }
    }
}

/// A claim that gene `id_a` in release A is gene `id_b` in release B.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityMapping {
    /// The identifier in release A.
    id_a: String,

    /// The identifier in release B.
    id_b: String,

    /// The source of the claim.
    source: MappingSource,

    /// The confidence of the claim within `[0, 1]`.
    confidence: f64,
}

impl IdentityMapping {
    /// Creates a new identity mapping.
    ///
    /// The confidence is clamped to `[0, 1]` (non-finite values become `0`).
    pub fn new(
        id_a: impl Into<String>,
        id_b: impl Into<String>,
        source: MappingSource,
        confidence: f64,
    ) -> Self {
        let confidence = match confidence.is_finite() {
            true => confidence.clamp(0.0, 1.0),
            false => 0.0,
        };

        Self {
            id_a: id_a.into(),
            id_b: id_b.into(),
            source,
            confidence,
        }
    }

    /// Creates a canonical mapping (always at full confidence).
    pub fn canonical(id_a: impl Into<String>, id_b: impl Into<String>) -> Self {
        Self::new(id_a, id_b, MappingSource::Canonical, 1.0)
    }

    /// Gets the identifier in release A.
    pub fn id_a(&self) -> &str {
        &self.id_a
    }

    /// Gets the identifier in release B.
    pub fn id_b(&self) -> &str {
        &self.id_b
    }

    /// Gets the source of the claim.
    pub fn source(&self) -> MappingSource {
        self.source
    }

    /// Gets the confidence of the claim.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl std::fmt::Display for IdentityMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {:.3})",
            self.id_a, self.id_b, self.source, self.confidence
        )
    }
}

/// Orders two competing identity claims.
///
/// [`Ordering::Greater`] means `a` takes precedence over `b`. Canonical claims
/// always beat coordinate claims. Within a source, the higher confidence wins,
/// then the lexicographically smaller `id_a`, then the smaller `id_b`, so the
/// order is total and deterministic.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
///
/// use genebridge::identity::IdentityMapping;
/// use genebridge::identity::MappingSource;
/// use genebridge::identity::precedence;
///
/// let coordinate = IdentityMapping::new("g1", "h1", MappingSource::Coordinate, 1.0);
/// let canonical = IdentityMapping::canonical("g1", "h2");
///
/// assert_eq!(precedence(&canonical, &coordinate), Ordering::Greater);
/// ```
pub fn precedence(a: &IdentityMapping, b: &IdentityMapping) -> Ordering {
    a.source
        .rank()
        .cmp(&b.source.rank())
        .then_with(|| a.confidence.total_cmp(&b.confidence))
        .then_with(|| b.id_a.cmp(&a.id_a))
        .then_with(|| b.id_b.cmp(&a.id_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_beats_any_coordinate() {
        let coordinate = IdentityMapping::new("g1", "h1", MappingSource::Coordinate, 1.0);
        let canonical = IdentityMapping::new("g1", "h2", MappingSource::Canonical, 0.0);

        assert_eq!(precedence(&canonical, &coordinate), Ordering::Greater);
        assert_eq!(precedence(&coordinate, &canonical), Ordering::Less);
    }

    #[test]
    fn test_confidence_then_identifiers() {
        let strong = IdentityMapping::new("g2", "h1", MappingSource::Coordinate, 0.9);
        let weak = IdentityMapping::new("g1", "h1", MappingSource::Coordinate, 0.6);
        assert_eq!(precedence(&strong, &weak), Ordering::Greater);

        let first = IdentityMapping::new("g1", "h1", MappingSource::Coordinate, 0.6);
        let second = IdentityMapping::new("g2", "h1", MappingSource::Coordinate, 0.6);
        assert_eq!(precedence(&first, &second), Ordering::Greater);
        assert_eq!(precedence(&first, &first.clone()), Ordering::Equal);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mapping = IdentityMapping::new("g", "h", MappingSource::Coordinate, 1.5);
        assert_eq!(mapping.confidence(), 1.0);

        let mapping = IdentityMapping::new("g", "h", MappingSource::Coordinate, f64::NAN);
        assert_eq!(mapping.confidence(), 0.0);
    }

    #[test]
    fn test_display() {
        let mapping = IdentityMapping::canonical("g1", "h1");
        assert_eq!(mapping.to_string(), "g1 -> h1 (canonical, 1.000)");
    }
}
