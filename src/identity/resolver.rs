//! The authoritative, bidirectional identity map.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io::Write;
use std::io::{self};

use crate::identity::IdentityMapping;
use crate::identity::MappingSource;
use crate::identity::Version;

pub mod builder;

pub use builder::Builder;

/// The delimiter between the columns of the mapping table.
const TABLE_DELIMITER: char = '\t';

////////////////////////////////////////////////////////////////////////////////////////
// Diagnostics
////////////////////////////////////////////////////////////////////////////////////////

/// A gene for which coordinate overlap and the cross-reference table name
/// different counterparts.
///
/// The canonical counterpart is the one kept by the [`Resolver`]. Persistent
/// disagreements usually point at genes that were split or merged between
/// releases.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Disagreement {
    /// The identifier in release A.
    id_a: String,

    /// The counterpart found by coordinate overlap.
    coordinate: String,

    /// The counterpart named by the cross-reference table.
    canonical: String,
}

impl Disagreement {
    /// Gets the identifier in release A.
    pub fn id_a(&self) -> &str {
        &self.id_a
    }

    /// Gets the counterpart found by coordinate overlap.
    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }

    /// Gets the counterpart named by the cross-reference table.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl std::fmt::Display for Disagreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: coordinate -> {}, canonical -> {}",
            self.id_a, self.coordinate, self.canonical
        )
    }
}

/// Two claims that could not both be kept without breaking the one-to-one
/// nature of the map (two counterparts for one gene, or two genes for one
/// counterpart).
#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    /// The claim that was kept.
    kept: IdentityMapping,

    /// The claim that was dropped.
    dropped: IdentityMapping,
}

impl Collision {
    /// Gets the claim that was kept.
    pub fn kept(&self) -> &IdentityMapping {
        &self.kept
    }

    /// Gets the claim that was dropped.
    pub fn dropped(&self) -> &IdentityMapping {
        &self.dropped
    }
}

/// How much of release A the identity map covers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CoverageStats {
    /// The number of release A genes known to the resolver.
    total_genes: usize,

    /// Genes resolved through the cross-reference table.
    canonical_covered: usize,

    /// Genes resolved through coordinate overlap alone.
    coordinate_only_covered: usize,

    /// Genes without a counterpart.
    unresolved: usize,
}

impl CoverageStats {
    /// Gets the number of release A genes known to the resolver.
    pub fn total_genes(&self) -> usize {
        self.total_genes
    }

    /// Gets the number of genes resolved through the cross-reference table.
    pub fn canonical_covered(&self) -> usize {
        self.canonical_covered
    }

    /// Gets the number of genes resolved through coordinate overlap alone.
    pub fn coordinate_only_covered(&self) -> usize {
        self.coordinate_only_covered
    }

    /// Gets the number of genes without a counterpart.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Resolver
////////////////////////////////////////////////////////////////////////////////////////

/// The authoritative identity map between releases A and B.
///
/// Every resolved gene has exactly one [`IdentityMapping`], and the map is
/// one-to-one: resolving a gene's counterpart back always yields the gene
/// itself. A [`Resolver`] is read-only once built; use a [`Builder`] to
/// construct one.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    /// The authoritative mappings, keyed by the identifier in release A.
    a_to_b: BTreeMap<String, IdentityMapping>,

    /// The inverse of `a_to_b`.
    b_to_a: BTreeMap<String, String>,

    /// Every release A identifier known to the resolver.
    universe: BTreeSet<String>,

    /// Genes where the two sources named different counterparts.
    disagreements: Vec<Disagreement>,

    /// Claims dropped to keep the map one-to-one.
    collisions: Vec<Collision>,

    /// Genes where both sources named the same counterpart.
    agreements: usize,
}

impl Resolver {
    /// Resolves an identifier from one release into the other.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::identity::IdentityMapping;
    /// use genebridge::identity::Version;
    /// use genebridge::identity::resolver::Builder;
    ///
    /// let resolver = Builder::default()
    ///     .claim(IdentityMapping::canonical("g1", "h1"))
    ///     .build();
    ///
    /// assert_eq!(resolver.resolve("g1", Version::A), Some("h1"));
    /// assert_eq!(resolver.resolve("h1", Version::B), Some("g1"));
    /// assert_eq!(resolver.resolve("h1", Version::A), None);
    /// ```
    pub fn resolve(&self, id: &str, from: Version) -> Option<&str> {
        match from {
            Version::A => self.a_to_b.get(id).map(|mapping| mapping.id_b()),
            Version::B => self.b_to_a.get(id).map(String::as_str),
        }
    }

    /// Gets the authoritative mapping for an identifier in release A.
    pub fn mapping(&self, id_a: &str) -> Option<&IdentityMapping> {
        self.a_to_b.get(id_a)
    }

    /// Gets an iterator over the authoritative mappings, ordered by the
    /// identifier in release A.
    pub fn mappings(&self) -> impl Iterator<Item = &IdentityMapping> {
        self.a_to_b.values()
    }

    /// Gets the number of resolved genes.
    pub fn len(&self) -> usize {
        self.a_to_b.len()
    }

    /// Returns whether no gene was resolved.
    pub fn is_empty(&self) -> bool {
        self.a_to_b.is_empty()
    }

    /// Gets the genes where the two sources named different counterparts.
    pub fn disagreements(&self) -> &[Disagreement] {
        &self.disagreements
    }

    /// Gets the claims dropped to keep the map one-to-one.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Gets the number of genes where both sources named the same
    /// counterpart.
    pub fn agreements(&self) -> usize {
        self.agreements
    }

    /// Computes how much of release A the map covers.
    pub fn coverage_stats(&self) -> CoverageStats {
        let canonical_covered = self
            .a_to_b
            .values()
            .filter(|mapping| mapping.source() == MappingSource::Canonical)
            .count();
        let coordinate_only_covered = self.a_to_b.len() - canonical_covered;
        let total_genes = self.universe.len();

        CoverageStats {
            total_genes,
            canonical_covered,
            coordinate_only_covered,
            unresolved: total_genes.saturating_sub(self.a_to_b.len()),
        }
    }

    /// Writes the map as a two-column, tab-delimited table sorted by the
    /// identifier in release A, optionally preceded by a header row.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::identity::IdentityMapping;
    /// use genebridge::identity::resolver::Builder;
    ///
    /// let resolver = Builder::default()
    ///     .claim(IdentityMapping::canonical("g2", "h2"))
    ///     .claim(IdentityMapping::canonical("g1", "h1"))
    ///     .build();
    ///
    /// let mut buffer = Vec::new();
    /// resolver.write_table(&mut buffer, Some(("id_version_a", "id_version_b")))?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(buffer)?,
    ///     "id_version_a\tid_version_b\ng1\th1\ng2\th2\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_table<W>(&self, mut writer: W, header: Option<(&str, &str)>) -> io::Result<()>
    where
        W: Write,
    {
        if let Some((a, b)) = header {
            writeln!(writer, "{a}{TABLE_DELIMITER}{b}")?;
        }

        for mapping in self.mappings() {
            writeln!(
                writer,
                "{}{TABLE_DELIMITER}{}",
                mapping.id_a(),
                mapping.id_b()
            )?;
        }

        writer.flush()
    }
}
