//! A builder for a [`Resolver`].

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::identity::IdentityMapping;
use crate::identity::MappingSource;
use crate::identity::Resolver;
use crate::identity::Version;
use crate::identity::precedence;
use crate::identity::resolver::Collision;
use crate::identity::resolver::Disagreement;
use crate::matcher::Matches;
use crate::xref::CrossReference;

/// A builder for a [`Resolver`].
///
/// Claims from either source may be added in any order; arbitration only
/// happens in [`Builder::build()`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    /// Release A identifiers known to exist, whether or not they are claimed.
    universe: BTreeSet<String>,

    /// Every claim, grouped by the identifier in release A.
    claims: BTreeMap<String, Vec<IdentityMapping>>,
}

impl Builder {
    /// Registers release A identifiers that should count towards coverage even
    /// when nothing claims them.
    pub fn universe<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.universe.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds the coordinate-derived claims of a matching pass.
    ///
    /// Unmatched intervals are registered in the universe.
    pub fn coordinate(mut self, matches: &Matches) -> Self {
        self.universe.extend(matches.unmatched().iter().cloned());

        for mapping in matches.mappings() {
            self = self.claim(mapping);
        }

        self
    }

    /// Adds the claims of a cross-reference table.
    ///
    /// `new` names the release the table's "new" identifiers belong to; the
    /// "old" identifiers belong to the other release.
    pub fn canonical(mut self, xref: &CrossReference, new: Version) -> Self {
        for (id_new, id_old) in xref.pairs() {
            let mapping = match new {
                Version::A => IdentityMapping::canonical(id_new, id_old),
                Version::B => IdentityMapping::canonical(id_old, id_new),
            };

            self = self.claim(mapping);
        }

        self
    }

    /// Adds a single claim.
    pub fn claim(mut self, mapping: IdentityMapping) -> Self {
        self.claims
            .entry(mapping.id_a().to_string())
            .or_default()
            .push(mapping);
        self
    }

    /// Arbitrates the claims into a [`Resolver`].
    ///
    /// For each release A gene, the canonical claim wins over the coordinate
    /// claim; when both exist and name different counterparts, a
    /// [`Disagreement`] is recorded. Afterwards, if several genes claim the same
    /// counterpart, only the claim with the highest [`precedence()`] is kept and
    /// the rest are recorded as [`Collision`]s.
    pub fn build(self) -> Resolver {
        let mut universe = self.universe;
        let mut disagreements = Vec::new();
        let mut collisions = Vec::new();
        let mut agreements = 0;

        let mut by_b = BTreeMap::<String, Vec<IdentityMapping>>::new();

        for (id_a, claims) in self.claims {
            let (canonical, coordinate): (Vec<_>, Vec<_>) = claims
                .into_iter()
                .partition(|mapping| mapping.source() == MappingSource::Canonical);

            let canonical = select(canonical, &mut collisions);
            let coordinate = select(coordinate, &mut collisions);

            let winner = match (canonical, coordinate) {
                (Some(canonical), Some(coordinate)) => {
                    if canonical.id_b() == coordinate.id_b() {
                        agreements += 1;
                    } else {
                        warn!(
                            "identity disagreement for {id_a}: coordinate overlap names {}, \
                             cross-reference names {}; keeping the cross-reference",
                            coordinate.id_b(),
                            canonical.id_b()
                        );

                        disagreements.push(Disagreement {
                            id_a: id_a.clone(),
                            coordinate: coordinate.id_b().to_string(),
                            canonical: canonical.id_b().to_string(),
                        });
                    }

                    canonical
                }
                (Some(mapping), None) | (None, Some(mapping)) => mapping,
                (None, None) => continue,
            };

            by_b.entry(winner.id_b().to_string())
                .or_default()
                .push(winner);
            universe.insert(id_a);
        }

        let mut a_to_b = BTreeMap::new();
        let mut b_to_a = BTreeMap::new();

        for (id_b, group) in by_b {
            if let Some(kept) = select(group, &mut collisions) {
                b_to_a.insert(id_b, kept.id_a().to_string());
                a_to_b.insert(kept.id_a().to_string(), kept);
            }
        }

        let resolver = Resolver {
            a_to_b,
            b_to_a,
            universe,
            disagreements,
            collisions,
            agreements,
        };

        let stats = resolver.coverage_stats();
        info!(
            "identity map: {} genes, {} canonical, {} coordinate-only, {} unresolved, \
             {} disagreements, {} collisions",
            stats.total_genes(),
            stats.canonical_covered(),
            stats.coordinate_only_covered(),
            stats.unresolved(),
            resolver.disagreements.len(),
            resolver.collisions.len()
        );

        resolver
    }
}

/// Picks the claim with the highest [`precedence()`], recording every other
/// distinct claim as a [`Collision`] against it.
fn select(
    mut claims: Vec<IdentityMapping>,
    collisions: &mut Vec<Collision>,
) -> Option<IdentityMapping> {
    claims.sort_by(|x, y| precedence(y, x));

    let mut claims = claims.into_iter();
    let kept = claims.next()?;

    for dropped in claims {
        if dropped.id_a() == kept.id_a() && dropped.id_b() == kept.id_b() {
            continue;
        }

        debug!("dropping identity claim {dropped} in favour of {kept}");
        collisions.push(Collision {
            kept: kept.clone(),
            dropped,
        });
    }

    Some(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(id_a: &str, id_b: &str, confidence: f64) -> IdentityMapping {
        IdentityMapping::new(id_a, id_b, MappingSource::Coordinate, confidence)
    }

    #[test]
    fn test_canonical_precedence_records_disagreement() {
        let resolver = Builder::default()
            .claim(coordinate("g1", "m1", 0.9))
            .claim(IdentityMapping::canonical("g1", "m2"))
            .build();

        assert_eq!(resolver.resolve("g1", Version::A), Some("m2"));
        assert_eq!(resolver.resolve("m2", Version::B), Some("g1"));
        assert_eq!(resolver.resolve("m1", Version::B), None);

        assert_eq!(resolver.disagreements().len(), 1);
        let disagreement = &resolver.disagreements()[0];
        assert_eq!(disagreement.id_a(), "g1");
        assert_eq!(disagreement.coordinate(), "m1");
        assert_eq!(disagreement.canonical(), "m2");

        assert_eq!(
            resolver.mapping("g1").map(|m| m.source()),
            Some(MappingSource::Canonical)
        );
    }

    #[test]
    fn test_agreement_is_not_a_disagreement() {
        let resolver = Builder::default()
            .claim(coordinate("g1", "h1", 0.7))
            .claim(IdentityMapping::canonical("g1", "h1"))
            .build();

        assert!(resolver.disagreements().is_empty());
        assert!(resolver.collisions().is_empty());
        assert_eq!(resolver.agreements(), 1);
        assert_eq!(resolver.coverage_stats().canonical_covered(), 1);
    }

    #[test]
    fn test_coordinate_fills_gaps() {
        let resolver = Builder::default()
            .claim(IdentityMapping::canonical("g1", "h1"))
            .claim(coordinate("g2", "h2", 0.8))
            .universe(["g3"])
            .build();

        let stats = resolver.coverage_stats();
        assert_eq!(stats.total_genes(), 3);
        assert_eq!(stats.canonical_covered(), 1);
        assert_eq!(stats.coordinate_only_covered(), 1);
        assert_eq!(stats.unresolved(), 1);
    }

    #[test]
    fn test_shared_counterpart_keeps_one_gene() {
        let resolver = Builder::default()
            .claim(coordinate("g1", "h1", 0.6))
            .claim(coordinate("g2", "h1", 0.9))
            .build();

        assert_eq!(resolver.resolve("h1", Version::B), Some("g2"));
        assert_eq!(resolver.resolve("g2", Version::A), Some("h1"));
        assert_eq!(resolver.resolve("g1", Version::A), None);

        assert_eq!(resolver.collisions().len(), 1);
        assert_eq!(resolver.collisions()[0].dropped().id_a(), "g1");
        assert_eq!(resolver.coverage_stats().unresolved(), 1);
    }

    #[test]
    fn test_canonical_wins_shared_counterpart() {
        let resolver = Builder::default()
            .claim(coordinate("g1", "h1", 1.0))
            .claim(IdentityMapping::canonical("g2", "h1"))
            .build();

        assert_eq!(resolver.resolve("h1", Version::B), Some("g2"));
        assert_eq!(resolver.resolve("g1", Version::A), None);
    }

    #[test]
    fn test_duplicate_claims_are_not_collisions() {
        let resolver = Builder::default()
            .claim(IdentityMapping::canonical("g1", "h1"))
            .claim(IdentityMapping::canonical("g1", "h1"))
            .build();

        assert!(resolver.collisions().is_empty());
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_canonical_orientation() {
        let xref = CrossReference::from_pairs([("NEW_1", "OLD_1")]);

        let resolver = Builder::default().canonical(&xref, Version::B).build();
        assert_eq!(resolver.resolve("OLD_1", Version::A), Some("NEW_1"));

        let resolver = Builder::default().canonical(&xref, Version::A).build();
        assert_eq!(resolver.resolve("NEW_1", Version::A), Some("OLD_1"));
    }

    #[test]
    fn test_round_trip() {
        let resolver = Builder::default()
            .claim(coordinate("g1", "h1", 0.6))
            .claim(coordinate("g2", "h1", 0.6))
            .claim(coordinate("g3", "h3", 0.7))
            .claim(IdentityMapping::canonical("g3", "h4"))
            .claim(IdentityMapping::canonical("g4", "h3"))
            .build();

        for mapping in resolver.mappings() {
            let id_b = resolver.resolve(mapping.id_a(), Version::A).unwrap();
            assert_eq!(resolver.resolve(id_b, Version::B), Some(mapping.id_a()));
        }

        assert_eq!(resolver.len(), 3);
    }
}
