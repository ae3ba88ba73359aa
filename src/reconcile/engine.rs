//! The reconciliation engine.

use tracing::debug;
use tracing::info;

use crate::de::DeSet;
use crate::de::SignificantSet;
use crate::de::Thresholds;
use crate::identity::Resolver;
use crate::identity::Version;
use crate::reconcile::Config;
use crate::reconcile::Correction;
use crate::reconcile::Polarity;
use crate::reconcile::correlation::pearson;
use crate::reconcile::result::OnlyGene;
use crate::reconcile::result::OnlyReason;
use crate::reconcile::result::OverlapStats;
use crate::reconcile::result::PairedGene;
use crate::reconcile::result::ReconciliationResult;
use crate::reconcile::result::SignificanceCall;

/// Reconciles two DE result sets through an identity map.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    /// The configuration.
    config: Config,
}

impl Engine {
    /// Creates a new engine.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reconciles set `a` (in release A identifiers) with set `b` (in release
    /// B identifiers).
    ///
    /// Each set is classified with its own thresholds. An empty intersection
    /// is a valid outcome, reported with an undefined correlation.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::de::DeGene;
    /// use genebridge::de::DeSet;
    /// use genebridge::de::Thresholds;
    /// use genebridge::identity::IdentityMapping;
    /// use genebridge::identity::resolver::Builder;
    /// use genebridge::reconcile::Engine;
    /// use genebridge::reconcile::Polarity;
    ///
    /// let a = DeSet::from_genes([
    ///     DeGene::try_new("g1", 2.0, 0.001)?,
    ///     DeGene::try_new("g2", 0.1, 0.5)?,
    /// ]);
    /// let b = DeSet::from_genes([
    ///     DeGene::try_new("h1", -2.0, 0.001)?,
    ///     DeGene::try_new("h2", -0.1, 0.5)?,
    /// ]);
    ///
    /// let resolver = Builder::default()
    ///     .claim(IdentityMapping::canonical("g1", "h1"))
    ///     .claim(IdentityMapping::canonical("g2", "h2"))
    ///     .build();
    ///
    /// let thresholds = Thresholds::try_new(1.0, 0.01)?;
    /// let result = Engine::default().reconcile(&a, &thresholds, &b, &thresholds, &resolver);
    ///
    /// assert_eq!(result.overlap_count(), 1);
    /// assert_eq!(result.inferred_polarity(), Polarity::Reversed);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reconcile(
        &self,
        a: &DeSet,
        thresholds_a: &Thresholds,
        b: &DeSet,
        thresholds_b: &Thresholds,
        resolver: &Resolver,
    ) -> ReconciliationResult {
        let significant_a = thresholds_a.classify(a);
        let significant_b = thresholds_b.classify(b);

        let mut matched_pairs = Vec::new();
        let mut unmappable_a = Vec::new();
        let mut absent_a = Vec::new();

        for gene in a.iter() {
            match resolver.resolve(gene.gene_id(), Version::A) {
                None => unmappable_a.push(gene.gene_id().to_string()),
                Some(id_b) => match b.get(id_b) {
                    None => absent_a.push(gene.gene_id().to_string()),
                    Some(other) => {
                        let call = SignificanceCall::from_flags(
                            significant_a.contains(gene.gene_id()),
                            significant_b.contains(other.gene_id()),
                        );

                        if call.is_disagreement() {
                            debug!(
                                "{} -> {} is significant in one set only ({call})",
                                gene.gene_id(),
                                other.gene_id()
                            );
                        }

                        matched_pairs.push(PairedGene::new(gene, other, call));
                    }
                },
            }
        }

        let mut unmappable_b = Vec::new();
        let mut absent_b = Vec::new();

        for gene in b.iter() {
            match resolver.resolve(gene.gene_id(), Version::B) {
                None => unmappable_b.push(gene.gene_id().to_string()),
                Some(id_a) if !a.contains(id_a) => absent_b.push(gene.gene_id().to_string()),
                Some(_) => {}
            }
        }

        matched_pairs.sort_by(|x, y| x.id_a().cmp(y.id_a()));
        unmappable_a.sort();
        unmappable_b.sort();
        absent_a.sort();
        absent_b.sort();

        let effects = matched_pairs
            .iter()
            .map(|pair| (pair.effect_a(), pair.effect_b()))
            .collect::<Vec<_>>();

        let correlation = pearson(&effects);
        let polarity = Polarity::infer(&correlation, self.config.polarity_threshold());

        let sign_flipped = match self.config.correction() {
            Correction::None => false,
            Correction::Reverse => true,
            Correction::FollowInferred => polarity == Polarity::Reversed,
        };

        let raw = OverlapStats::compute(
            &matched_pairs,
            significant_a.len(),
            significant_b.len(),
            false,
        );

        let corrected = (self.config.correction() != Correction::None).then(|| {
            OverlapStats::compute(
                &matched_pairs,
                significant_a.len(),
                significant_b.len(),
                sign_flipped,
            )
        });

        let a_only = exclusive(&significant_a, &significant_b, b, resolver, Version::A);
        let b_only = exclusive(&significant_b, &significant_a, a, resolver, Version::B);

        let result = ReconciliationResult {
            matched_pairs,
            unmappable_a,
            unmappable_b,
            absent_a,
            absent_b,
            correlation,
            polarity,
            sign_flipped,
            significant_a: significant_a.len(),
            significant_b: significant_b.len(),
            raw,
            corrected,
            a_only,
            b_only,
        };

        info!(
            "reconciled {} paired genes: overlap {} of {}/{} significant, correlation {}, \
             polarity {}",
            result.matched_pairs.len(),
            result.overlap_count(),
            result.significant_a,
            result.significant_b,
            result.correlation,
            result.polarity
        );

        result
    }
}

/// Tags every significant gene of one side that is missing from the overlap.
///
/// A paired counterpart failing both cutoffs of the other side is reported as
/// [`OnlyReason::NotSignificant`].
fn exclusive(
    own: &SignificantSet,
    other: &SignificantSet,
    other_set: &DeSet,
    resolver: &Resolver,
    from: Version,
) -> Vec<OnlyGene> {
    let thresholds = other.thresholds();

    own.iter()
        .filter_map(|gene_id| {
            let Some(counterpart) = resolver.resolve(gene_id, from) else {
                return Some(OnlyGene::new(gene_id, OnlyReason::Unmappable));
            };

            let reason = match other_set.get(counterpart) {
                None => OnlyReason::Absent,
                Some(_) if other.contains(counterpart) => return None,
                Some(gene) if !thresholds.passes_significance(gene) => OnlyReason::NotSignificant,
                Some(_) => OnlyReason::EffectTooSmall,
            };

            Some(OnlyGene::new(gene_id, reason))
        })
        .collect()
}
