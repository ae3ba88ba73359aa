//! The outcome of a reconciliation.

use crate::de::DeGene;
use crate::reconcile::Correlation;
use crate::reconcile::Polarity;

////////////////////////////////////////////////////////////////////////////////////////
// Paired genes
////////////////////////////////////////////////////////////////////////////////////////

/// Which sides called a paired gene significant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignificanceCall {
    /// Both sides.
    Both,

    /// Only set A.
    OnlyA,

    /// Only set B.
    OnlyB,

    /// Neither side.
    Neither,
}

impl SignificanceCall {
    /// Creates a call from the significance of each side.
    pub fn from_flags(a: bool, b: bool) -> Self {
        match (a, b) {
            (true, true) => SignificanceCall::Both,
            (true, false) => SignificanceCall::OnlyA,
            (false, true) => SignificanceCall::OnlyB,
            (false, false) => SignificanceCall::Neither,
        }
    }

    /// Returns whether exactly one side called the gene significant.
    pub fn is_disagreement(&self) -> bool {
        matches!(self, SignificanceCall::OnlyA | SignificanceCall::OnlyB)
    }
}

impl std::fmt::Display for SignificanceCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignificanceCall::Both => write!(f, "both"),
            SignificanceCall::OnlyA => write!(f, "only A"),
            SignificanceCall::OnlyB => write!(f, "only B"),
            SignificanceCall::Neither => write!(f, "neither"),
        }
    }
}

/// A gene present in both sets after identity resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct PairedGene {
    /// The identifier in release A.
    id_a: String,

    /// The identifier in release B.
    id_b: String,

    /// The raw effect size in set A.
    effect_a: f64,

    /// The raw effect size in set B.
    effect_b: f64,

    /// The significance in set A.
    significance_a: f64,

    /// The significance in set B.
    significance_b: f64,

    /// Which sides called the gene significant.
    call: SignificanceCall,
}

impl PairedGene {
    /// Pairs two DE results.
    pub(crate) fn new(a: &DeGene, b: &DeGene, call: SignificanceCall) -> Self {
        Self {
            id_a: a.gene_id().to_string(),
            id_b: b.gene_id().to_string(),
            effect_a: a.effect_size(),
            effect_b: b.effect_size(),
            significance_a: a.significance(),
            significance_b: b.significance(),
            call,
        }
    }

    /// Gets the identifier in release A.
    pub fn id_a(&self) -> &str {
        &self.id_a
    }

    /// Gets the identifier in release B.
    pub fn id_b(&self) -> &str {
        &self.id_b
    }

    /// Gets the raw effect size in set A.
    pub fn effect_a(&self) -> f64 {
        self.effect_a
    }

    /// Gets the raw effect size in set B.
    pub fn effect_b(&self) -> f64 {
        self.effect_b
    }

    /// Gets the significance in set A.
    pub fn significance_a(&self) -> f64 {
        self.significance_a
    }

    /// Gets the significance in set B.
    pub fn significance_b(&self) -> f64 {
        self.significance_b
    }

    /// Gets which sides called the gene significant.
    pub fn call(&self) -> SignificanceCall {
        self.call
    }

    /// Returns whether both effect sizes point the same way once set B is
    /// optionally negated.
    pub(crate) fn same_direction(&self, flip_b: bool) -> bool {
        let effect_b = if flip_b { -self.effect_b } else { self.effect_b };
        (self.effect_a > 0.0) == (effect_b > 0.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Significant genes without a counterpart
////////////////////////////////////////////////////////////////////////////////////////

/// Why a significant gene is missing from the overlap.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum OnlyReason {
    /// The gene was paired, but its counterpart's adjusted significance is
    /// not below the other side's cutoff.
    ///
    /// This takes precedence when the counterpart fails both cutoffs.
    NotSignificant,

    /// The gene was paired and its counterpart is significant, but its
    /// absolute effect size is below the other side's cutoff.
    EffectTooSmall,

    /// The gene has no entry in the identity map.
    Unmappable,

    /// The gene resolved, but the other set has no row for its counterpart.
    Absent,
}

impl std::fmt::Display for OnlyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnlyReason::NotSignificant => write!(f, "not significant"),
            OnlyReason::EffectTooSmall => write!(f, "effect too small"),
            OnlyReason::Unmappable => write!(f, "unmappable"),
            OnlyReason::Absent => write!(f, "absent"),
        }
    }
}

/// A significant gene of one set that is not in the overlap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OnlyGene {
    /// The identifier within its own release.
    gene_id: String,

    /// Why the gene is not in the overlap.
    reason: OnlyReason,
}

impl OnlyGene {
    /// Creates a new gene outside of the overlap.
    pub(crate) fn new(gene_id: impl Into<String>, reason: OnlyReason) -> Self {
        Self {
            gene_id: gene_id.into(),
            reason,
        }
    }

    /// Gets the identifier within its own release.
    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    /// Gets why the gene is not in the overlap.
    pub fn reason(&self) -> OnlyReason {
        self.reason
    }
}

/// The number of significant genes of one set outside of the overlap, by
/// reason.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OnlyCounts {
    /// Paired, but failing the significance cutoff on the other side.
    not_significant: usize,

    /// Paired, but failing only the effect cutoff on the other side.
    effect_too_small: usize,

    /// Not in the identity map.
    unmappable: usize,

    /// Resolved, but missing from the other set.
    absent: usize,
}

impl OnlyCounts {
    /// Counts genes by reason.
    fn tally<'a>(genes: impl IntoIterator<Item = &'a OnlyGene>) -> Self {
        let mut counts = Self::default();

        for gene in genes {
            match gene.reason() {
                OnlyReason::NotSignificant => counts.not_significant += 1,
                OnlyReason::EffectTooSmall => counts.effect_too_small += 1,
                OnlyReason::Unmappable => counts.unmappable += 1,
                OnlyReason::Absent => counts.absent += 1,
            }
        }

        counts
    }

    /// Gets the number of paired genes whose counterpart fails the
    /// significance cutoff.
    pub fn not_significant(&self) -> usize {
        self.not_significant
    }

    /// Gets the number of paired genes whose counterpart fails only the effect
    /// cutoff.
    pub fn effect_too_small(&self) -> usize {
        self.effect_too_small
    }

    /// Gets the number of unmappable genes.
    pub fn unmappable(&self) -> usize {
        self.unmappable
    }

    /// Gets the number of absent genes.
    pub fn absent(&self) -> usize {
        self.absent
    }

    /// Gets the total number of genes.
    pub fn total(&self) -> usize {
        self.not_significant + self.effect_too_small + self.unmappable + self.absent
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Overlap statistics
////////////////////////////////////////////////////////////////////////////////////////

/// Overlap statistics on the significant subsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapStats {
    /// The number of paired genes significant on both sides.
    overlap: usize,

    /// The overlap as a percentage of the significant genes of set A.
    percent_of_a: Option<f64>,

    /// The overlap as a percentage of the significant genes of set B.
    percent_of_b: Option<f64>,

    /// The number of overlapping genes whose effect sizes share a sign.
    same_direction: usize,
}

impl OverlapStats {
    /// Computes the statistics, optionally negating set B first.
    pub(crate) fn compute(
        pairs: &[PairedGene],
        significant_a: usize,
        significant_b: usize,
        flip_b: bool,
    ) -> Self {
        let both = pairs
            .iter()
            .filter(|pair| pair.call() == SignificanceCall::Both);

        let (overlap, same_direction) = both.fold((0, 0), |(overlap, same), pair| {
            (overlap + 1, same + usize::from(pair.same_direction(flip_b)))
        });

        Self {
            overlap,
            percent_of_a: percent(overlap, significant_a),
            percent_of_b: percent(overlap, significant_b),
            same_direction,
        }
    }

    /// Gets the number of paired genes significant on both sides.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Gets the overlap as a percentage of the significant genes of set A.
    ///
    /// This is `None` when set A has no significant genes.
    pub fn percent_of_a(&self) -> Option<f64> {
        self.percent_of_a
    }

    /// Gets the overlap as a percentage of the significant genes of set B.
    ///
    /// This is `None` when set B has no significant genes.
    pub fn percent_of_b(&self) -> Option<f64> {
        self.percent_of_b
    }

    /// Gets the number of overlapping genes whose effect sizes share a sign.
    pub fn same_direction(&self) -> usize {
        self.same_direction
    }
}

/// Expresses `part` as a percentage of `whole`, if `whole` is non-zero.
fn percent(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

////////////////////////////////////////////////////////////////////////////////////////
// Result
////////////////////////////////////////////////////////////////////////////////////////

/// The outcome of reconciling two DE result sets.
///
/// Built once by the [`Engine`](crate::reconcile::Engine) and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconciliationResult {
    /// The paired genes, ordered by the identifier in release A.
    pub(crate) matched_pairs: Vec<PairedGene>,

    /// Genes of set A with no entry in the identity map.
    pub(crate) unmappable_a: Vec<String>,

    /// Genes of set B with no entry in the identity map.
    pub(crate) unmappable_b: Vec<String>,

    /// Genes of set A whose counterpart has no row in set B.
    pub(crate) absent_a: Vec<String>,

    /// Genes of set B whose counterpart has no row in set A.
    pub(crate) absent_b: Vec<String>,

    /// The correlation of the paired effect sizes.
    pub(crate) correlation: Correlation,

    /// The inferred polarity.
    pub(crate) polarity: Polarity,

    /// Whether set B was negated for the corrected statistics.
    pub(crate) sign_flipped: bool,

    /// The number of significant genes in set A.
    pub(crate) significant_a: usize,

    /// The number of significant genes in set B.
    pub(crate) significant_b: usize,

    /// Overlap statistics on raw effect sizes.
    pub(crate) raw: OverlapStats,

    /// Overlap statistics after the requested correction.
    pub(crate) corrected: Option<OverlapStats>,

    /// Significant genes of set A outside of the overlap.
    pub(crate) a_only: Vec<OnlyGene>,

    /// Significant genes of set B outside of the overlap.
    pub(crate) b_only: Vec<OnlyGene>,
}

impl ReconciliationResult {
    /// Gets the paired genes, ordered by the identifier in release A.
    pub fn matched_pairs(&self) -> &[PairedGene] {
        &self.matched_pairs
    }

    /// Gets the genes of set A with no entry in the identity map.
    pub fn unmappable_a(&self) -> &[String] {
        &self.unmappable_a
    }

    /// Gets the genes of set B with no entry in the identity map.
    pub fn unmappable_b(&self) -> &[String] {
        &self.unmappable_b
    }

    /// Gets the genes of set A whose counterpart has no row in set B.
    pub fn absent_a(&self) -> &[String] {
        &self.absent_a
    }

    /// Gets the genes of set B whose counterpart has no row in set A.
    pub fn absent_b(&self) -> &[String] {
        &self.absent_b
    }

    /// Gets the correlation of the paired effect sizes.
    pub fn correlation(&self) -> &Correlation {
        &self.correlation
    }

    /// Gets the Pearson coefficient, if it is defined.
    pub fn pearson_r(&self) -> Option<f64> {
        self.correlation.coefficient()
    }

    /// Gets the inferred polarity.
    pub fn inferred_polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns whether set B was negated for the corrected statistics.
    pub fn sign_flipped(&self) -> bool {
        self.sign_flipped
    }

    /// Gets the number of significant genes in set A.
    pub fn significant_a(&self) -> usize {
        self.significant_a
    }

    /// Gets the number of significant genes in set B.
    pub fn significant_b(&self) -> usize {
        self.significant_b
    }

    /// Gets the overlap statistics on raw effect sizes.
    pub fn raw(&self) -> &OverlapStats {
        &self.raw
    }

    /// Gets the overlap statistics after sign correction, if a correction was
    /// requested.
    pub fn corrected(&self) -> Option<&OverlapStats> {
        self.corrected.as_ref()
    }

    /// Gets the number of paired genes significant on both sides.
    pub fn overlap_count(&self) -> usize {
        self.raw.overlap()
    }

    /// Gets the significant genes of set A outside of the overlap.
    pub fn a_only(&self) -> &[OnlyGene] {
        &self.a_only
    }

    /// Gets the significant genes of set B outside of the overlap.
    pub fn b_only(&self) -> &[OnlyGene] {
        &self.b_only
    }

    /// Counts the significant genes of set A outside of the overlap.
    pub fn a_only_counts(&self) -> OnlyCounts {
        OnlyCounts::tally(&self.a_only)
    }

    /// Counts the significant genes of set B outside of the overlap.
    pub fn b_only_counts(&self) -> OnlyCounts {
        OnlyCounts::tally(&self.b_only)
    }

    /// Gets the significance call of every paired gene, keyed by the
    /// identifier in release A.
    pub fn per_gene_flags(&self) -> impl Iterator<Item = (&str, SignificanceCall)> {
        self.matched_pairs
            .iter()
            .map(|pair| (pair.id_a(), pair.call()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_call() {
        assert_eq!(SignificanceCall::from_flags(true, true), SignificanceCall::Both);
        assert_eq!(SignificanceCall::from_flags(false, true), SignificanceCall::OnlyB);
        assert!(SignificanceCall::OnlyA.is_disagreement());
        assert!(!SignificanceCall::Neither.is_disagreement());
    }

    #[test]
    fn test_overlap_stats() -> Result<(), Box<dyn std::error::Error>> {
        let pairs = vec![
            PairedGene::new(
                &DeGene::try_new("g1", 2.0, 0.001)?,
                &DeGene::try_new("h1", -1.5, 0.001)?,
                SignificanceCall::Both,
            ),
            PairedGene::new(
                &DeGene::try_new("g2", 3.0, 0.001)?,
                &DeGene::try_new("h2", 2.5, 0.001)?,
                SignificanceCall::Both,
            ),
            PairedGene::new(
                &DeGene::try_new("g3", 3.0, 0.001)?,
                &DeGene::try_new("h3", 0.1, 0.9)?,
                SignificanceCall::OnlyA,
            ),
        ];

        let raw = OverlapStats::compute(&pairs, 4, 2, false);
        assert_eq!(raw.overlap(), 2);
        assert_eq!(raw.percent_of_a(), Some(50.0));
        assert_eq!(raw.percent_of_b(), Some(100.0));
        assert_eq!(raw.same_direction(), 1);

        let flipped = OverlapStats::compute(&pairs, 4, 2, true);
        assert_eq!(flipped.overlap(), 2);
        assert_eq!(flipped.same_direction(), 1);

        let empty = OverlapStats::compute(&[], 0, 0, false);
        assert_eq!(empty.percent_of_a(), None);

        Ok(())
    }

    #[test]
    fn test_only_counts() {
        let genes = [
            OnlyGene::new("g1", OnlyReason::Unmappable),
            OnlyGene::new("g2", OnlyReason::Absent),
            OnlyGene::new("g3", OnlyReason::Absent),
            OnlyGene::new("g4", OnlyReason::EffectTooSmall),
        ];

        let counts = OnlyCounts::tally(&genes);
        assert_eq!(counts.unmappable(), 1);
        assert_eq!(counts.absent(), 2);
        assert_eq!(counts.effect_too_small(), 1);
        assert_eq!(counts.not_significant(), 0);
        assert_eq!(counts.total(), 4);
    }
}
