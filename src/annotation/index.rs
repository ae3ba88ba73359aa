//! An index of coding-feature intervals, partitioned by sequence and strand.

use std::collections::BTreeMap;

use nonempty::NonEmpty;
use omics::coordinate::Strand;

use crate::annotation::GenomicInterval;

pub mod builder;

pub use builder::Builder;

////////////////////////////////////////////////////////////////////////////////////////
// Partition keys
////////////////////////////////////////////////////////////////////////////////////////

/// The sequence and strand shared by every interval within a [`Partition`].
///
/// Keys order by sequence name, then positive before negative strand.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct PartitionKey {
    /// The sequence name.
    sequence_id: String,

    /// The strand.
    strand: Strand,
}

impl PartitionKey {
    /// Creates a new partition key.
    pub fn new(sequence_id: impl Into<String>, strand: Strand) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            strand,
        }
    }

    /// Gets the sequence name.
    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.sequence_id, self.strand)
    }
}

impl From<&GenomicInterval> for PartitionKey {
    fn from(interval: &GenomicInterval) -> Self {
        Self::new(interval.sequence_id(), interval.strand())
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Partitions
////////////////////////////////////////////////////////////////////////////////////////

/// All intervals sharing one sequence and strand, sorted by start position.
///
/// Partitions only exist for sequence/strand combinations that carry at least
/// one interval.
#[derive(Clone, Debug)]
pub struct Partition {
    /// The intervals, sorted by `(start, end, locus_tag)`.
    intervals: NonEmpty<GenomicInterval>,
}

impl Partition {
    /// Creates a partition from a set of intervals.
    ///
    /// Returns [`None`] if `intervals` is empty.
    pub(crate) fn from_vec(mut intervals: Vec<GenomicInterval>) -> Option<Self> {
        intervals.sort_by(|a, b| {
            a.start()
                .cmp(&b.start())
                .then_with(|| a.end().cmp(&b.end()))
                .then_with(|| a.locus_tag().cmp(b.locus_tag()))
        });

        NonEmpty::from_vec(intervals).map(|intervals| Self { intervals })
    }

    /// Gets the intervals within the partition.
    pub fn intervals(&self) -> &NonEmpty<GenomicInterval> {
        &self.intervals
    }

    /// Gets an iterator over the intervals within the partition.
    pub fn iter(&self) -> impl Iterator<Item = &GenomicInterval> {
        self.intervals.iter()
    }

    /// Gets the number of intervals within the partition.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Summary
////////////////////////////////////////////////////////////////////////////////////////

/// Counts gathered while building an [`Index`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Data lines read (excluding blank and comment lines).
    pub(crate) records: usize,

    /// Lines that could not be parsed as a record.
    pub(crate) malformed: usize,

    /// Records of a feature type other than the coding type.
    pub(crate) other_features: usize,

    /// Coding records without a parseable locus tag.
    pub(crate) unparsed: usize,

    /// Coding records folded into an existing interval with the same locus tag.
    pub(crate) merged: usize,

    /// Coding records whose locus tag was already placed on another sequence
    /// or strand.
    pub(crate) conflicting: usize,
}

impl Summary {
    /// Gets the number of data lines read.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Gets the number of lines that could not be parsed as a record.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Gets the number of records of a non-coding feature type.
    pub fn other_features(&self) -> usize {
        self.other_features
    }

    /// Gets the number of coding records dropped for lacking a locus tag.
    pub fn unparsed(&self) -> usize {
        self.unparsed
    }

    /// Gets the number of coding records merged into a multi-segment gene.
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// Gets the number of coding records dropped for a conflicting placement.
    pub fn conflicting(&self) -> usize {
        self.conflicting
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Index
////////////////////////////////////////////////////////////////////////////////////////

/// The coding-feature intervals of one annotation release.
///
/// Generally, you will want to use a [`Builder`] to construct one of these.
#[derive(Clone, Debug, Default)]
pub struct Index {
    /// The partitions, keyed by sequence and strand.
    partitions: BTreeMap<PartitionKey, Partition>,

    /// Counts gathered during construction.
    summary: Summary,
}

impl Index {
    /// Gets the partition for a sequence and strand, if any interval sits
    /// there.
    pub fn partition(&self, key: &PartitionKey) -> Option<&Partition> {
        self.partitions.get(key)
    }

    /// Gets an iterator over the partitions in `(sequence_id, strand)` order.
    pub fn partitions(&self) -> impl Iterator<Item = (&PartitionKey, &Partition)> {
        self.partitions.iter()
    }

    /// Gets an iterator over every interval, partition by partition.
    pub fn intervals(&self) -> impl Iterator<Item = &GenomicInterval> {
        self.partitions.values().flat_map(|partition| partition.iter())
    }

    /// Gets an iterator over every locus tag within the index.
    pub fn locus_tags(&self) -> impl Iterator<Item = &str> {
        self.intervals().map(|interval| interval.locus_tag())
    }

    /// Gets the number of intervals within the index.
    pub fn len(&self) -> usize {
        self.partitions.values().map(Partition::len).sum()
    }

    /// Returns whether the index holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Gets the counts gathered during construction.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_key_ordering() {
        let a = PartitionKey::new("chr1", Strand::Negative);
        let b = PartitionKey::new("chr1", Strand::Positive);
        let c = PartitionKey::new("chr0", Strand::Negative);

        let mut keys = vec![a.clone(), b.clone(), c.clone()];
        keys.sort();

        assert_eq!(keys, vec![c, b, a]);
    }

    #[test]
    fn test_partition_key_display() {
        let key = PartitionKey::new("chr1", Strand::Negative);
        assert_eq!(key.to_string(), "chr1:-");
    }

    #[test]
    fn test_partition_sorts_by_start() -> Result<(), Box<dyn std::error::Error>> {
        let partition = Partition::from_vec(vec![
            GenomicInterval::try_new("chr1", 300, 400, Strand::Positive, "b")?,
            GenomicInterval::try_new("chr1", 100, 400, Strand::Positive, "c")?,
            GenomicInterval::try_new("chr1", 100, 200, Strand::Positive, "a")?,
        ])
        .unwrap();

        let tags = partition.iter().map(|i| i.locus_tag()).collect::<Vec<_>>();
        assert_eq!(tags, vec!["a", "c", "b"]);

        assert!(Partition::from_vec(Vec::new()).is_none());

        Ok(())
    }
}
