//! A builder for an [`Index`].

use std::collections::BTreeMap;
use std::io::BufRead;
use std::io::{self};

use tracing::debug;
use tracing::info;

use crate::annotation::GenomicInterval;
use crate::annotation::Index;
use crate::annotation::Record;
use crate::annotation::index::Partition;
use crate::annotation::index::PartitionKey;
use crate::annotation::index::Summary;
use crate::reader;
use crate::reader::Reader;

/// The default coding feature type.
pub const DEFAULT_FEATURE_TYPE: &str = "CDS";

/// An error related to building an [`Index`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error while reading the annotation stream.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Index`].
#[derive(Clone, Debug)]
pub struct Builder {
    /// The feature type treated as a coding feature.
    feature_type: String,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            feature_type: DEFAULT_FEATURE_TYPE.to_string(),
        }
    }
}

impl Builder {
    /// Sets the feature type treated as a coding feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::annotation::index::Builder;
    ///
    /// let data = b"chr1\tsrc\tgene\t1\t90\t.\t+\t.\tlocus_tag=g1";
    /// let reader = genebridge::Reader::new(&data[..]);
    ///
    /// let index = Builder::default().feature_type("gene").try_build_from(reader)?;
    /// assert_eq!(index.len(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn feature_type(mut self, feature_type: impl Into<String>) -> Self {
        self.feature_type = feature_type.into();
        self
    }

    /// Builds an [`Index`] from an annotation stream.
    ///
    /// Blank lines and `#` comment lines are ignored. Lines that fail to parse
    /// and coding records without a `locus_tag` or a strand are skipped and
    /// counted; only I/O errors abort the build.
    pub fn try_build_from<T>(&self, mut reader: Reader<T>) -> Result<Index>
    where
        T: BufRead,
    {
        let mut accumulator = Accumulator::default();

        for (i, result) in reader.lines().enumerate() {
            let line = match result.map_err(Error::Io)? {
                Ok(line) => line,
                Err(err) => {
                    debug!("skipping undecodable annotation line {}: {err}", i + 1);
                    accumulator.summary.records += 1;
                    accumulator.summary.malformed += 1;
                    continue;
                }
            };

            if reader::is_skippable(&line) {
                continue;
            }

            accumulator.summary.records += 1;

            let record = match line.parse::<Record>() {
                Ok(record) => record,
                Err(err) => {
                    debug!("skipping malformed annotation line {}: {err}", i + 1);
                    accumulator.summary.malformed += 1;
                    continue;
                }
            };

            if record.feature_type() != self.feature_type {
                accumulator.summary.other_features += 1;
                continue;
            }

            match record.into_interval() {
                Some(interval) => accumulator.push(interval),
                None => {
                    debug!(
                        "dropping coding record without a locus tag or strand on line {}",
                        i + 1
                    );
                    accumulator.summary.unparsed += 1;
                }
            }
        }

        let index = accumulator.finish();

        info!(
            "indexed {} coding features across {} partitions ({} unparsed, {} malformed)",
            index.len(),
            index.partitions.len(),
            index.summary.unparsed,
            index.summary.malformed
        );

        Ok(index)
    }

    /// Builds an [`Index`] from already-constructed intervals.
    ///
    /// Intervals sharing a locus tag are merged the same way as records read
    /// from a stream.
    pub fn build_from_intervals(&self, intervals: impl IntoIterator<Item = GenomicInterval>) -> Index {
        let mut accumulator = Accumulator::default();

        for interval in intervals {
            accumulator.summary.records += 1;
            accumulator.push(interval);
        }

        accumulator.finish()
    }
}

/// Intermediate state while an [`Index`] is being built.
#[derive(Debug, Default)]
struct Accumulator {
    /// One interval per locus tag.
    by_locus_tag: BTreeMap<String, GenomicInterval>,

    /// The counts gathered so far.
    summary: Summary,
}

impl Accumulator {
    /// Adds an interval, folding it into an existing one with the same locus
    /// tag when both sit on the same sequence and strand.
    fn push(&mut self, interval: GenomicInterval) {
        match self.by_locus_tag.get_mut(interval.locus_tag()) {
            Some(existing) if existing.is_colocated_with(&interval) => {
                *existing = existing.span(&interval);
                self.summary.merged += 1;
            }
            Some(existing) => {
                debug!(
                    "locus tag {} placed at both {existing} and {interval}; keeping the first",
                    interval.locus_tag()
                );
                self.summary.conflicting += 1;
            }
            None => {
                self.by_locus_tag
                    .insert(interval.locus_tag().to_string(), interval);
            }
        }
    }

    /// Partitions the accumulated intervals into an [`Index`].
    fn finish(self) -> Index {
        let mut grouped = BTreeMap::<PartitionKey, Vec<GenomicInterval>>::new();

        for interval in self.by_locus_tag.into_values() {
            grouped
                .entry(PartitionKey::from(&interval))
                .or_default()
                .push(interval);
        }

        let partitions = grouped
            .into_iter()
            .filter_map(|(key, intervals)| Partition::from_vec(intervals).map(|p| (key, p)))
            .collect();

        Index {
            partitions,
            summary: self.summary,
        }
    }
}
