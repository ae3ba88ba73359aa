//! Gene features parsed from a single annotation release.
//!
//! An annotation stream is a tab-delimited, GFF3-style table: one feature per
//! line with nine columns (`sequence_id`, `source`, `feature_type`, `start`,
//! `end`, `score`, `strand`, `phase`, `attributes`). Only the coding features
//! (by default, `CDS`) that carry a `locus_tag` attribute are turned into
//! [`GenomicInterval`]s, and those intervals are partitioned by sequence and
//! strand within an [`Index`].
//!
//! ```
//! use genebridge::annotation::index::Builder;
//!
//! let data = b"##gff-version 3\n\
//! chr1\tsrc\tCDS\t100\t200\t.\t+\t0\tID=cds-1;locus_tag=g1\n\
//! chr1\tsrc\tgene\t100\t200\t.\t+\t.\tID=gene-1;locus_tag=g1\n\
//! chr1\tsrc\tCDS\t300\t500\t.\t+\t0\tID=cds-2\n";
//!
//! let index = Builder::default().try_build_from(genebridge::Reader::new(&data[..]))?;
//!
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.summary().unparsed(), 1);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attributes;
pub mod index;
pub mod interval;
pub mod record;

pub use index::Index;
pub use interval::GenomicInterval;
pub use record::Record;
