//! `genebridge` is a crate for reconciling gene identities and differential
//! expression (DE) results across two releases of the same genome annotation.
//!
//! When an organism's annotation is revised, locus tags are renamed, genes are
//! split or merged, and coordinates shift. Two DE analyses run against
//! different releases therefore cannot be compared row by row. This crate
//! provides the pieces to bridge that gap:
//!
//! - Reading the coding features of each release into an
//!   [`annotation::Index`], partitioned by sequence and strand.
//! - Pairing the features of the two releases by coordinate overlap with a
//!   [`matcher::Matcher`].
//! - Loading the annotator's own cross-references (`old_locus_tag`) with
//!   [`xref::CrossReference`].
//! - Arbitrating between both sources to build one authoritative, bidirectional
//!   [`identity::Resolver`].
//! - Loading DE tables ([`de::Loader`]), classifying genes against explicit
//!   [`de::Thresholds`], and reconciling two result sets with a
//!   [`reconcile::Engine`].
//!
//! ## Identity resolution
//!
//! Coordinate matches and cross-references are both claims about which gene
//! in release B corresponds to a gene in release A. Cross-references are
//! authoritative: when both sources disagree, the canonical counterpart wins
//! and the disagreement is kept for inspection.
//!
//! ```
//! use genebridge::annotation::index::Builder as IndexBuilder;
//! use genebridge::identity::Version;
//! use genebridge::identity::resolver::Builder as ResolverBuilder;
//! use genebridge::matcher::Matcher;
//! use genebridge::xref::CrossReference;
//!
//! let a = b"chr1\tsrc\tCDS\t100\t200\t.\t+\t0\tlocus_tag=g1\n\
//! chr1\tsrc\tCDS\t300\t500\t.\t+\t0\tlocus_tag=g2\n";
//! let b = b"chr1\tsrc\tCDS\t120\t210\t.\t+\t0\tlocus_tag=h1;old_locus_tag=g1\n\
//! chr1\tsrc\tCDS\t305\t490\t.\t-\t0\tlocus_tag=h2;old_locus_tag=g2\n";
//!
//! let index_a = IndexBuilder::default().try_build_from(genebridge::Reader::new(&a[..]))?;
//! let index_b = IndexBuilder::default().try_build_from(genebridge::Reader::new(&b[..]))?;
//! let matches = Matcher::default().run(&index_a, &index_b);
//!
//! // The gene on the opposite strand has no coordinate counterpart...
//! assert!(matches.get("g2").is_none());
//!
//! // ...but release B names its predecessor explicitly.
//! let xref = CrossReference::from_annotation(genebridge::Reader::new(&b[..]), "CDS")?;
//!
//! let resolver = ResolverBuilder::default()
//!     .universe(index_a.locus_tags())
//!     .coordinate(&matches)
//!     .canonical(&xref, Version::B)
//!     .build();
//!
//! assert_eq!(resolver.resolve("g1", Version::A), Some("h1"));
//! assert_eq!(resolver.resolve("h2", Version::B), Some("g2"));
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Reconciliation
//!
//! Two independently run DE analyses may define their comparison with
//! inverted roles. The [`reconcile::Engine`] diagnoses this from the
//! correlation of paired effect sizes and reports it as a
//! [`reconcile::Polarity`]. Signs are only ever flipped on explicit request
//! through [`reconcile::Correction`].
//!
//! ```
//! use genebridge::de::Loader;
//! use genebridge::de::Thresholds;
//! use genebridge::identity::IdentityMapping;
//! use genebridge::identity::resolver::Builder;
//! use genebridge::reconcile::Engine;
//! use genebridge::reconcile::Polarity;
//!
//! let a = b"g1\t500\t2.0\t0.1\t20\t0.0001\t0.001\n\
//! g2\t500\t0.1\t0.1\t1\t0.4\t0.5\n";
//! let b = b"h1\t480\t-2.0\t0.1\t-20\t0.0001\t0.001\n\
//! h2\t510\t-0.1\t0.1\t-1\t0.4\t0.5\n";
//!
//! let a = Loader::default().try_load_from(genebridge::Reader::new(&a[..]))?;
//! let b = Loader::default().try_load_from(genebridge::Reader::new(&b[..]))?;
//!
//! let resolver = Builder::default()
//!     .claim(IdentityMapping::canonical("g1", "h1"))
//!     .claim(IdentityMapping::canonical("g2", "h2"))
//!     .build();
//!
//! let thresholds = Thresholds::try_new(1.0, 0.01)?;
//! let result = Engine::default().reconcile(&a, &thresholds, &b, &thresholds, &resolver);
//!
//! assert_eq!(result.overlap_count(), 1);
//! assert_eq!(result.raw().percent_of_a(), Some(100.0));
//! assert_eq!(result.inferred_polarity(), Polarity::Reversed);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod annotation;
pub mod de;
pub mod identity;
pub mod matcher;
pub mod reader;
pub mod reconcile;
pub mod xref;

pub use self::reader::Reader;
