//! Canonical cross-references between two annotation releases.
//!
//! When an annotator tracks gene continuity between releases, each gene of
//! the new release names its identifier in the old release (`old_locus_tag`).
//! This module reads those statements literally: there is no inference, and a
//! gene without a cross-reference makes no claim at all (it is _not_ a claim
//! that the gene has no counterpart).
//!
//! Two layouts are supported:
//!
//! - [`CrossReference::from_feature_table()`] reads an NCBI-style
//!   `*_feature_table.txt`: a tab-delimited table with a header row naming at
//!   least the `feature`, `locus_tag`, and `attributes` columns.
//! - [`CrossReference::from_annotation()`] reads the `old_locus_tag` attribute
//!   of an annotation stream (see [`crate::annotation`]).

use std::collections::BTreeMap;
use std::io::BufRead;
use std::io::{self};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tracing::info;

use crate::annotation::Record;
use crate::reader;
use crate::reader::Reader;

/// The column delimiter of a feature table.
const DELIMITER: char = '\t';

/// The feature-type column of a feature table.
pub const FEATURE_COLUMN: &str = "feature";

/// The locus tag column of a feature table.
pub const LOCUS_TAG_COLUMN: &str = "locus_tag";

/// The attributes column of a feature table.
pub const ATTRIBUTES_COLUMN: &str = "attributes";

/// The feature type carrying cross-references.
pub const DEFAULT_FEATURE_TYPE: &str = "gene";

/// Matches an `old_locus_tag=<value>` entry within a feature table's
/// attributes column.
static OLD_LOCUS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;,\s])old_locus_tag=([^;,\s]+)").expect("regex to compile")
});

/// An error related to loading a [`CrossReference`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// The feature table had no header row.
    MissingHeader,

    /// The header row did not name a required column.
    MissingColumn(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::MissingHeader => write!(f, "the feature table has no header row"),
            Error::MissingColumn(column) => {
                write!(f, "the feature table header has no `{column}` column")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Counts gathered while loading a [`CrossReference`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Data rows read.
    rows: usize,

    /// Rows of the cross-referenced feature type.
    genes: usize,

    /// Genes carrying a cross-reference.
    with_reference: usize,

    /// Genes without a cross-reference.
    without_reference: usize,

    /// Rows that could not be parsed.
    malformed: usize,

    /// Rows of the cross-referenced feature type without a locus tag.
    skipped: usize,

    /// Genes whose identifier had already been seen.
    duplicates: usize,
}

impl Summary {
    /// Gets the number of data rows read.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Gets the number of rows of the cross-referenced feature type.
    pub fn genes(&self) -> usize {
        self.genes
    }

    /// Gets the number of genes carrying a cross-reference.
    pub fn with_reference(&self) -> usize {
        self.with_reference
    }

    /// Gets the number of genes without a cross-reference.
    pub fn without_reference(&self) -> usize {
        self.without_reference
    }

    /// Gets the number of rows that could not be parsed.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Gets the number of rows of the cross-referenced feature type that were
    /// skipped for lacking a locus tag.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Gets the number of repeated gene identifiers (the first one is kept).
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Identifier equivalences stated by the annotator, from the new release to
/// the old one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrossReference {
    /// The old identifier of each new identifier.
    new_to_old: BTreeMap<String, String>,

    /// Counts gathered while loading.
    summary: Summary,
}

impl CrossReference {
    /// Creates a cross-reference from `(new, old)` identifier pairs.
    ///
    /// A repeated new identifier keeps its first old identifier.
    pub fn from_pairs<I, N, O>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, O)>,
        N: Into<String>,
        O: Into<String>,
    {
        let mut xref = Self::default();

        for (new, old) in pairs {
            xref.summary.rows += 1;
            xref.summary.genes += 1;
            xref.insert(new.into(), old.into());
        }

        xref
    }

    /// Loads a cross-reference from an NCBI-style feature table.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::xref::CrossReference;
    ///
    /// let data = b"# feature\tclass\tlocus_tag\tattributes\n\
    /// gene\tprotein_coding\tB9J08_00001\told_locus_tag=B9J08_000001\n\
    /// CDS\twith_protein\tB9J08_00001\t\n\
    /// gene\tprotein_coding\tB9J08_00002\t\n";
    ///
    /// let xref = CrossReference::from_feature_table(genebridge::Reader::new(&data[..]))?;
    ///
    /// assert_eq!(xref.get("B9J08_00001"), Some("B9J08_000001"));
    /// assert_eq!(xref.get("B9J08_00002"), None);
    /// assert_eq!(xref.summary().without_reference(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_feature_table<T>(mut reader: Reader<T>) -> Result<Self>
    where
        T: BufRead,
    {
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => match line.map_err(Error::Io)? {
                    Ok(line) if line.trim().is_empty() => continue,
                    Ok(line) => break line,
                    Err(_) => return Err(Error::MissingHeader),
                },
                None => return Err(Error::MissingHeader),
            }
        };

        let columns = header
            .trim_start_matches('#')
            .split(DELIMITER)
            .map(str::trim)
            .collect::<Vec<_>>();

        let position = |name: &'static str| {
            columns
                .iter()
                .position(|column| *column == name)
                .ok_or(Error::MissingColumn(name))
        };

        let feature = position(FEATURE_COLUMN)?;
        let locus_tag = position(LOCUS_TAG_COLUMN)?;
        let attributes = position(ATTRIBUTES_COLUMN)?;

        let mut xref = Self::default();

        for (i, line) in lines.enumerate() {
            let line = match line.map_err(Error::Io)? {
                Ok(line) => line,
                Err(err) => {
                    debug!("skipping undecodable feature table row {}: {err}", i + 2);
                    xref.summary.rows += 1;
                    xref.summary.malformed += 1;
                    continue;
                }
            };

            if reader::is_skippable(&line) {
                continue;
            }

            xref.summary.rows += 1;

            let fields = line.split(DELIMITER).collect::<Vec<_>>();

            // Trailing empty columns are sometimes trimmed by upstream tools.
            let (Some(kind), Some(id_new)) = (fields.get(feature), fields.get(locus_tag)) else {
                debug!("skipping malformed feature table row {}", i + 2);
                xref.summary.malformed += 1;
                continue;
            };

            if kind.trim() != DEFAULT_FEATURE_TYPE {
                continue;
            }

            let id_new = id_new.trim();
            if id_new.is_empty() {
                debug!("skipping feature table row {} without a locus tag", i + 2);
                xref.summary.skipped += 1;
                continue;
            }

            xref.summary.genes += 1;

            let id_old = fields
                .get(attributes)
                .and_then(|raw| OLD_LOCUS_TAG.captures(raw))
                .and_then(|captures| captures.get(1))
                .map(|value| value.as_str().to_string());

            match id_old {
                Some(id_old) => xref.insert(id_new.to_string(), id_old),
                None => xref.summary.without_reference += 1,
            }
        }

        info!(
            "cross-reference table: {} of {} genes carry an old locus tag ({} without a locus tag)",
            xref.summary.with_reference, xref.summary.genes, xref.summary.skipped
        );

        Ok(xref)
    }

    /// Loads a cross-reference from the `old_locus_tag` attributes of an
    /// annotation stream, considering only records of `feature_type`.
    pub fn from_annotation<T>(mut reader: Reader<T>, feature_type: &str) -> Result<Self>
    where
        T: BufRead,
    {
        let mut xref = Self::default();

        for (i, line) in reader.lines().enumerate() {
            let line = match line.map_err(Error::Io)? {
                Ok(line) => line,
                Err(err) => {
                    debug!("skipping undecodable annotation line {}: {err}", i + 1);
                    xref.summary.rows += 1;
                    xref.summary.malformed += 1;
                    continue;
                }
            };

            if reader::is_skippable(&line) {
                continue;
            }

            xref.summary.rows += 1;

            let record = match line.parse::<Record>() {
                Ok(record) => record,
                Err(err) => {
                    debug!("skipping malformed annotation line {}: {err}", i + 1);
                    xref.summary.malformed += 1;
                    continue;
                }
            };

            if record.feature_type() != feature_type {
                continue;
            }

            let Some(id_new) = record.locus_tag() else {
                debug!("skipping annotation line {} without a locus tag", i + 1);
                xref.summary.skipped += 1;
                continue;
            };

            xref.summary.genes += 1;

            match record.old_locus_tag() {
                Some(id_old) => xref.insert(id_new.to_string(), id_old.to_string()),
                None => xref.summary.without_reference += 1,
            }
        }

        info!(
            "annotation cross-references: {} of {} genes carry an old locus tag \
             ({} without a locus tag)",
            xref.summary.with_reference, xref.summary.genes, xref.summary.skipped
        );

        Ok(xref)
    }

    /// Gets the old identifier stated for a new identifier.
    pub fn get(&self, id_new: &str) -> Option<&str> {
        self.new_to_old.get(id_new).map(String::as_str)
    }

    /// Gets an iterator over the `(new, old)` pairs, ordered by the new
    /// identifier.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.new_to_old
            .iter()
            .map(|(new, old)| (new.as_str(), old.as_str()))
    }

    /// Gets the number of cross-referenced genes.
    pub fn len(&self) -> usize {
        self.new_to_old.len()
    }

    /// Returns whether no gene is cross-referenced.
    pub fn is_empty(&self) -> bool {
        self.new_to_old.is_empty()
    }

    /// Gets the counts gathered while loading.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Records a `(new, old)` pair unless the new identifier was already seen.
    fn insert(&mut self, id_new: String, id_old: String) {
        if self.new_to_old.contains_key(&id_new) {
            debug!("ignoring repeated cross-reference for {id_new}");
            self.summary.duplicates += 1;
            return;
        }

        self.summary.with_reference += 1;
        self.new_to_old.insert(id_new, id_old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURE_TABLE: &[u8] = b"# feature\tclass\tassembly\tassembly_unit\tseq_type\tchromosome\tgenomic_accession\tstart\tend\tstrand\tproduct_accession\tnon-redundant_refseq\trelated_accession\tname\tsymbol\tGeneID\tlocus_tag\tfeature_interval_length\tproduct_length\tattributes\n\
        gene\tprotein_coding\tGCA_002759435.3\tPrimary Assembly\tchromosome\t\tCP043531.1\t100\t200\t+\t\t\t\t\t\t\tB9J08_00001\t101\t\told_locus_tag=B9J08_000001\n\
        CDS\twith_protein\tGCA_002759435.3\tPrimary Assembly\tchromosome\t\tCP043531.1\t100\t200\t+\tPSN00001.1\t\t\thypothetical protein\t\t\tB9J08_00001\t101\t33\t\n\
        gene\tprotein_coding\tGCA_002759435.3\tPrimary Assembly\tchromosome\t\tCP043531.1\t300\t500\t-\t\t\t\t\t\t\tB9J08_00002\t201\t\tpartial;old_locus_tag=B9J08_000002,B9J08_000003\n\
        gene\tprotein_coding\tGCA_002759435.3\tPrimary Assembly\tchromosome\t\tCP043531.1\t600\t700\t+\t\t\t\t\t\t\tB9J08_00003\t101\t\t\n\
        gene\tprotein_coding\tGCA_002759435.3\tPrimary Assembly\tchromosome\t\tCP043531.1\t600\t700\t+\t\t\t\t\t\t\tB9J08_00002\t101\t\told_locus_tag=B9J08_999999\n\
        gene\ttruncated\n";

    #[test]
    fn test_feature_table() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let xref = CrossReference::from_feature_table(Reader::new(FEATURE_TABLE))?;

        assert_eq!(xref.len(), 2);
        assert_eq!(xref.get("B9J08_00001"), Some("B9J08_000001"));
        assert_eq!(xref.get("B9J08_00002"), Some("B9J08_000002"));
        assert_eq!(xref.get("B9J08_00003"), None);

        let summary = xref.summary();
        assert_eq!(summary.rows(), 6);
        assert_eq!(summary.genes(), 4);
        assert_eq!(summary.with_reference(), 2);
        assert_eq!(summary.without_reference(), 1);
        assert_eq!(summary.duplicates(), 1);
        assert_eq!(summary.malformed(), 1);

        Ok(())
    }

    #[test]
    fn test_missing_header() {
        let err = CrossReference::from_feature_table(Reader::new(&b"\n\n"[..])).unwrap_err();
        assert!(matches!(err, Error::MissingHeader));
    }

    #[test]
    fn test_missing_column() {
        let data = b"# feature\tclass\tattributes\ngene\tprotein_coding\t\n";
        let err = CrossReference::from_feature_table(Reader::new(&data[..])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the feature table header has no `locus_tag` column"
        );
    }

    #[test]
    fn test_from_annotation() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"##gff-version 3\n\
            chr1\tGenbank\tgene\t100\t200\t.\t+\t.\tID=gene-1;locus_tag=NEW_1;old_locus_tag=OLD_1\n\
            chr1\tGenbank\tCDS\t100\t200\t.\t+\t0\tID=cds-1;locus_tag=NEW_1;old_locus_tag=OLD_X\n\
            chr1\tGenbank\tgene\t300\t400\t.\t+\t.\tID=gene-2;locus_tag=NEW_2\n\
            chr1\tGenbank\tgene\t450\t520\t.\t.\t.\tID=gene-3;locus_tag=NEW_3;old_locus_tag=OLD_3\n\
            chr1\tGenbank\tgene\t600\t700\t.\t+\t.\tID=gene-4;gene_biotype=tRNA\n\
            chr1\tGenbank\tgene\t300\t400\n";

        let xref = CrossReference::from_annotation(Reader::new(&data[..]), "gene")?;

        assert_eq!(
            xref.pairs().collect::<Vec<_>>(),
            vec![("NEW_1", "OLD_1"), ("NEW_3", "OLD_3")]
        );

        let summary = xref.summary();
        assert_eq!(summary.rows(), 6);
        assert_eq!(summary.genes(), 3);
        assert_eq!(summary.without_reference(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.malformed(), 1);

        Ok(())
    }

    #[test]
    fn test_row_without_locus_tag() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"#feature\tlocus_tag\tattributes\n\
            gene\t\told_locus_tag=OLD_1\n\
            gene\tNEW_2\told_locus_tag=OLD_2\n\
            \xffgene\tNEW_3\t\n";

        let xref = CrossReference::from_feature_table(Reader::new(&data[..]))?;

        assert_eq!(xref.pairs().collect::<Vec<_>>(), vec![("NEW_2", "OLD_2")]);

        let summary = xref.summary();
        assert_eq!(summary.rows(), 3);
        assert_eq!(summary.genes(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.malformed(), 1);

        Ok(())
    }

    #[test]
    fn test_from_pairs_keeps_first() {
        let xref = CrossReference::from_pairs([("n1", "o1"), ("n1", "o2"), ("n2", "o1")]);
        assert_eq!(xref.get("n1"), Some("o1"));
        assert_eq!(xref.get("n2"), Some("o1"));
        assert_eq!(xref.summary().duplicates(), 1);
    }
}
