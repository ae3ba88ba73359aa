//! Loading a whole DE result table.

use std::collections::HashMap;
use std::io::BufRead;
use std::io::{self};

use tracing::debug;
use tracing::info;

use crate::de::Columns;
use crate::de::DeGene;
use crate::reader;
use crate::reader::Reader;

/// An error related to loading a [`DeSet`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
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

/// Counts gathered while loading a [`DeSet`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Data rows read.
    rows: usize,

    /// Rows dropped for a missing or non-numeric field.
    malformed: usize,

    /// Rows dropped because their gene identifier was already loaded.
    duplicates: usize,
}

impl Summary {
    /// Gets the number of data rows read.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Gets the number of rows dropped for a missing or non-numeric field.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Gets the number of rows dropped as repeated gene identifiers.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// The results of one differential-expression analysis.
///
/// A [`DeSet`] is never mutated after loading.
#[derive(Clone, Debug, Default)]
pub struct DeSet {
    /// The genes, in table order.
    genes: Vec<DeGene>,

    /// The position of each gene within `genes`.
    positions: HashMap<String, usize>,

    /// Counts gathered while loading.
    summary: Summary,
}

impl DeSet {
    /// Creates a set from already-constructed gene results.
    ///
    /// A repeated gene identifier keeps its first result.
    pub fn from_genes(genes: impl IntoIterator<Item = DeGene>) -> Self {
        let mut set = Self::default();

        for gene in genes {
            set.summary.rows += 1;
            set.push(gene);
        }

        set
    }

    /// Gets the result for a gene.
    pub fn get(&self, gene_id: &str) -> Option<&DeGene> {
        self.positions.get(gene_id).map(|i| &self.genes[*i])
    }

    /// Returns whether the set holds a result for a gene.
    pub fn contains(&self, gene_id: &str) -> bool {
        self.positions.contains_key(gene_id)
    }

    /// Gets an iterator over the genes in table order.
    pub fn iter(&self) -> impl Iterator<Item = &DeGene> {
        self.genes.iter()
    }

    /// Gets the number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns whether the set holds no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gets the counts gathered while loading.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Adds a gene unless its identifier was already seen.
    fn push(&mut self, gene: DeGene) {
        if self.positions.contains_key(gene.gene_id()) {
            debug!("ignoring repeated DE result for {}", gene.gene_id());
            self.summary.duplicates += 1;
            return;
        }

        self.positions
            .insert(gene.gene_id().to_string(), self.genes.len());
        self.genes.push(gene);
    }
}

/// A loader for headerless DE result tables.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    /// The column layout.
    columns: Columns,
}

impl Loader {
    /// Creates a loader for a given column layout.
    pub fn new(columns: Columns) -> Self {
        Self { columns }
    }

    /// Gets the column layout.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Loads a DE result table.
    ///
    /// Rows with a missing or non-numeric effect size or significance (for
    /// example, `NA` values) are dropped and counted rather than aborting the
    /// load. Blank lines and `#` comment lines are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use genebridge::de::Columns;
    /// use genebridge::de::Loader;
    ///
    /// let data = b"g1\t2.0\t0.001\ng2\tNA\tNA\ng3\t-0.4\t0.2\n";
    /// let loader = Loader::new(Columns::new(0, 1, 2));
    ///
    /// let set = loader.try_load_from(genebridge::Reader::new(&data[..]))?;
    ///
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.summary().malformed(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_load_from<T>(&self, mut reader: Reader<T>) -> Result<DeSet, Error>
    where
        T: BufRead,
    {
        let mut set = DeSet::default();

        for (i, line) in reader.lines().enumerate() {
            let line = match line.map_err(Error::Io)? {
                Ok(line) => line,
                Err(err) => {
                    debug!("skipping undecodable DE row {}: {err}", i + 1);
                    set.summary.rows += 1;
                    set.summary.malformed += 1;
                    continue;
                }
            };

            if reader::is_skippable(&line) {
                continue;
            }

            set.summary.rows += 1;

            match self.columns.parse(&line) {
                Ok(gene) => set.push(gene),
                Err(err) => {
                    debug!("skipping malformed DE row {}: {err}", i + 1);
                    set.summary.malformed += 1;
                }
            }
        }

        info!(
            "loaded {} DE results ({} malformed, {} duplicate rows dropped)",
            set.len(),
            set.summary.malformed,
            set.summary.duplicates
        );

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESEQ2: &[u8] = b"B9J08_00001\t1523.1\t2.31\t0.2\t11.5\t1e-30\t4e-28\n\
        B9J08_00002\t0.0\tNA\tNA\tNA\tNA\tNA\n\
        B9J08_00003\t88.0\t-0.12\t0.3\t-0.4\t0.69\tNA\n\
        B9J08_00004\t45.2\t-1.4\t0.4\t-3.5\t0.0004\t0.008\n\
        B9J08_00001\t1.0\t0.0\t0.1\t0.0\t1.0\t1.0\n\
        \n\
        truncated\t1.0\n";

    #[test]
    fn test_load_deseq2_layout() -> Result<(), Box<dyn std::error::Error>> {
        let set = Loader::default().try_load_from(Reader::new(DESEQ2))?;

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().map(|g| g.gene_id()).collect::<Vec<_>>(),
            vec!["B9J08_00001", "B9J08_00004"]
        );

        let first = set.get("B9J08_00001").unwrap();
        assert_eq!(first.effect_size(), 2.31);
        assert_eq!(first.significance(), 4e-28);

        assert!(set.contains("B9J08_00004"));
        assert!(!set.contains("B9J08_00003"));

        let summary = set.summary();
        assert_eq!(summary.rows(), 6);
        assert_eq!(summary.malformed(), 3);
        assert_eq!(summary.duplicates(), 1);

        Ok(())
    }

    #[test]
    fn test_undecodable_row_is_malformed() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"g1\t2.0\t0.001\n\xff\t1\t0.1\ng2\t1.0\t0.01\n";
        let set = Loader::new(Columns::new(0, 1, 2)).try_load_from(Reader::new(&data[..]))?;

        assert_eq!(set.len(), 2);
        assert!(set.contains("g2"));

        let summary = set.summary();
        assert_eq!(summary.rows(), 3);
        assert_eq!(summary.malformed(), 1);

        Ok(())
    }

    #[test]
    fn test_from_genes() -> Result<(), Box<dyn std::error::Error>> {
        let set = DeSet::from_genes([
            DeGene::try_new("g1", 2.0, 0.001)?,
            DeGene::try_new("g1", 3.0, 0.001)?,
        ]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("g1").map(|g| g.effect_size()), Some(2.0));
        assert_eq!(set.summary().duplicates(), 1);

        Ok(())
    }
}
