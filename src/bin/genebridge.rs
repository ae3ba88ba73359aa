//! A binary that reconciles two DE result sets computed against different
//! releases of the same genome annotation.
//!
//! ```shell
//! cargo run --release --bin=genebridge --features=binaries -- \
//!     --annotation-a v2.gff.gz --annotation-b v3.gff.gz \
//!     --feature-table v3_feature_table.txt.gz \
//!     --de-a paper.tsv --effect-threshold-a 1 --significance-threshold-a 0.05 \
//!     --de-b ours.tsv --effect-threshold-b 1 --significance-threshold-b 0.05
//! ```
//!
//! It achieves this by carrying out the following:
//!
//! * Indexing the coding features of both annotations and pairing them by
//!   coordinate overlap.
//! * Arbitrating the coordinate pairs against the cross-references (if any)
//!   into one identity map, optionally written out as a two-column table.
//! * Loading both DE tables and printing the reconciliation report.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use genebridge::annotation;
use genebridge::de;
use genebridge::identity::Resolver;
use genebridge::identity::Version;
use genebridge::identity::resolver;
use genebridge::matcher::Matcher;
use genebridge::reader;
use genebridge::reconcile;
use genebridge::reconcile::ReconciliationResult;
use genebridge::xref;
use genebridge::xref::CrossReference;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// The header of the mapping table.
const MAPPING_HEADER: (&str, &str) = ("id_version_a", "id_version_b");

/// The placeholder for values that are not defined.
const UNDEFINED: &str = "n/a";

////////////////////////////////////////////////////////////////////////////////////////
// Arguments
////////////////////////////////////////////////////////////////////////////////////////

/// Reconciles gene identities and DE results across two annotation releases.
#[derive(Parser)]
struct Args {
    /// The annotation (GFF3-style, optionally gzipped) of release A.
    #[arg(long)]
    annotation_a: PathBuf,

    /// The annotation (GFF3-style, optionally gzipped) of release B.
    #[arg(long)]
    annotation_b: PathBuf,

    /// The feature type that marks coding features.
    #[arg(long, default_value = annotation::index::builder::DEFAULT_FEATURE_TYPE)]
    feature_type: String,

    /// The fraction of the shorter interval that an overlap must exceed.
    #[arg(long, default_value_t = genebridge::matcher::DEFAULT_THRESHOLD)]
    overlap_threshold: f64,

    /// An NCBI feature table carrying `old_locus_tag` cross-references.
    #[arg(long, conflicts_with = "xref_from_annotation")]
    feature_table: Option<PathBuf>,

    /// Read cross-references from the `old_locus_tag` attributes of the newer
    /// release's annotation.
    #[arg(long, default_value_t = false)]
    xref_from_annotation: bool,

    /// The feature type carrying `old_locus_tag` when reading cross-references
    /// from an annotation.
    #[arg(long, default_value = xref::DEFAULT_FEATURE_TYPE)]
    xref_feature_type: String,

    /// The release (`a` or `b`) whose locus tags are the "new" ones in the
    /// cross-references.
    #[arg(long, default_value_t = Version::B)]
    new_version: Version,

    /// If desired, a path to write the two-column identity map to.
    #[arg(long)]
    mapping_out: Option<PathBuf>,

    /// The DE results keyed by release A identifiers.
    #[arg(long)]
    de_a: PathBuf,

    /// The DE results keyed by release B identifiers.
    #[arg(long)]
    de_b: PathBuf,

    /// The minimum absolute effect size for set A.
    #[arg(long)]
    effect_threshold_a: f64,

    /// The exclusive upper bound on significance for set A.
    #[arg(long)]
    significance_threshold_a: f64,

    /// The minimum absolute effect size for set B.
    #[arg(long)]
    effect_threshold_b: f64,

    /// The exclusive upper bound on significance for set B.
    #[arg(long)]
    significance_threshold_b: f64,

    /// The 0-based column holding the gene identifier in both DE tables.
    #[arg(long, default_value_t = de::columns::DEFAULT_GENE_ID_COLUMN)]
    gene_column: usize,

    /// The 0-based column holding the effect size in both DE tables.
    #[arg(long, default_value_t = de::columns::DEFAULT_EFFECT_SIZE_COLUMN)]
    effect_column: usize,

    /// The 0-based column holding the significance in both DE tables.
    #[arg(long, default_value_t = de::columns::DEFAULT_SIGNIFICANCE_COLUMN)]
    significance_column: usize,

    /// The column delimiter of both DE tables (`tab` or a single character).
    #[arg(long, default_value = "tab")]
    delimiter: String,

    /// The correlation magnitude that must be exceeded to infer a polarity.
    #[arg(long, default_value_t = reconcile::DEFAULT_POLARITY_THRESHOLD)]
    polarity_threshold: f64,

    /// The sign correction (`none`, `reverse`, or `follow-inferred`).
    #[arg(long, default_value_t = reconcile::Correction::None)]
    correction: reconcile::Correction,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Parses the `--delimiter` argument.
fn delimiter(value: &str) -> Result<char> {
    if value == "tab" {
        return Ok('\t');
    }

    let mut chars = value.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("invalid delimiter: expected `tab` or a single character, found `{value}`"),
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Loading
////////////////////////////////////////////////////////////////////////////////////////

/// Builds the feature index of one annotation.
fn index(path: &Path, feature_type: &str) -> Result<annotation::Index> {
    let reader =
        reader::open(path).with_context(|| format!("opening annotation {}", path.display()))?;

    let index = annotation::index::Builder::default()
        .feature_type(feature_type)
        .try_build_from(reader)
        .with_context(|| format!("reading annotation {}", path.display()))?;

    if index.is_empty() {
        warn!(
            "annotation {} has no `{feature_type}` features with a locus tag",
            path.display()
        );
    }

    Ok(index)
}

/// Loads the cross-references, if any were requested.
fn cross_reference(args: &Args) -> Result<Option<CrossReference>> {
    if let Some(path) = &args.feature_table {
        let reader = reader::open(path)
            .with_context(|| format!("opening feature table {}", path.display()))?;

        return CrossReference::from_feature_table(reader)
            .with_context(|| format!("reading feature table {}", path.display()))
            .map(Some);
    }

    if args.xref_from_annotation {
        let path = match args.new_version {
            Version::A => &args.annotation_a,
            Version::B => &args.annotation_b,
        };

        let reader = reader::open(path)
            .with_context(|| format!("opening annotation {}", path.display()))?;

        return CrossReference::from_annotation(reader, &args.xref_feature_type)
            .with_context(|| format!("reading cross-references from {}", path.display()))
            .map(Some);
    }

    Ok(None)
}

/// Loads one DE table.
fn de_set(path: &Path, loader: &de::Loader) -> Result<de::DeSet> {
    let reader =
        reader::open(path).with_context(|| format!("opening DE table {}", path.display()))?;

    loader
        .try_load_from(reader)
        .with_context(|| format!("reading DE table {}", path.display()))
}

/// Writes the identity map to `path`.
fn write_mapping(resolver: &Resolver, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating mapping {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    resolver
        .write_table(&mut writer, Some(MAPPING_HEADER))
        .and_then(|_| writer.flush())
        .with_context(|| format!("writing mapping {}", path.display()))?;

    info!("wrote {} identity pairs to {}", resolver.len(), path.display());
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////
// Report
////////////////////////////////////////////////////////////////////////////////////////

/// Formats an optional percentage.
fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| String::from(UNDEFINED))
}

/// Renders the reconciliation report.
fn report(resolver: &Resolver, result: &ReconciliationResult) -> String {
    let coverage = resolver.coverage_stats();

    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);

    builder.push_record([
        "Identity map (canonical / coordinate-only / unresolved)",
        &format!(
            "{} / {} / {}",
            coverage.canonical_covered(),
            coverage.coordinate_only_covered(),
            coverage.unresolved()
        ),
    ]);
    builder.push_record([
        "Canonical/coordinate disagreements",
        &resolver.disagreements().len().to_string(),
    ]);
    builder.push_record(["Paired genes", &result.matched_pairs().len().to_string()]);
    builder.push_record([
        "Unmappable (A / B)",
        &format!(
            "{} / {}",
            result.unmappable_a().len(),
            result.unmappable_b().len()
        ),
    ]);
    builder.push_record([
        "Absent (A / B)",
        &format!("{} / {}", result.absent_a().len(), result.absent_b().len()),
    ]);
    builder.push_record(["Pearson r", &result.correlation().to_string()]);
    builder.push_record(["Inferred polarity", &result.inferred_polarity().to_string()]);
    builder.push_record([
        "Significant (A / B)",
        &format!("{} / {}", result.significant_a(), result.significant_b()),
    ]);

    let stats = [Some(("raw", result.raw())), result.corrected().map(|c| ("corrected", c))];

    for (label, stats) in stats.into_iter().flatten() {
        builder.push_record([
            &format!("Overlap ({label})"),
            &format!(
                "{} ({} of A, {} of B)",
                stats.overlap(),
                percent(stats.percent_of_a()),
                percent(stats.percent_of_b())
            ),
        ]);
        builder.push_record([
            &format!("Same direction ({label})"),
            &format!("{} / {}", stats.same_direction(), stats.overlap()),
        ]);
    }

    for (label, counts) in [
        ("A only", result.a_only_counts()),
        ("B only", result.b_only_counts()),
    ] {
        builder.push_record([
            &format!("{label} (not significant / effect too small / unmappable / absent)"),
            &format!(
                "{} ({} / {} / {} / {})",
                counts.total(),
                counts.not_significant(),
                counts.effect_too_small(),
                counts.unmappable(),
                counts.absent()
            ),
        ]);
    }

    builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string()
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Runs the whole pipeline.
fn run(args: &Args) -> Result<()> {
    let thresholds_a = de::Thresholds::try_new(
        args.effect_threshold_a,
        args.significance_threshold_a,
    )
    .context("thresholds for set A")?;
    let thresholds_b = de::Thresholds::try_new(
        args.effect_threshold_b,
        args.significance_threshold_b,
    )
    .context("thresholds for set B")?;
    let config = reconcile::Config::try_new(args.polarity_threshold, args.correction)?;
    let matcher = Matcher::try_with_threshold(args.overlap_threshold)?;

    let columns = de::Columns::new(
        args.gene_column,
        args.effect_column,
        args.significance_column,
    )
    .with_delimiter(delimiter(&args.delimiter)?);
    let loader = de::Loader::new(columns);

    info!("identity: indexing annotations");
    let index_a = index(&args.annotation_a, &args.feature_type)?;
    let index_b = index(&args.annotation_b, &args.feature_type)?;

    info!("identity: matching by coordinates");
    let matches = matcher.run(&index_a, &index_b);

    let mut builder = resolver::Builder::default()
        .universe(index_a.locus_tags())
        .coordinate(&matches);

    if let Some(xref) = cross_reference(args)? {
        builder = builder.canonical(&xref, args.new_version);
    }

    let resolver = builder.build();

    if let Some(path) = &args.mapping_out {
        write_mapping(&resolver, path)?;
    }

    info!("reconcile: loading DE tables");
    let a = de_set(&args.de_a, &loader)?;
    let b = de_set(&args.de_b, &loader)?;

    let result =
        reconcile::Engine::new(config).reconcile(&a, &thresholds_a, &b, &thresholds_b, &resolver);

    println!("{}", report(&resolver, &result));

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    run(&args)
}
