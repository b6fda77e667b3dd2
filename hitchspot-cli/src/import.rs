//! Import command implementation for the hitchspot CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use hitchspot_core::{
    ClusterParams, DedupConfig, DedupSummary, EnrichConfig, FilterConfig, MappedBatch,
    MapperConfig, ReverseGeocoder, deduplicate, enrich_road_names, map_representatives,
};
use hitchspot_data::upload::clamp_batch_size;
use hitchspot_data::{
    DEFAULT_BATCH_SIZE, NominatimGeocoder, OutputFormat, SupabaseCredentials, SupabaseStore,
    TableStore, UploadError, export_spots, load_spots, upload_batch,
};
use hitchspot_scorer::{CompositeScorer, ScoringStrategy};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ALLOW_MISSING_DESTINATION, ARG_BATCH_SIZE, ARG_COUNTRY, ARG_DRY_RUN, ARG_EPSILON_KM,
    ARG_GEOCODE, ARG_GEOCODE_DELAY_MS, ARG_GEOJSON, ARG_INCLUDE_BANNED, ARG_INPUT,
    ARG_MAX_SPOTS, ARG_MIN_DATE, ARG_MIN_RATING, ARG_MIN_SAMPLES, ARG_ONLY_REVIEWED,
    ARG_OUTPUT, ARG_STRATEGY, ARG_UPLOAD, CliError, ENV_INPUT,
};

/// Scores listed in the run summary.
const SUMMARY_TOP_SCORES: usize = 5;

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Load spot reports from a CSV export or SQLite dump, cluster \
                 reports of the same place, keep the best report per place \
                 and write the survivors to a JSON or GeoJSON file and/or \
                 upload them to Supabase. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Deduplicate spot reports and export or upload the result"
)]
#[ortho_config(prefix = "HITCHSPOT")]
pub(crate) struct ImportArgs {
    /// Input CSV or SQLite file.
    #[arg(short = 'i', long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Output JSON or GeoJSON file.
    #[arg(short = 'o', long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Write GeoJSON whatever the output extension.
    #[arg(long = ARG_GEOJSON)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) geojson: bool,
    /// Upload the result to Supabase.
    #[arg(long = ARG_UPLOAD)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) upload: bool,
    /// Process and print the summary without writing anything.
    #[arg(long = ARG_DRY_RUN)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) dry_run: bool,
    /// Resolve road names through Nominatim.
    #[arg(long = ARG_GEOCODE)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) geocode: bool,
    /// Keep only spots from this country code (e.g. FR, DE, ES).
    #[arg(long = ARG_COUNTRY, value_name = "code")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Keep only spots reported on or after this day.
    #[arg(long = ARG_MIN_DATE, value_name = "YYYY-MM-DD")]
    #[serde(default)]
    pub(crate) min_date: Option<NaiveDate>,
    /// Clustering radius in kilometres.
    #[arg(long = ARG_EPSILON_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) epsilon_km: Option<f64>,
    /// Neighbours, the spot included, needed to form a cluster.
    #[arg(long = ARG_MIN_SAMPLES, value_name = "count")]
    #[serde(default)]
    pub(crate) min_samples: Option<usize>,
    /// Ranking used to pick each cluster's representative.
    #[arg(long = ARG_STRATEGY, value_name = "quality|isolation")]
    #[serde(default)]
    pub(crate) strategy: Option<ScoringStrategy>,
    /// Drop spots rated below this value; zero disables the rating filter.
    #[arg(long = ARG_MIN_RATING, value_name = "rating")]
    #[serde(default)]
    pub(crate) min_rating: Option<f64>,
    /// Keep at most this many spots, best first.
    #[arg(long = ARG_MAX_SPOTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_spots: Option<usize>,
    /// Rows per upload request.
    #[arg(long = ARG_BATCH_SIZE, value_name = "rows")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// Spacing between geocoding requests.
    #[arg(long = ARG_GEOCODE_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) geocode_delay_ms: Option<u64>,
    /// Keep spots flagged as banned.
    #[arg(long = ARG_INCLUDE_BANNED)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) include_banned: bool,
    /// Keep only spots flagged as reviewed.
    #[arg(long = ARG_ONLY_REVIEWED)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) only_reviewed: bool,
    /// Keep spots without a destination.
    #[arg(long = ARG_ALLOW_MISSING_DESTINATION)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) allow_missing_destination: bool,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportConfig {
    /// Input table.
    pub(crate) input: Utf8PathBuf,
    /// Export target and its format.
    pub(crate) output: Option<(Utf8PathBuf, OutputFormat)>,
    /// Filter and clustering parameters.
    pub(crate) dedup: DedupConfig,
    pub(crate) strategy: ScoringStrategy,
    pub(crate) mapper: MapperConfig,
    /// Present when road names should be resolved.
    pub(crate) enrich: Option<EnrichConfig>,
    /// Clamped upload batch size; present when uploading.
    pub(crate) upload_batch_size: Option<usize>,
    pub(crate) dry_run: bool,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.input, ARG_INPUT)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match hitchspot_fs::is_regular_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INPUT,
        })?;

        let cluster = ClusterParams::new(
            args.epsilon_km.unwrap_or(ClusterParams::DEFAULT_EPSILON_KM),
            args.min_samples.unwrap_or(ClusterParams::DEFAULT_MIN_SAMPLES),
        )?;
        let defaults = FilterConfig::default();
        let filter = FilterConfig {
            exclude_banned: !args.include_banned,
            only_reviewed: args.only_reviewed,
            min_rating: args
                .min_rating
                .map_or(defaults.min_rating, |rating| (rating > 0.0).then_some(rating)),
            country: args.country.filter(|code| !code.trim().is_empty()),
            min_date: args.min_date,
            require_destination: !args.allow_missing_destination,
        };

        let output = args.output.map(|path| {
            let format = OutputFormat::detect(&path, args.geojson);
            (path, format)
        });
        let enrich = args.geocode.then(|| EnrichConfig {
            delay: args
                .geocode_delay_ms
                .map_or(EnrichConfig::DEFAULT_DELAY, Duration::from_millis),
            ..EnrichConfig::default()
        });
        let upload_batch_size = args
            .upload
            .then(|| clamp_batch_size(args.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)));

        Ok(Self {
            input,
            output,
            dedup: DedupConfig { filter, cluster },
            strategy: args.strategy.unwrap_or_default(),
            mapper: MapperConfig {
                max_spots: args.max_spots,
            },
            enrich,
            upload_batch_size,
            dry_run: args.dry_run,
        })
    }
}

/// Supplies the network-facing collaborators of an import run.
pub(crate) trait ImportAdapters {
    fn geocoder(&self) -> Result<Box<dyn ReverseGeocoder + '_>, CliError>;
    fn table_store(&self) -> Result<Box<dyn TableStore + '_>, UploadError>;
}

/// Nominatim for road names and Supabase, configured from the environment,
/// for uploads.
pub(crate) struct DefaultImportAdapters;

impl ImportAdapters for DefaultImportAdapters {
    fn geocoder(&self) -> Result<Box<dyn ReverseGeocoder + '_>, CliError> {
        Ok(Box::new(NominatimGeocoder::new()?))
    }

    fn table_store(&self) -> Result<Box<dyn TableStore + '_>, UploadError> {
        let credentials = SupabaseCredentials::from_env()?;
        Ok(Box::new(SupabaseStore::new(&credentials)?))
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &DefaultImportAdapters, &mut stdout)
}

pub(crate) fn run_import_with(
    args: ImportArgs,
    adapters: &dyn ImportAdapters,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_import_config(args)?;
    execute_import(&config, adapters, writer, Utc::now())
}

fn resolve_import_config(args: ImportArgs) -> Result<ImportConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_import(
    config: &ImportConfig,
    adapters: &dyn ImportAdapters,
    writer: &mut dyn Write,
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    let rows = load_spots(&config.input)?;
    let scorer = CompositeScorer::for_strategy(config.strategy);
    log::info!("Scoring with the {} strategy", config.strategy);
    let outcome = deduplicate(rows, &config.dedup, &scorer, now)?;
    let mut batch = map_representatives(outcome.representatives, &config.mapper, now);
    write_summary(writer, &outcome.summary, &batch).map_err(CliError::WriteSummary)?;

    if config.dry_run {
        writeln!(writer, "Dry run: nothing written").map_err(CliError::WriteSummary)?;
        return Ok(());
    }

    if let Some(enrich) = &config.enrich {
        let geocoder = adapters.geocoder()?;
        enrich_road_names(&mut batch.spots, geocoder.as_ref(), enrich);
    }

    if let Some((path, format)) = &config.output {
        export_spots(path, &batch.spots, *format)?;
        writeln!(writer, "Exported {} spots to {path}", batch.spots.len())
            .map_err(CliError::WriteSummary)?;
    }

    if let Some(batch_size) = config.upload_batch_size {
        upload_records(adapters, &batch, batch_size, writer)?;
    }
    Ok(())
}

/// Upload errors are reported but leave the run successful; exported files
/// stay in place.
fn upload_records(
    adapters: &dyn ImportAdapters,
    batch: &MappedBatch,
    batch_size: usize,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let uploaded = adapters.table_store().and_then(|store| {
        upload_batch(store.as_ref(), &batch.spots, &batch.comments, batch_size)
    });
    let line = match uploaded {
        Ok(report) => format!(
            "Uploaded {} spots and {} comments in {} requests",
            report.spots, report.comments, report.batches
        ),
        Err(err) => {
            log::error!("Upload failed: {err}");
            format!("Upload failed: {err}")
        }
    };
    writeln!(writer, "{line}").map_err(CliError::WriteSummary)
}

fn write_summary(
    writer: &mut dyn Write,
    summary: &DedupSummary,
    batch: &MappedBatch,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "Loaded {} raw points, {} after filtering",
        summary.raw, summary.filtered
    )?;
    let unlocated = summary.raw.saturating_sub(summary.located);
    if unlocated > 0 {
        writeln!(writer, "Skipped {unlocated} rows without usable coordinates")?;
    }
    writeln!(
        writer,
        "Found {} clusters and {} noise points",
        summary.clusters, summary.noise
    )?;
    writeln!(writer, "Final: {} spots ready", batch.spots.len())?;
    writeln!(writer, "Final: {} comments ready", batch.comments.len())?;
    let top: Vec<String> = batch
        .spots
        .iter()
        .take(SUMMARY_TOP_SCORES)
        .map(|spot| format!("{:.2}", spot.metadata.score))
        .collect();
    writeln!(writer, "Top {SUMMARY_TOP_SCORES} scores: [{}]", top.join(", "))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ImportConfig, CliError> {
    let merged = ImportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ImportConfig::try_from(merged)
}
