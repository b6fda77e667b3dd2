//! Behaviour-driven step definitions driving the import CLI scenarios.

use super::helpers::{POINTS_CSV, StubAdapters, UNRATED_CSV, write_utf8};
use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hitchspot_data::geocode::test_support::StubGeocoder;
use hitchspot_data::upload::{COMMENTS_TABLE, SPOTS_TABLE};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct ImportWorld {
    _tmp: TempDir,
    input: Utf8PathBuf,
    output: Utf8PathBuf,
    cli_args: RefCell<Vec<String>>,
    adapters: RefCell<StubAdapters>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ImportWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            input: root.join("points.csv"),
            output: root.join("out").join("spots.json"),
            _tmp: tmp,
            cli_args: RefCell::new(Vec::new()),
            adapters: RefCell::new(StubAdapters::default()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn push_args<const N: usize>(&self, args: [&str; N]) {
        self.cli_args
            .borrow_mut()
            .extend(args.iter().map(|arg| (*arg).to_owned()));
    }

    fn request_output(&self, path: &Utf8Path) {
        self.push_args([&format!("--{ARG_OUTPUT}"), path.as_str()]);
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec![
            "hitchspot".to_owned(),
            "import".to_owned(),
            format!("--{ARG_INPUT}"),
            self.input.as_str().to_owned(),
        ];
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }

    fn output_json(&self, path: &Utf8Path) -> Value {
        let contents = std::fs::read_to_string(path).expect("read output");
        serde_json::from_str(&contents).expect("output should be JSON")
    }
}

#[fixture]
fn world() -> ImportWorld {
    ImportWorld::new()
}

#[given("a spot table with one cluster and one isolated report")]
fn spot_table_exists(#[from(world)] world: &ImportWorld) {
    write_utf8(&world.input, POINTS_CSV);
}

#[given("a spot table of two unrated reports of one place")]
fn unrated_table_exists(#[from(world)] world: &ImportWorld) {
    write_utf8(&world.input, UNRATED_CSV);
}

#[given("I disable the rating and destination filters")]
fn disable_rating_filter(#[from(world)] world: &ImportWorld) {
    world.push_args([
        &format!("--{ARG_MIN_RATING}"),
        "0",
        &format!("--{ARG_ALLOW_MISSING_DESTINATION}"),
    ]);
}

#[given("the input file does not exist")]
fn input_is_missing(#[from(world)] world: &ImportWorld) {
    let _ = world;
}

#[given("I request a dry run with JSON output and upload")]
fn request_dry_run(#[from(world)] world: &ImportWorld) {
    world.request_output(&world.output);
    world.push_args([
        &format!("--{ARG_UPLOAD}"),
        &format!("--{ARG_DRY_RUN}"),
    ]);
}

#[given("I request GeoJSON output")]
fn request_geojson(#[from(world)] world: &ImportWorld) {
    world.request_output(&world.output);
    world.push_args([&format!("--{ARG_GEOJSON}")]);
}

#[given("a geocoder that answers \"N7\"")]
fn geocoder_answers(#[from(world)] world: &ImportWorld) {
    world.adapters.borrow_mut().geocoder = StubGeocoder::with_road("N7");
}

#[given("I request geocoded JSON output")]
fn request_geocoded_output(#[from(world)] world: &ImportWorld) {
    world.request_output(&world.output);
    world.push_args([
        &format!("--{ARG_GEOCODE}"),
        &format!("--{ARG_GEOCODE_DELAY_MS}"),
        "0",
    ]);
}

#[given("I request an upload in batches of one")]
fn request_upload_batches(#[from(world)] world: &ImportWorld) {
    world.push_args([
        &format!("--{ARG_UPLOAD}"),
        &format!("--{ARG_BATCH_SIZE}"),
        "1",
    ]);
}

#[given("upload credentials are missing")]
fn credentials_missing(#[from(world)] world: &ImportWorld) {
    world.adapters.borrow_mut().credentials_missing = true;
}

#[given("I request JSON output and upload")]
fn request_output_and_upload(#[from(world)] world: &ImportWorld) {
    world.request_output(&world.output);
    world.push_args([&format!("--{ARG_UPLOAD}")]);
}

#[when("I run the import command")]
fn run_import_command(#[from(world)] world: &ImportWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Import(args) => {
            let adapters = world.adapters.borrow();
            let mut buffer = world.stdout.borrow_mut();
            run_import_with(args, &*adapters, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &ImportWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the summary reports two spots from one cluster and one noise point")]
fn summary_reports_counts(#[from(world)] world: &ImportWorld) {
    let stdout = world.stdout_text();
    assert!(stdout.contains("Loaded 4 raw points, 4 after filtering"), "{stdout}");
    assert!(stdout.contains("Found 1 clusters and 1 noise points"), "{stdout}");
    assert!(stdout.contains("Final: 2 spots ready"), "{stdout}");
    assert!(stdout.contains("Top 5 scores: ["), "{stdout}");
}

#[then("the summary reports one spot from two unrated reports")]
fn summary_reports_unrated_spot(#[from(world)] world: &ImportWorld) {
    let stdout = world.stdout_text();
    assert!(stdout.contains("Loaded 2 raw points, 2 after filtering"), "{stdout}");
    assert!(stdout.contains("Found 1 clusters and 0 noise points"), "{stdout}");
    assert!(stdout.contains("Final: 1 spots ready"), "{stdout}");
}

#[then("no output file exists")]
fn no_output_file(#[from(world)] world: &ImportWorld) {
    let exists = hitchspot_fs::is_regular_file(&world.output).expect("inspect output");
    assert!(!exists, "dry run must not write {}", world.output);
}

#[then("nothing was uploaded")]
fn nothing_uploaded(#[from(world)] world: &ImportWorld) {
    assert!(world.adapters.borrow().store.table_order().is_empty());
}

#[then("the output file holds two GeoJSON features")]
fn output_holds_features(#[from(world)] world: &ImportWorld) {
    let value = world.output_json(&world.output);
    assert_eq!(
        value.get("type").and_then(Value::as_str),
        Some("FeatureCollection")
    );
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .expect("features array");
    assert_eq!(features.len(), 2);
}

#[then("every exported spot is on road \"N7\"")]
fn every_spot_on_road(#[from(world)] world: &ImportWorld) {
    let value = world.output_json(&world.output);
    let spots = value.as_array().expect("spot array");
    assert_eq!(spots.len(), 2);
    for spot in spots {
        assert_eq!(spot.get("road_name").and_then(Value::as_str), Some("N7"));
    }
}

#[then("the store received two spot batches and two comment batches")]
fn store_received_batches(#[from(world)] world: &ImportWorld) {
    let adapters = world.adapters.borrow();
    assert_eq!(adapters.store.batch_sizes(SPOTS_TABLE), [1, 1]);
    assert_eq!(adapters.store.batch_sizes(COMMENTS_TABLE), [1, 1]);
    assert_eq!(adapters.store.table_order(), [SPOTS_TABLE, COMMENTS_TABLE]);
}

#[then("the summary reports the upload failure")]
fn summary_reports_upload_failure(#[from(world)] world: &ImportWorld) {
    let stdout = world.stdout_text();
    assert!(stdout.contains("Upload failed: missing SUPABASE_URL"), "{stdout}");
}

#[then("the output file holds two JSON spots")]
fn output_holds_spots(#[from(world)] world: &ImportWorld) {
    let value = world.output_json(&world.output);
    assert_eq!(value.as_array().map(Vec::len), Some(2));
}

#[then("the command fails because the input file is missing")]
fn command_fails_missing_input(#[from(world)] world: &ImportWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(*field, ARG_INPUT);
            assert_eq!(*path, world.input);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

macro_rules! register_import_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/import_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ImportWorld) {
            let _ = world;
        }
    };
}

register_import_scenario!(import_dry_run, "a dry run prints the summary and writes nothing");
register_import_scenario!(import_geojson, "exporting representatives as GeoJSON");
register_import_scenario!(
    import_geocoded,
    "geocoding names the road of every exported spot"
);
register_import_scenario!(import_upload, "uploading sends spots in the requested batches");
register_import_scenario!(import_upload_failure, "upload failures leave the run successful");
register_import_scenario!(import_unrated, "a zero minimum rating keeps unrated reports");
register_import_scenario!(import_missing_input, "rejecting a missing input file");
