//! Behavioural coverage for the deduplication pipeline.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use hitchspot_core::{
    ClusterLabel, DedupConfig, DedupOutcome, FilterConfig, Scorer, ScoringContext, Spot, SpotRow,
    deduplicate,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Ranks spots by rating over the batch ceiling; unrated spots score zero.
struct RatingScorer;

impl Scorer for RatingScorer {
    fn score(&self, spot: &Spot, _label: ClusterLabel, ctx: &ScoringContext) -> f64 {
        spot.rating().unwrap_or(0.0) / ctx.rating_ceiling()
    }
}

/// Rows and outcome shared across the steps of one scenario.
pub struct TestContext {
    rows: RefCell<Vec<SpotRow>>,
    outcome: RefCell<Option<DedupOutcome>>,
}

#[fixture]
/// Build an empty `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        rows: RefCell::new(Vec::new()),
        outcome: RefCell::new(None),
    }
}

fn with_outcome<T>(context: &TestContext, check: impl FnOnce(&DedupOutcome) -> T) -> T {
    let outcome = context.outcome.borrow();
    check(outcome.as_ref().expect("deduplication has run"))
}

#[given("three reports within a few hundred metres of each other")]
fn three_nearby_reports(context: &TestContext) {
    *context.rows.borrow_mut() = vec![
        SpotRow::at(48.85, 2.35).with_id(1).with_rating(2.0),
        SpotRow::at(48.851, 2.351).with_id(2).with_rating(5.0),
        SpotRow::at(48.852, 2.352).with_id(3).with_rating(3.0),
    ];
}

#[given("two nearby reports and one report 50 km away")]
fn nearby_pair_and_outlier(context: &TestContext) {
    *context.rows.borrow_mut() = vec![
        SpotRow::at(48.85, 2.35).with_id(1).with_rating(4.0),
        SpotRow::at(48.851, 2.351).with_id(2).with_rating(5.0),
        SpotRow::at(49.3, 2.35)
            .with_id(3)
            .with_rating(1.0)
            .with_comment("Hopeless"),
    ];
}

#[given("two reports straddling the antimeridian")]
fn antimeridian_pair(context: &TestContext) {
    *context.rows.borrow_mut() = vec![
        SpotRow::at(-16.5, 179.9995).with_id(1),
        SpotRow::at(-16.5, -179.9995).with_id(2),
    ];
}

#[when("I deduplicate the reports with a 0.3 km radius")]
fn run_deduplication(context: &TestContext) {
    let rows = context.rows.borrow().clone();
    let config = DedupConfig {
        filter: FilterConfig::permissive(),
        ..DedupConfig::default()
    };
    let now = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid reference time");
    let outcome = deduplicate(rows, &config, &RatingScorer, now).expect("stages stay aligned");
    *context.outcome.borrow_mut() = Some(outcome);
}

#[then("one cluster is found")]
fn one_cluster(context: &TestContext) {
    with_outcome(context, |outcome| {
        assert_eq!(outcome.summary.clusters, 1, "expected a single cluster");
        assert_eq!(outcome.summary.noise, 0, "expected no noise");
        assert_eq!(outcome.representatives.len(), 1);
    });
}

#[then("the single representative is the highest rated report")]
fn best_report_wins(context: &TestContext) {
    with_outcome(context, |outcome| {
        let rep = outcome.representatives.first().expect("one representative");
        assert_eq!(rep.spot.row().id, Some(2));
    });
}

#[then("the isolated report is labelled as noise")]
fn outlier_is_noise(context: &TestContext) {
    with_outcome(context, |outcome| {
        let first = outcome.representatives.first().expect("noise comes first");
        assert!(first.label.is_noise(), "expected the outlier to be noise");
        assert_eq!(first.spot.row().id, Some(3));
        assert_eq!(outcome.summary.representatives, 2);
    });
}

#[then("the isolated report is kept unmodified despite its low score")]
fn outlier_is_unmodified(context: &TestContext) {
    let original = context
        .rows
        .borrow()
        .get(2)
        .cloned()
        .expect("outlier row present");
    with_outcome(context, |outcome| {
        let first = outcome.representatives.first().expect("noise comes first");
        assert_eq!(first.spot.row(), &original);
        assert!(first.score < 0.5, "expected a low score for the outlier");
    });
}

#[scenario(path = "tests/features/deduplication.feature", index = 0)]
fn nearby_reports_collapse(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/deduplication.feature", index = 1)]
fn isolated_report_survives(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/deduplication.feature", index = 2)]
fn antimeridian_reports_merge(context: TestContext) {
    let _ = context;
}
