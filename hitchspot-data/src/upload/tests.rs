//! Batching tests against the in-memory store.
#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

use chrono::Utc;
use hitchspot_core::{ClusterLabel, MapperConfig, MappedBatch, Representative, SpotRow, map_representatives};
use rstest::{fixture, rstest};

use super::test_support::RecordingStore;
use super::*;

fn batch_of(count: usize) -> MappedBatch {
    let representatives = (0..count)
        .map(|index| {
            let offset = f64::from(u32::try_from(index).expect("small index"));
            Representative {
                spot: SpotRow::at(10.0, offset / 100.0)
                    .with_comment(format!("comment {index}"))
                    .into_spot()
                    .expect("valid spot"),
                label: ClusterLabel::NOISE,
                score: 0.5,
            }
        })
        .collect();
    map_representatives(representatives, &MapperConfig::default(), Utc::now())
}

#[fixture]
fn five() -> MappedBatch {
    batch_of(5)
}

#[rstest]
fn splits_rows_into_batches(five: MappedBatch) {
    let store = RecordingStore::default();
    let report = upload_batch(&store, &five.spots, &five.comments, 2).expect("upload");

    assert_eq!(store.batch_sizes(SPOTS_TABLE), [2, 2, 1]);
    assert_eq!(store.batch_sizes(COMMENTS_TABLE), [2, 2, 1]);
    assert_eq!(
        report,
        UploadReport {
            spots: 5,
            comments: 5,
            batches: 6
        }
    );
}

#[rstest]
fn sends_spots_before_comments(five: MappedBatch) {
    let store = RecordingStore::default();
    upload_batch(&store, &five.spots, &five.comments, DEFAULT_BATCH_SIZE).expect("upload");
    assert_eq!(store.table_order(), [SPOTS_TABLE, COMMENTS_TABLE]);
}

#[rstest]
fn uploaded_spots_carry_no_metadata(five: MappedBatch) {
    let store = RecordingStore::default();
    upload_batch(&store, &five.spots, &five.comments, DEFAULT_BATCH_SIZE).expect("upload");

    let rows = store.rows(SPOTS_TABLE);
    let first = rows.first().and_then(Value::as_object).expect("spot object");
    assert!(first.contains_key("road_name"));
    assert!(!first.contains_key("metadata"));

    let comments = store.rows(COMMENTS_TABLE);
    let comment = comments.first().expect("comment row");
    assert_eq!(comment.get("spot_id"), first.get("id"));
}

#[rstest]
#[case(0, 5)]
#[case(5000, 1)]
fn clamps_batch_size(five: MappedBatch, #[case] requested: usize, #[case] requests: usize) {
    let store = RecordingStore::default();
    upload_batch(&store, &five.spots, &[], requested).expect("upload");
    assert_eq!(store.batch_sizes(SPOTS_TABLE).len(), requests);
}

#[rstest]
fn failing_batch_keeps_earlier_inserts(five: MappedBatch) {
    let store = RecordingStore::failing_on(SPOTS_TABLE, 2);
    let err = upload_batch(&store, &five.spots, &five.comments, 2).expect_err("second batch fails");

    match err {
        UploadError::Partial {
            table,
            batch,
            batches,
            inserted,
            source,
        } => {
            assert_eq!(table, SPOTS_TABLE);
            assert_eq!((batch, batches, inserted), (2, 3, 2));
            assert!(matches!(*source, UploadError::Rejected { status: 500, .. }));
        }
        other => panic!("expected partial upload, got {other:?}"),
    }
    assert_eq!(store.rows(SPOTS_TABLE).len(), 2);
    assert!(store.rows(COMMENTS_TABLE).is_empty());
}

#[rstest]
fn comment_failure_counts_uploaded_spots(five: MappedBatch) {
    let store = RecordingStore::failing_on(COMMENTS_TABLE, 1);
    let err = upload_batch(&store, &five.spots, &five.comments, 500).expect_err("comments fail");
    assert!(matches!(
        err,
        UploadError::Partial {
            inserted: 5,
            batch: 1,
            ..
        }
    ));
}

#[rstest]
fn empty_batches_send_nothing() {
    let store = RecordingStore::default();
    let report = upload_batch(&store, &[], &[], DEFAULT_BATCH_SIZE).expect("upload");
    assert_eq!(report, UploadReport::default());
    assert!(store.table_order().is_empty());
}
