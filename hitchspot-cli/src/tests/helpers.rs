//! Test helpers for writing spot tables and stubbing network adapters.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use hitchspot_core::ReverseGeocoder;
use hitchspot_data::geocode::test_support::StubGeocoder;
use hitchspot_data::upload::test_support::RecordingStore;
use hitchspot_data::{TableStore, UploadError};
use tempfile::TempDir;

/// Three reports of one place near Paris and one report 50 km north.
pub(super) const POINTS_CSV: &[u8] = b"id,lat,lon,rating,comment,dest_lat,dest_lon\n\
    1,48.85,2.35,2,ok,48.0,2.35\n\
    2,48.851,2.351,5,best spot,48.0,2.35\n\
    3,48.852,2.352,3,,48.0,2.35\n\
    4,49.3,2.35,1,far away,50.0,2.35\n";

/// Two unrated reports of one place with no destination recorded.
pub(super) const UNRATED_CSV: &[u8] = b"id,lat,lon,rating,comment,dest_lat,dest_lon\n\
    1,48.85,2.35,,first,,\n\
    2,48.851,2.351,,second,,\n";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    hitchspot_fs::write_utf8_file(path, contents).expect("write file");
}

pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Adapters answering from memory.
#[derive(Debug)]
pub(super) struct StubAdapters {
    pub(super) geocoder: StubGeocoder,
    pub(super) store: RecordingStore,
    pub(super) credentials_missing: bool,
}

impl Default for StubAdapters {
    fn default() -> Self {
        Self {
            geocoder: StubGeocoder::without_road(),
            store: RecordingStore::default(),
            credentials_missing: false,
        }
    }
}

impl ImportAdapters for StubAdapters {
    fn geocoder(&self) -> Result<Box<dyn ReverseGeocoder + '_>, CliError> {
        Ok(Box::new(&self.geocoder))
    }

    fn table_store(&self) -> Result<Box<dyn TableStore + '_>, UploadError> {
        if self.credentials_missing {
            return Err(UploadError::MissingCredentials {
                name: "SUPABASE_URL",
            });
        }
        Ok(Box::new(&self.store))
    }
}
