//! Shared test harness modules for the hitchspot CLI.
#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

use super::*;
use crate::import::*;

mod helpers;
mod import_steps;
