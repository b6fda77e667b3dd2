//! Deterministic scorer and geocoder doubles used by unit and behaviour
//! tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use geo::Coord;

use crate::{ClusterLabel, GeocodeError, ReverseGeocoder, Scorer, ScoringContext, Spot};

/// `Scorer` returning the rating divided by the batch ceiling.
///
/// Spots without a rating score `0.0`.
#[derive(Default, Debug, Copy, Clone)]
pub struct RatingScorer;

impl Scorer for RatingScorer {
    fn score(&self, spot: &Spot, _label: ClusterLabel, ctx: &ScoringContext) -> f64 {
        Self::sanitise(spot.rating().unwrap_or(0.0) / ctx.rating_ceiling())
    }
}

/// `ReverseGeocoder` replaying a fixed script of answers.
///
/// Answers are returned in order, one per call; once the script is
/// exhausted every call answers `Ok(None)`. Queried coordinates are
/// recorded for later inspection.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hitchspot_core::ReverseGeocoder;
/// use hitchspot_core::test_support::ScriptedGeocoder;
///
/// let geocoder = ScriptedGeocoder::new([Ok(Some("A1".to_owned()))]);
/// let here = Coord { x: 2.0, y: 49.0 };
/// assert_eq!(geocoder.reverse(here), Ok(Some("A1".to_owned())));
/// assert_eq!(geocoder.reverse(here), Ok(None));
/// assert_eq!(geocoder.calls().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedGeocoder {
    script: RefCell<VecDeque<Result<Option<String>, GeocodeError>>>,
    calls: RefCell<Vec<Coord<f64>>>,
}

impl ScriptedGeocoder {
    /// Create a geocoder that replays `answers`.
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Result<Option<String>, GeocodeError>>,
    {
        Self {
            script: RefCell::new(answers.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Coordinates queried so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Coord<f64>> {
        self.calls.borrow().clone()
    }
}

impl ReverseGeocoder for ScriptedGeocoder {
    fn reverse(&self, location: Coord<f64>) -> Result<Option<String>, GeocodeError> {
        self.calls.borrow_mut().push(location);
        self.script.borrow_mut().pop_front().unwrap_or(Ok(None))
    }
}
