// mcl_core/src/models/measurement/correspondence.rs

use crate::mapping::{LandmarkId, LineLandmark, PointLandmark};
use crate::messages::LandmarkAssociation;

/// Anything in the map an observation can be matched against.
pub trait Landmark {
    fn id(&self) -> LandmarkId;
}

impl Landmark for PointLandmark {
    fn id(&self) -> LandmarkId {
        self.id
    }
}

impl Landmark for LineLandmark {
    fn id(&self) -> LandmarkId {
        self.id
    }
}

/// The landmark chosen for one observation under one pose hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    pub landmark: LandmarkId,
    /// Squared normalised discrepancy between expected and measured geometry.
    pub discrepancy: f64,
}

/// Resolves an association into the best-fitting landmark.
///
/// `Known` is matched directly. `Candidates` and `Unknown` pick the landmark
/// with the smallest discrepancy under the caller's pose, so two particles may
/// legitimately match the same sighting to different landmarks.
pub fn best_match<'m, L, F, S>(
    association: &LandmarkAssociation,
    lookup: F,
    all: &'m [L],
    score: S,
) -> Option<Correspondence>
where
    L: Landmark + 'm,
    F: Fn(LandmarkId) -> Option<&'m L>,
    S: Fn(&L) -> f64,
{
    let evaluate = |landmark: &L| Correspondence {
        landmark: landmark.id(),
        discrepancy: score(landmark),
    };

    match association {
        LandmarkAssociation::Known(id) => lookup(*id).map(evaluate),
        LandmarkAssociation::Candidates(ids) => ids
            .iter()
            .filter_map(|id| lookup(*id))
            .map(evaluate)
            .min_by(|a, b| a.discrepancy.total_cmp(&b.discrepancy)),
        LandmarkAssociation::Unknown => all
            .iter()
            .map(evaluate)
            .min_by(|a, b| a.discrepancy.total_cmp(&b.discrepancy)),
    }
}
