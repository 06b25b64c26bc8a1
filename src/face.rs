use serde::{Deserialize, Serialize};

use crate::math::{Quaternion, Vec3};

/// Alignment magnitudes below this count as neither face: the coin is on
/// its rim.
pub const EDGE_BAND: f64 = 0.1;

/// Which way a settled coin ended up.
///
/// `Edge` never escapes the public flip API; the controller retries it and
/// the debug entry reports it as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Heads,
    Tails,
    Edge,
}

/// The caller-visible result of a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Heads,
    Tails,
}

impl Face {
    pub fn to_outcome(self) -> Option<Outcome> {
        match self {
            Face::Heads => Some(Outcome::Heads),
            Face::Tails => Some(Outcome::Tails),
            Face::Edge => None,
        }
    }
}

/// Classifies a settled orientation by how the heads-side normal aligns
/// with world up: `align = (q · (0,1,0)).y`.
pub fn evaluate(orientation: Quaternion) -> Face {
    let align = orientation.rotate(Vec3::UP).y;
    if align > EDGE_BAND {
        Face::Heads
    } else if align < -EDGE_BAND {
        Face::Tails
    } else {
        Face::Edge
    }
}
