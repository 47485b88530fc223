//! Turn classification for road-network intersections. Given the edge a
//! driver arrives on and the angle-sorted roads leaving the node, label every
//! outgoing road with a turn type and a direction modifier. The labels later
//! drive human-readable navigation guidance; everything here is pure decision
//! logic over angles and road classes.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use geom::Angle;

mod classification;
mod classify;
mod intersection;
mod names;
mod network;
mod turn;

pub use crate::classification::{
    can_be_seen_as_fork, obvious_by_road_class, RoadClass, RoadClassification,
};
pub use crate::classify::TurnClassifier;
pub use crate::intersection::{ConnectedRoad, Intersection, StraightestTurn};
pub use crate::names::{requires_name_announced, NameID, NameTable, SuffixTable};
pub use crate::network::{EdgeData, EdgeID, RoadNetwork};
pub use crate::turn::{get_turn_direction, DirectionModifier, TurnInstruction, TurnType};

/// The angle of a turn that continues straight through the intersection.
pub const STRAIGHT_ANGLE: Angle = Angle::const_degrees(180.0);
/// Deviation from a canonical direction below which a turn still reads as
/// exactly that direction.
pub const MAXIMAL_ALLOWED_NO_TURN_DEVIATION: Angle = Angle::const_degrees(3.0);
/// Two turns closer together than this are nearly indistinguishable.
pub const NARROW_TURN_ANGLE: Angle = Angle::const_degrees(40.0);
/// Two adjacent roads further apart than this are clearly separated.
pub const GROUP_ANGLE: Angle = Angle::const_degrees(60.0);
/// Angle differences below this count as effectively equal.
pub const FUZZY_ANGLE_DIFFERENCE: Angle = Angle::const_degrees(15.0);
/// Deviation ratio above which one turn reads as much narrower than another.
pub const INCREASES_BY_FOURTY_PERCENT: f64 = 1.4;
