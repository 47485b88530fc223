use std::fmt;
use std::ops::{Index, IndexMut, RangeInclusive};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::Angle;

use crate::{EdgeID, TurnInstruction, STRAIGHT_ANGLE};

/// One outgoing edge of an intersection, seen from the edge a driver arrives
/// on. `angle` is the turn angle: 0 goes back along the via edge, 180
/// continues straight through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectedRoad {
    pub eid: EdgeID,
    pub angle: Angle,
    /// Compass bearing of the road as it leaves the node. Informational only.
    pub bearing: Angle,
    /// Roads closed in this direction still get labeled; they're just not a
    /// viable driving choice.
    pub entry_allowed: bool,
    pub instruction: TurnInstruction,
}

impl ConnectedRoad {
    pub fn new(eid: EdgeID, angle: Angle, bearing: Angle, entry_allowed: bool) -> ConnectedRoad {
        ConnectedRoad {
            eid,
            angle,
            bearing,
            entry_allowed,
            instruction: TurnInstruction::NO_TURN,
        }
    }

    /// Reflect across the straight axis, swapping left and right. The U-turn
    /// road is its own reflection and keeps its instruction.
    pub fn mirror(&mut self) {
        if self.angle != Angle::ZERO {
            self.angle = self.angle.mirror();
            self.instruction.direction_modifier = self.instruction.direction_modifier.mirror();
        }
    }

    pub fn mirrored_copy(&self) -> ConnectedRoad {
        let mut copy = self.clone();
        copy.mirror();
        copy
    }
}

impl fmt::Display for ConnectedRoad {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[connection] {} allows entry: {} angle: {} bearing: {} instruction: {:?}",
            self.eid, self.entry_allowed, self.angle, self.bearing, self.instruction
        )
    }
}

/// The road closest to going straight, and how far from straight it is.
#[derive(Clone, Copy, Debug)]
pub struct StraightestTurn {
    pub index: usize,
    pub deviation_from_straight: Angle,
}

/// The angle-sorted roads leaving one node. Index 0 is always the U-turn
/// back along the via edge; indices then proceed counter-clockwise from
/// sharp right through straight to sharp left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    roads: Vec<ConnectedRoad>,
}

impl Intersection {
    /// Sorts the roads by angle and checks the basic shape. The first road
    /// after sorting must point back along the via edge.
    pub fn new(mut roads: Vec<ConnectedRoad>) -> Result<Intersection> {
        if roads.is_empty() {
            bail!("an intersection needs at least the U-turn road");
        }
        roads.sort_by(|a, b| a.angle.cmp(&b.angle));
        if roads[0].angle.normalized_degrees() >= 0.001 {
            bail!(
                "the first road turns by {}, it should point back along the via edge",
                roads[0].angle
            );
        }
        Ok(Intersection { roads })
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectedRoad> {
        self.roads.iter()
    }

    pub fn is_valid(&self) -> bool {
        !self.roads.is_empty()
            && self.roads.windows(2).all(|pair| pair[0].angle <= pair[1].angle)
            && self.roads[0].angle.normalized_degrees() < 0.001
    }

    /// The index of the road whose angle is closest to `angle`.
    pub fn find_closest_turn(&self, angle: Angle) -> usize {
        self.roads
            .iter()
            .enumerate()
            .min_by_key(|(_, road)| road.angle.deviation(angle))
            .map(|(index, _)| index)
            .unwrap()
    }

    /// The entry-allowed road closest to going straight. Falls back to index
    /// 0 with a deviation of 180 when nothing is enterable.
    pub fn find_closest_to_straight(&self) -> StraightestTurn {
        let mut best = StraightestTurn {
            index: 0,
            deviation_from_straight: Angle::degrees(180.0),
        };
        for (index, road) in self.roads.iter().enumerate().skip(1) {
            let deviation = road.angle.deviation(STRAIGHT_ANGLE);
            if road.entry_allowed && deviation < best.deviation_from_straight {
                best = StraightestTurn {
                    index,
                    deviation_from_straight: deviation,
                };
            }
        }
        best
    }

    /// Do all roads in the inclusive range allow entry?
    pub fn has_valid_entries(&self, range: RangeInclusive<usize>) -> bool {
        self.roads[range].iter().all(|road| road.entry_allowed)
    }

    /// Mirror every road and flip the order of everything but the U-turn.
    /// Applying it twice restores the original.
    pub(crate) fn switch_left_and_right(&mut self) {
        debug_assert!(!self.roads.is_empty());
        for road in &mut self.roads {
            road.mirror();
        }
        self.roads[1..].reverse();
    }
}

impl Index<usize> for Intersection {
    type Output = ConnectedRoad;

    fn index(&self, index: usize) -> &ConnectedRoad {
        &self.roads[index]
    }
}

impl IndexMut<usize> for Intersection {
    fn index_mut(&mut self, index: usize) -> &mut ConnectedRoad {
        &mut self.roads[index]
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Intersection ({} roads):", self.roads.len())?;
        for road in &self.roads {
            writeln!(f, "  {}", road)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn road(angle: f64, entry_allowed: bool) -> ConnectedRoad {
        ConnectedRoad::new(
            EdgeID(0),
            Angle::degrees(angle),
            Angle::degrees(angle),
            entry_allowed,
        )
    }

    #[test]
    fn test_new_sorts_and_validates() {
        let i = Intersection::new(vec![road(270.0, true), road(0.0, true), road(90.0, true)])
            .unwrap();
        assert_eq!(i[0].angle, Angle::ZERO);
        assert_eq!(i[1].angle, Angle::degrees(90.0));
        assert_eq!(i[2].angle, Angle::degrees(270.0));
        assert!(i.is_valid());

        assert!(Intersection::new(Vec::new()).is_err());
        assert!(Intersection::new(vec![road(90.0, true), road(180.0, true)]).is_err());
    }

    #[test]
    fn test_find_closest_turn() {
        let i = Intersection::new(vec![road(0.0, true), road(90.0, true), road(200.0, true)])
            .unwrap();
        assert_eq!(i.find_closest_turn(Angle::degrees(80.0)), 1);
        assert_eq!(i.find_closest_turn(Angle::degrees(185.0)), 2);
        assert_eq!(i.find_closest_turn(Angle::degrees(350.0)), 0);
    }

    #[test]
    fn test_find_closest_to_straight_skips_closed_roads() {
        let i = Intersection::new(vec![road(0.0, true), road(90.0, true), road(180.0, false)])
            .unwrap();
        let straightest = i.find_closest_to_straight();
        assert_eq!(straightest.index, 1);
        assert_eq!(straightest.deviation_from_straight, Angle::degrees(90.0));

        let nothing = Intersection::new(vec![road(0.0, true), road(180.0, false)]).unwrap();
        assert_eq!(nothing.find_closest_to_straight().index, 0);
    }

    #[test]
    fn test_has_valid_entries() {
        let i = Intersection::new(vec![road(0.0, true), road(90.0, true), road(180.0, false)])
            .unwrap();
        assert!(i.has_valid_entries(1..=1));
        assert!(!i.has_valid_entries(1..=2));
    }

    #[test]
    fn test_switch_left_and_right_is_an_involution() {
        let mut i = Intersection::new(vec![
            road(0.0, true),
            road(85.0, true),
            road(170.0, false),
            road(280.0, true),
        ])
        .unwrap();
        let original = i.clone();

        i.switch_left_and_right();
        assert_eq!(i[0].angle, Angle::ZERO);
        assert_eq!(i[1].angle, Angle::degrees(80.0));
        assert_eq!(i[2].angle, Angle::degrees(190.0));
        assert_eq!(i[3].angle, Angle::degrees(275.0));
        assert!(i.is_valid());

        i.switch_left_and_right();
        assert_eq!(i, original);
    }
}
