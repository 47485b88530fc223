//! The turn classifier: decides, for every road leaving an intersection,
//! which turn type and direction modifier a driver should hear about.
//!
//! The decision logic branches on the intersection's size. One and two
//! connected roads are trivial; three roads distinguish forks,
//! end-of-road T shapes and obvious continuations; anything bigger is split
//! into a left and a right side around a pivot and each side is labeled on
//! its own, with the left side reusing the right-side rules through
//! mirroring.

mod fork;
mod obvious;
mod sides;

use geom::Angle;

use crate::{
    get_turn_direction, ConnectedRoad, DirectionModifier, EdgeID, Intersection, NameTable,
    RoadNetwork, SuffixTable, TurnInstruction, TurnType, FUZZY_ANGLE_DIFFERENCE, NARROW_TURN_ANGLE,
    STRAIGHT_ANGLE,
};

use crate::classification::can_be_seen_as_fork;

/// Classifies all turns at one intersection. Borrows the surrounding graph
/// and the name tables read-only; every call is pure and owns its
/// intersection.
pub struct TurnClassifier<'a> {
    network: &'a RoadNetwork,
    names: &'a NameTable,
    suffixes: &'a SuffixTable,
}

impl<'a> TurnClassifier<'a> {
    pub fn new(
        network: &'a RoadNetwork,
        names: &'a NameTable,
        suffixes: &'a SuffixTable,
    ) -> TurnClassifier<'a> {
        TurnClassifier {
            network,
            names,
            suffixes,
        }
    }

    /// Part of the handler-chain contract; this classifier handles anything.
    pub fn can_process(&self, _via: EdgeID, _intersection: &Intersection) -> bool {
        true
    }

    /// Label every connected road with a turn instruction. The intersection
    /// comes in angle-sorted with the U-turn at index 0 and leaves with only
    /// the `instruction` fields changed.
    pub fn classify(&self, via: EdgeID, mut intersection: Intersection) -> Intersection {
        debug_assert!(intersection.is_valid(), "bad intersection: {}", intersection);

        if intersection.len() == 1 {
            return self.handle_one_way(intersection);
        }

        if intersection[0].entry_allowed {
            intersection[0].instruction = TurnInstruction::new(
                self.find_basic_turn_type(via, &intersection[0]),
                DirectionModifier::UTurn,
            );
        }

        let mut intersection = match intersection.len() {
            2 => self.handle_two_way(via, intersection),
            3 => self.handle_three_way(via, intersection),
            _ => self.handle_complex(via, intersection),
        };

        // Closed roads still get labeled, so downstream can render them as
        // visible-but-not-selectable choices.
        for index in 1..intersection.len() {
            if intersection[index].instruction == TurnInstruction::NO_TURN {
                let instruction = TurnInstruction::new(
                    self.find_basic_turn_type(via, &intersection[index]),
                    get_turn_direction(intersection[index].angle),
                );
                intersection[index].instruction = instruction;
            }
        }
        intersection
    }

    fn handle_one_way(&self, intersection: Intersection) -> Intersection {
        debug_assert!(intersection[0].angle.normalized_degrees() < 0.001);
        intersection
    }

    fn handle_two_way(&self, via: EdgeID, mut intersection: Intersection) -> Intersection {
        let instruction =
            self.instruction_for_obvious(intersection.len(), via, false, &intersection[1]);
        intersection[1].instruction = instruction;
        intersection
    }

    fn handle_three_way(&self, via: EdgeID, mut intersection: Intersection) -> Intersection {
        debug_assert_eq!(intersection.len(), 3);
        let obvious_index = self.find_obvious_turn(via, &intersection);
        let fork = self.find_fork(via, &intersection);

        if fork.is_some() && obvious_index == 0 {
            // two nearly straight turns ahead of us
            let fork = fork.unwrap();
            self.assign_fork(via, &mut intersection, fork.left, fork.right);
        } else if is_end_of_road(&intersection[0], &intersection[1], &intersection[2])
            && obvious_index == 0
        {
            // the via edge dead-ends into a cross street; only left and right
            // remain
            if intersection[1].entry_allowed {
                let turn_type =
                    if self.find_basic_turn_type(via, &intersection[1]) == TurnType::OnRamp {
                        TurnType::OnRamp
                    } else {
                        TurnType::EndOfRoad
                    };
                intersection[1].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::Right);
            }
            if intersection[2].entry_allowed {
                let turn_type =
                    if self.find_basic_turn_type(via, &intersection[2]) == TurnType::OnRamp {
                        TurnType::OnRamp
                    } else {
                        TurnType::EndOfRoad
                    };
                intersection[2].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::Left);
            }
        } else if obvious_index != 0 {
            let direction_at_one = get_turn_direction(intersection[1].angle);
            let direction_at_two = get_turn_direction(intersection[2].angle);
            if obvious_index == 1 {
                let instruction = self.instruction_for_obvious(
                    3,
                    via,
                    self.is_through_street(1, &intersection),
                    &intersection[1],
                );
                intersection[1].instruction = instruction;
                // when both leftovers would read straight, nudge the left one
                // so the two stay distinguishable
                let second_direction = if direction_at_one == direction_at_two
                    && direction_at_two == DirectionModifier::Straight
                {
                    DirectionModifier::SlightLeft
                } else {
                    direction_at_two
                };
                let turn_type = self.find_basic_turn_type(via, &intersection[2]);
                intersection[2].instruction = TurnInstruction::new(turn_type, second_direction);
            } else {
                debug_assert_eq!(obvious_index, 2);
                let instruction = self.instruction_for_obvious(
                    3,
                    via,
                    self.is_through_street(2, &intersection),
                    &intersection[2],
                );
                intersection[2].instruction = instruction;
                let first_direction = if direction_at_one == direction_at_two
                    && direction_at_one == DirectionModifier::Straight
                {
                    DirectionModifier::SlightRight
                } else {
                    direction_at_one
                };
                let turn_type = self.find_basic_turn_type(via, &intersection[1]);
                intersection[1].instruction = TurnInstruction::new(turn_type, first_direction);
            }
        } else {
            let instruction = TurnInstruction::new(
                self.find_basic_turn_type(via, &intersection[1]),
                get_turn_direction(intersection[1].angle),
            );
            intersection[1].instruction = instruction;
            let instruction = TurnInstruction::new(
                self.find_basic_turn_type(via, &intersection[2]),
                get_turn_direction(intersection[2].angle),
            );
            intersection[2].instruction = instruction;
        }
        intersection
    }

    fn handle_complex(&self, via: EdgeID, mut intersection: Intersection) -> Intersection {
        let obvious_index = self.find_obvious_turn(via, &intersection);
        let fork = self.find_fork(via, &intersection);
        let straightest = intersection.find_closest_to_straight();
        let size = intersection.len();

        if obvious_index != 0 {
            let instruction = self.instruction_for_obvious(
                size,
                via,
                self.is_through_street(obvious_index, &intersection),
                &intersection[obvious_index],
            );
            intersection[obvious_index].instruction = instruction;

            self.assign_left_turns(via, &mut intersection, obvious_index + 1);
            self.assign_right_turns(via, &mut intersection, obvious_index);
        } else if let Some(fork) = fork {
            if fork.size() == 2 {
                let left_classification =
                    self.network.edge(intersection[fork.left].eid).classification;
                let right_classification =
                    self.network.edge(intersection[fork.right].eid).classification;
                if can_be_seen_as_fork(left_classification, right_classification) {
                    self.assign_fork(via, &mut intersection, fork.left, fork.right);
                } else if left_classification.priority() > right_classification.priority() {
                    // the right prong is the main line; the left one merely
                    // splits off
                    let instruction =
                        self.instruction_for_obvious(size, via, false, &intersection[fork.right]);
                    intersection[fork.right].instruction = instruction;
                    let turn_type = self.find_basic_turn_type(via, &intersection[fork.left]);
                    intersection[fork.left].instruction =
                        TurnInstruction::new(turn_type, DirectionModifier::SlightLeft);
                } else {
                    let instruction =
                        self.instruction_for_obvious(size, via, false, &intersection[fork.left]);
                    intersection[fork.left].instruction = instruction;
                    let turn_type = self.find_basic_turn_type(via, &intersection[fork.right]);
                    intersection[fork.right].instruction =
                        TurnInstruction::new(turn_type, DirectionModifier::SlightRight);
                }
            } else {
                debug_assert_eq!(fork.size(), 3);
                self.assign_three_way_fork(
                    &mut intersection,
                    fork.left,
                    fork.right + 1,
                    fork.right,
                );
            }
            self.assign_left_turns(via, &mut intersection, fork.left + 1);
            self.assign_right_turns(via, &mut intersection, fork.right);
        } else if straightest.deviation_from_straight < FUZZY_ANGLE_DIFFERENCE
            && !intersection[straightest.index].entry_allowed
        {
            // a geometric straight exists but can't be entered; split around it
            self.assign_left_turns(via, &mut intersection, straightest.index + 1);
            self.assign_right_turns(via, &mut intersection, straightest.index);
        } else if intersection[straightest.index].angle > STRAIGHT_ANGLE {
            // no straight turn; the straightest road sits on the left half
            self.assign_left_turns(via, &mut intersection, straightest.index);
            self.assign_right_turns(via, &mut intersection, straightest.index);
        } else if intersection[straightest.index].angle < STRAIGHT_ANGLE {
            self.assign_left_turns(via, &mut intersection, straightest.index + 1);
            self.assign_right_turns(via, &mut intersection, straightest.index + 1);
        } else {
            self.assign_trivial_turns(via, &mut intersection, 1, size);
        }
        intersection
    }
}

// A T shape: the right turn near 90, the left turn near 270, and the two
// wide apart.
fn is_end_of_road(
    _uturn: &ConnectedRoad,
    possible_right_turn: &ConnectedRoad,
    possible_left_turn: &ConnectedRoad,
) -> bool {
    possible_right_turn.angle.deviation(Angle::degrees(90.0)) < NARROW_TURN_ANGLE
        && possible_left_turn.angle.deviation(Angle::degrees(270.0)) < NARROW_TURN_ANGLE
        && possible_right_turn.angle.deviation(possible_left_turn.angle) > NARROW_TURN_ANGLE * 2.0
}
