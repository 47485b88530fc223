//! Distributing turns across one side of a complex intersection. The left
//! side reuses the right-side rules through mirroring, so the combinatorial
//! logic exists only once.

use geom::Angle;

use crate::classification::can_be_seen_as_fork;
use crate::{
    get_turn_direction, DirectionModifier, EdgeID, Intersection, TurnInstruction, GROUP_ANGLE,
    MAXIMAL_ALLOWED_NO_TURN_DEVIATION, NARROW_TURN_ANGLE,
};

use super::TurnClassifier;

impl TurnClassifier<'_> {
    /// Assign turns left of the pivot: mirror the intersection, run the
    /// right-side rules, mirror back.
    pub(crate) fn assign_left_turns(
        &self,
        via: EdgeID,
        intersection: &mut Intersection,
        starting_at: usize,
    ) {
        debug_assert!(starting_at <= intersection.len());
        intersection.switch_left_and_right();
        // the roads [starting_at, len) land on [1, count) after the flip
        let count = intersection.len() - starting_at + 1;
        self.assign_right_turns(via, intersection, count);
        intersection.switch_left_and_right();
    }

    /// Assign turns to the roads [1, up_to) right of the pivot. At most
    /// three make sense on one side; roads sharing a coarse direction get
    /// resolved pairwise.
    pub(crate) fn assign_right_turns(
        &self,
        via: EdgeID,
        intersection: &mut Intersection,
        up_to: usize,
    ) {
        debug_assert!(up_to <= intersection.len());
        let valid_count = (1..up_to)
            .filter(|index| intersection[*index].entry_allowed)
            .count();
        if up_to <= 1 || valid_count == 0 {
            return;
        }

        if up_to == 2 {
            self.assign_trivial_turns(via, intersection, 1, up_to);
        } else if up_to == 3 {
            let first_direction = get_turn_direction(intersection[1].angle);
            let second_direction = get_turn_direction(intersection[2].angle);
            if first_direction == second_direction {
                self.handle_distinct_conflict(via, intersection, 2, 1);
            } else {
                self.assign_trivial_turns(via, intersection, 1, up_to);
            }
        } else if up_to == 4 {
            let first_direction = get_turn_direction(intersection[1].angle);
            let second_direction = get_turn_direction(intersection[2].angle);
            let third_direction = get_turn_direction(intersection[3].angle);
            let allowed = (1..=3)
                .filter(|index| intersection[*index].entry_allowed)
                .count();
            let gap_one_two = intersection[1].angle.deviation(intersection[2].angle);
            let gap_two_three = intersection[2].angle.deviation(intersection[3].angle);

            if first_direction != second_direction && second_direction != third_direction {
                // the circular order makes all three unique
                debug_assert!(first_direction != third_direction);
                self.assign_trivial_turns(via, intersection, 1, up_to);
            } else if allowed <= 2 {
                // at least one closed road; resolve the remaining pair
                if !intersection[3].entry_allowed {
                    self.handle_distinct_conflict(via, intersection, 2, 1);
                } else if !intersection[1].entry_allowed {
                    self.handle_distinct_conflict(via, intersection, 3, 2);
                } else {
                    // a single open road, or exactly 1 and 3
                    self.handle_distinct_conflict(via, intersection, 3, 1);
                }
            } else if gap_one_two >= NARROW_TURN_ANGLE && gap_two_three >= NARROW_TURN_ANGLE {
                // conflicting labels but a real angular spread: force it
                let turn_type = self.find_basic_turn_type(via, &intersection[1]);
                intersection[1].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::SharpRight);
                let turn_type = self.find_basic_turn_type(via, &intersection[2]);
                intersection[2].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::Right);
                let turn_type = self.find_basic_turn_type(via, &intersection[3]);
                intersection[3].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::SlightRight);
            } else if (first_direction == second_direction && second_direction == third_direction)
                || (first_direction == second_direction && gap_two_three < GROUP_ANGLE)
                || (second_direction == third_direction && gap_one_two < GROUP_ANGLE)
            {
                self.assign_trivial_turns(via, intersection, 1, up_to);
            } else if (first_direction == second_direction && gap_two_three >= GROUP_ANGLE)
                || (second_direction == third_direction && gap_one_two >= GROUP_ANGLE)
            {
                // one clustered pair plus an isolated road
                if gap_two_three >= GROUP_ANGLE {
                    self.handle_distinct_conflict(via, intersection, 2, 1);
                    let turn_type = self.find_basic_turn_type(via, &intersection[3]);
                    intersection[3].instruction = TurnInstruction::new(turn_type, third_direction);
                } else {
                    let turn_type = self.find_basic_turn_type(via, &intersection[1]);
                    intersection[1].instruction = TurnInstruction::new(turn_type, first_direction);
                    self.handle_distinct_conflict(via, intersection, 3, 2);
                }
            } else {
                self.assign_trivial_turns(via, intersection, 1, up_to);
            }
        } else {
            self.assign_trivial_turns(via, intersection, 1, up_to);
        }
    }

    /// Two roads on one side ended up with the same coarse direction; nudge
    /// their labels apart so both stay announceable. `right` sits at the
    /// smaller angle.
    pub(crate) fn handle_distinct_conflict(
        &self,
        via: EdgeID,
        intersection: &mut Intersection,
        left: usize,
        right: usize,
    ) {
        let left_angle = intersection[left].angle;
        let right_angle = intersection[right].angle;
        let left_allowed = intersection[left].entry_allowed;
        let right_allowed = intersection[right].entry_allowed;

        // a single open turn, or several roads stacked on the same angle
        if !left_allowed || !right_allowed || left_angle == right_angle {
            if left_angle == right_angle {
                warn!(
                    "roads {} and {} leave at the identical angle {}",
                    intersection[right].eid, intersection[left].eid, left_angle
                );
            }
            if left_allowed {
                let instruction = TurnInstruction::new(
                    self.find_basic_turn_type(via, &intersection[left]),
                    get_turn_direction(left_angle),
                );
                intersection[left].instruction = instruction;
            }
            if right_allowed {
                let instruction = TurnInstruction::new(
                    self.find_basic_turn_type(via, &intersection[right]),
                    get_turn_direction(right_angle),
                );
                intersection[right].instruction = instruction;
            }
            return;
        }

        let left_direction = get_turn_direction(left_angle);
        let right_direction = get_turn_direction(right_angle);

        if left_direction == DirectionModifier::Straight
            || left_direction == DirectionModifier::SlightLeft
            || right_direction == DirectionModifier::SlightRight
        {
            let left_classification = self.network.edge(intersection[left].eid).classification;
            let right_classification = self.network.edge(intersection[right].eid).classification;
            if can_be_seen_as_fork(left_classification, right_classification) {
                self.assign_fork(via, intersection, left, right);
            } else if left_classification.priority() > right_classification.priority() {
                let instruction =
                    self.instruction_for_obvious(4, via, false, &intersection[right]);
                intersection[right].instruction = instruction;
                let turn_type = self.find_basic_turn_type(via, &intersection[left]);
                intersection[left].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::SlightLeft);
            } else {
                let instruction = self.instruction_for_obvious(4, via, false, &intersection[left]);
                intersection[left].instruction = instruction;
                let turn_type = self.find_basic_turn_type(via, &intersection[right]);
                intersection[right].instruction =
                    TurnInstruction::new(turn_type, DirectionModifier::SlightRight);
            }
            // once this branch decides, the geometric fixups below must not
            // overwrite it
            return;
        }

        let left_type = self.find_basic_turn_type(via, &intersection[left]);
        let right_type = self.find_basic_turn_type(via, &intersection[right]);

        // two right turns straddling the canonical 90
        if left_angle.deviation(Angle::degrees(90.0)) < MAXIMAL_ALLOWED_NO_TURN_DEVIATION {
            intersection[left].instruction =
                TurnInstruction::new(left_type, DirectionModifier::Right);
            intersection[right].instruction =
                TurnInstruction::new(right_type, DirectionModifier::SharpRight);
            return;
        }
        if right_angle.deviation(Angle::degrees(90.0)) < MAXIMAL_ALLOWED_NO_TURN_DEVIATION {
            intersection[left].instruction =
                TurnInstruction::new(left_type, DirectionModifier::SlightRight);
            intersection[right].instruction =
                TurnInstruction::new(right_type, DirectionModifier::Right);
            return;
        }
        // and two left turns around the canonical 270
        if left_angle.deviation(Angle::degrees(270.0)) < MAXIMAL_ALLOWED_NO_TURN_DEVIATION {
            intersection[left].instruction =
                TurnInstruction::new(left_type, DirectionModifier::Left);
            intersection[right].instruction =
                TurnInstruction::new(right_type, DirectionModifier::SlightLeft);
            return;
        }
        if right_angle.deviation(Angle::degrees(270.0)) < MAXIMAL_ALLOWED_NO_TURN_DEVIATION {
            intersection[left].instruction =
                TurnInstruction::new(left_type, DirectionModifier::SharpLeft);
            intersection[right].instruction =
                TurnInstruction::new(right_type, DirectionModifier::Left);
            return;
        }

        // shift whichever label costs less
        if left_direction == DirectionModifier::SharpLeft {
            intersection[left].instruction =
                TurnInstruction::new(left_type, DirectionModifier::SharpLeft);
            intersection[right].instruction =
                TurnInstruction::new(right_type, DirectionModifier::Left);
            return;
        }
        if right_direction == DirectionModifier::SharpRight {
            intersection[left].instruction =
                TurnInstruction::new(left_type, DirectionModifier::Right);
            intersection[right].instruction =
                TurnInstruction::new(right_type, DirectionModifier::SharpRight);
            return;
        }

        if left_direction == DirectionModifier::Right {
            // break the tie by who sits closer to a plain right turn
            if left_angle.deviation(Angle::degrees(85.0))
                >= right_angle.deviation(Angle::degrees(85.0))
            {
                intersection[left].instruction =
                    TurnInstruction::new(left_type, DirectionModifier::Right);
                intersection[right].instruction =
                    TurnInstruction::new(right_type, DirectionModifier::SharpRight);
            } else {
                intersection[left].instruction =
                    TurnInstruction::new(left_type, DirectionModifier::SlightRight);
                intersection[right].instruction =
                    TurnInstruction::new(right_type, DirectionModifier::Right);
            }
        } else {
            if left_angle.deviation(Angle::degrees(265.0))
                >= right_angle.deviation(Angle::degrees(265.0))
            {
                intersection[left].instruction =
                    TurnInstruction::new(left_type, DirectionModifier::SharpLeft);
                intersection[right].instruction =
                    TurnInstruction::new(right_type, DirectionModifier::Left);
            } else {
                intersection[left].instruction =
                    TurnInstruction::new(left_type, DirectionModifier::Left);
                intersection[right].instruction =
                    TurnInstruction::new(right_type, DirectionModifier::SlightLeft);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::Angle;

    use crate::{
        ConnectedRoad, DirectionModifier, EdgeData, EdgeID, Intersection, NameTable, RoadClass,
        RoadClassification, RoadNetwork, SuffixTable, TurnClassifier,
    };

    fn residential_network(edges: usize) -> RoadNetwork {
        let mut network = RoadNetwork::new();
        for _ in 0..edges {
            network.add_edge(EdgeData {
                classification: RoadClassification::new(RoadClass::Residential),
                name: None,
            });
        }
        network
    }

    fn intersection(angles: Vec<f64>) -> Intersection {
        let roads = angles
            .into_iter()
            .enumerate()
            .map(|(i, angle)| {
                ConnectedRoad::new(EdgeID(i), Angle::degrees(angle), Angle::degrees(angle), true)
            })
            .collect();
        Intersection::new(roads).unwrap()
    }

    #[test]
    fn test_two_right_turns_get_distinct_labels() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // both roads map to Right; the one nearer 85 keeps it
        let mut i = intersection(vec![0.0, 70.0, 110.0]);
        classifier.assign_right_turns(EdgeID(0), &mut i, 3);
        assert_eq!(
            i[1].instruction.direction_modifier,
            DirectionModifier::SharpRight
        );
        assert_eq!(i[2].instruction.direction_modifier, DirectionModifier::Right);
    }

    #[test]
    fn test_conflict_around_canonical_right() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // the road at 91 is a perfect right turn; its neighbor shifts
        let mut i = intersection(vec![0.0, 91.0, 130.0]);
        classifier.handle_distinct_conflict(EdgeID(0), &mut i, 2, 1);
        assert_eq!(i[1].instruction.direction_modifier, DirectionModifier::Right);
        assert_eq!(
            i[2].instruction.direction_modifier,
            DirectionModifier::SlightRight
        );
    }

    #[test]
    fn test_three_spread_rights_are_forced_apart() {
        let network = residential_network(4);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        let mut i = intersection(vec![0.0, 65.0, 110.0, 155.0]);
        classifier.assign_right_turns(EdgeID(0), &mut i, 4);
        assert_eq!(
            i[1].instruction.direction_modifier,
            DirectionModifier::SharpRight
        );
        assert_eq!(i[2].instruction.direction_modifier, DirectionModifier::Right);
        assert_eq!(
            i[3].instruction.direction_modifier,
            DirectionModifier::SlightRight
        );
    }

    #[test]
    fn test_left_turns_mirror_the_right_rules() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // the mirror image of the two-right-turns case
        let mut i = intersection(vec![0.0, 250.0, 290.0]);
        classifier.assign_left_turns(EdgeID(0), &mut i, 1);
        assert_eq!(
            i[1].instruction.direction_modifier,
            DirectionModifier::Left
        );
        assert_eq!(
            i[2].instruction.direction_modifier,
            DirectionModifier::SharpLeft
        );
    }

    #[test]
    fn test_closed_road_keeps_its_default() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        let mut i = intersection(vec![0.0, 70.0, 110.0]);
        i[1].entry_allowed = false;
        classifier.assign_right_turns(EdgeID(0), &mut i, 3);
        assert_eq!(i[1].instruction, crate::TurnInstruction::NO_TURN);
        assert_eq!(i[2].instruction.direction_modifier, DirectionModifier::Right);
    }
}
