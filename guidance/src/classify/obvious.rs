//! Shared turn utilities: the obviousness oracle and the basic instruction
//! builders every intersection size relies on.

use geom::Angle;

use crate::classification::obvious_by_road_class;
use crate::names::requires_name_announced;
use crate::{
    get_turn_direction, ConnectedRoad, DirectionModifier, EdgeID, Intersection, NameID,
    TurnInstruction, TurnType, FUZZY_ANGLE_DIFFERENCE, INCREASES_BY_FOURTY_PERCENT,
    MAXIMAL_ALLOWED_NO_TURN_DEVIATION, NARROW_TURN_ANGLE, STRAIGHT_ANGLE,
};

use super::TurnClassifier;

impl TurnClassifier<'_> {
    // Whether going from `from` to `to` deserves a spoken announcement.
    pub(crate) fn requires_announcement(&self, from: Option<NameID>, to: Option<NameID>) -> bool {
        if from == to {
            return false;
        }
        let from_name = from.map(|id| self.names.get(id)).unwrap_or("");
        let to_name = to.map(|id| self.names.get(id)).unwrap_or("");
        requires_name_announced(from_name, to_name, self.suffixes)
    }

    /// The undecorated type of a turn onto `road`, before any obviousness or
    /// geometry refinements.
    pub fn find_basic_turn_type(&self, via: EdgeID, road: &ConnectedRoad) -> TurnType {
        let via_data = self.network.edge(via);
        let road_data = self.network.edge(road.eid);

        let on_ramp = via_data.classification.is_link();
        let onto_ramp = road_data.classification.is_link();
        if !on_ramp && onto_ramp {
            return TurnType::OnRamp;
        }
        if via_data.name.is_some() && !self.requires_announcement(via_data.name, road_data.name) {
            return TurnType::Continue;
        }
        TurnType::Turn
    }

    /// The instruction for a road that is the unambiguous continuation.
    pub fn instruction_for_obvious(
        &self,
        num_roads: usize,
        via: EdgeID,
        is_through_street: bool,
        road: &ConnectedRoad,
    ) -> TurnInstruction {
        debug_assert!(num_roads >= 2);
        let turn_type = self.find_basic_turn_type(via, road);
        if turn_type == TurnType::OnRamp {
            return TurnInstruction::new(TurnType::OnRamp, get_turn_direction(road.angle));
        }
        if road.angle.deviation(Angle::ZERO) < Angle::degrees(0.01) {
            return TurnInstruction::new(TurnType::Continue, DirectionModifier::UTurn);
        }
        if turn_type == TurnType::Turn {
            // obvious, but the name changes
            return TurnInstruction::new(TurnType::NewName, get_turn_direction(road.angle));
        }
        if is_through_street {
            // staying on a street that runs through; nothing worth saying
            return TurnInstruction::new(TurnType::Suppressed, get_turn_direction(road.angle));
        }
        TurnInstruction::new(TurnType::Continue, get_turn_direction(road.angle))
    }

    /// Coming from `via`, does `road` clearly beat `other` as the
    /// continuation?
    pub fn is_obvious_of_two(
        &self,
        via: EdgeID,
        road: &ConnectedRoad,
        other: &ConnectedRoad,
    ) -> bool {
        let via_data = self.network.edge(via);
        let road_data = self.network.edge(road.eid);
        let other_data = self.network.edge(other.eid);

        // if one of the two roads is obvious by class, obviousness is trivial
        if obvious_by_road_class(
            via_data.classification,
            road_data.classification,
            other_data.classification,
        ) {
            return true;
        }
        if obvious_by_road_class(
            via_data.classification,
            other_data.classification,
            road_data.classification,
        ) {
            return false;
        }

        let turn_is_perfectly_straight =
            road.angle.deviation(STRAIGHT_ANGLE).normalized_degrees() < f64::EPSILON;
        let same_name = !self.requires_announcement(via_data.name, road_data.name);
        if turn_is_perfectly_straight && via_data.name.is_some() && same_name {
            return true;
        }

        let road_deviation = road.angle.deviation(STRAIGHT_ANGLE);
        let other_deviation = other.angle.deviation(STRAIGHT_ANGLE);
        other_deviation / road_deviation > INCREASES_BY_FOURTY_PERCENT
            && other_deviation.deviation(road_deviation) > FUZZY_ANGLE_DIFFERENCE
    }

    /// The index of the one road a driver would naturally continue on, or 0
    /// when no road stands out.
    pub fn find_obvious_turn(&self, via: EdgeID, intersection: &Intersection) -> usize {
        if intersection.len() == 1 {
            return 0;
        }
        if intersection.len() == 2 {
            return 1;
        }
        let straightest = intersection.find_closest_to_straight();
        if straightest.index == 0 {
            return 0;
        }
        let candidate = &intersection[straightest.index];
        for (index, other) in intersection.iter().enumerate().skip(1) {
            if index == straightest.index || !other.entry_allowed {
                continue;
            }
            if !self.is_obvious_of_two(via, candidate, other) {
                return 0;
            }
        }
        straightest.index
    }

    /// Is the road at `index` one half of a street that continues through
    /// the intersection under the same name? The road back along the via
    /// edge counts: continuing dead ahead on the street you're already on is
    /// the typical through street.
    pub fn is_through_street(&self, index: usize, intersection: &Intersection) -> bool {
        let name = self.network.edge(intersection[index].eid).name;
        if name.is_none() {
            return false;
        }
        intersection
            .iter()
            .enumerate()
            .any(|(other_index, other)| {
                let other_name = self.network.edge(other.eid).name;
                other_index != index
                    && other_name.is_some()
                    && !self.requires_announcement(name, other_name)
                    && other.angle.deviation(intersection[index].angle)
                        > STRAIGHT_ANGLE - NARROW_TURN_ANGLE
            })
    }

    /// Label `left` and `right` as the two prongs of a fork. One prong that
    /// is dead straight while the other clearly diverges degrades into an
    /// obvious continuation plus a slight turn.
    pub fn assign_fork(
        &self,
        via: EdgeID,
        intersection: &mut Intersection,
        left: usize,
        right: usize,
    ) {
        let left_deviation = intersection[left].angle.deviation(STRAIGHT_ANGLE);
        let right_deviation = intersection[right].angle.deviation(STRAIGHT_ANGLE);

        if left_deviation < MAXIMAL_ALLOWED_NO_TURN_DEVIATION
            && right_deviation > NARROW_TURN_ANGLE
        {
            let instruction = self.instruction_for_obvious(3, via, false, &intersection[left]);
            intersection[left].instruction = instruction;
            let turn_type = self.find_basic_turn_type(via, &intersection[right]);
            intersection[right].instruction =
                TurnInstruction::new(turn_type, DirectionModifier::SlightRight);
            return;
        }
        if right_deviation < MAXIMAL_ALLOWED_NO_TURN_DEVIATION
            && left_deviation > NARROW_TURN_ANGLE
        {
            let instruction = self.instruction_for_obvious(3, via, false, &intersection[right]);
            intersection[right].instruction = instruction;
            let turn_type = self.find_basic_turn_type(via, &intersection[left]);
            intersection[left].instruction =
                TurnInstruction::new(turn_type, DirectionModifier::SlightLeft);
            return;
        }

        intersection[left].instruction =
            TurnInstruction::new(TurnType::Fork, DirectionModifier::SlightLeft);
        intersection[right].instruction =
            TurnInstruction::new(TurnType::Fork, DirectionModifier::SlightRight);
    }

    /// A fork with three prongs; the middle one continues straight.
    pub fn assign_three_way_fork(
        &self,
        intersection: &mut Intersection,
        left: usize,
        middle: usize,
        right: usize,
    ) {
        intersection[left].instruction =
            TurnInstruction::new(TurnType::Fork, DirectionModifier::SlightLeft);
        intersection[middle].instruction =
            TurnInstruction::new(TurnType::Fork, DirectionModifier::Straight);
        intersection[right].instruction =
            TurnInstruction::new(TurnType::Fork, DirectionModifier::SlightRight);
    }

    /// Give every enterable road in [from, to) its plain geometric label.
    pub fn assign_trivial_turns(
        &self,
        via: EdgeID,
        intersection: &mut Intersection,
        from: usize,
        to: usize,
    ) {
        for index in from..to {
            if intersection[index].entry_allowed {
                let instruction = TurnInstruction::new(
                    self.find_basic_turn_type(via, &intersection[index]),
                    get_turn_direction(intersection[index].angle),
                );
                intersection[index].instruction = instruction;
            }
        }
    }
}
