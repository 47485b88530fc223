//! Fork detection: a tight group of two or three roads splitting off near
//! straight ahead, none of which dominates the others.

use crate::classification::obvious_by_road_class;
use crate::{
    ConnectedRoad, EdgeID, Intersection, GROUP_ANGLE, NARROW_TURN_ANGLE, STRAIGHT_ANGLE,
};

use super::TurnClassifier;

/// Positions of the outermost prongs of a fork inside an intersection.
/// Both ends inclusive, `right` < `left`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fork {
    pub right: usize,
    pub left: usize,
}

impl Fork {
    fn new(right: usize, left: usize) -> Fork {
        debug_assert!(right < left);
        let fork = Fork { right, left };
        debug_assert!(fork.size() >= 2);
        debug_assert!(fork.size() <= 3);
        fork
    }

    pub fn size(&self) -> usize {
        self.left - self.right + 1
    }
}

// `road` is the outermost prong of a fork if its neighbor `next` no longer
// qualifies as part of one: `next` is far from straight, and either far from
// `road` or `road` itself already deviates a lot.
fn is_outermost_fork_candidate(road: &ConnectedRoad, next: &ConnectedRoad) -> bool {
    let next_far_from_straight = next.angle.deviation(STRAIGHT_ANGLE) > NARROW_TURN_ANGLE;
    let far_apart = road.angle.deviation(next.angle) > NARROW_TURN_ANGLE;
    let road_far_from_straight = road.angle.deviation(STRAIGHT_ANGLE) > GROUP_ANGLE;
    next_far_from_straight && (far_apart || road_far_from_straight)
}

impl TurnClassifier<'_> {
    // Stage one: the widest contiguous window of fork candidates around the
    // straightest road, if it's small enough to be a fork.
    fn find_fork_candidates(&self, intersection: &Intersection) -> Option<Fork> {
        if intersection.len() < 3 {
            return None;
        }
        let straightest = intersection.find_closest_to_straight();
        if straightest.deviation_from_straight > NARROW_TURN_ANGLE {
            return None;
        }

        // scan counter-clockwise for the leftmost candidate
        let mut left = intersection.len() - 1;
        for index in straightest.index..intersection.len() - 1 {
            if is_outermost_fork_candidate(&intersection[index], &intersection[index + 1]) {
                left = index;
                break;
            }
        }
        // scan clockwise for the rightmost; index 0 is the U-turn and never
        // part of a fork
        let mut right = 1;
        for index in (1..=straightest.index).rev() {
            if is_outermost_fork_candidate(&intersection[index], &intersection[index - 1]) {
                right = index;
                break;
            }
        }

        if right < left && left - right + 1 <= 3 {
            Some(Fork::new(right, left))
        } else {
            None
        }
    }

    // Forks are never obvious: any adjacent pair inside the window with a
    // clear winner disqualifies it.
    fn fork_has_obvious(&self, via: EdgeID, intersection: &Intersection, fork: &Fork) -> bool {
        for index in fork.right..fork.left {
            let road = &intersection[index];
            let next = &intersection[index + 1];
            if self.is_obvious_of_two(via, road, next) || self.is_obvious_of_two(via, next, road) {
                return true;
            }
        }
        false
    }

    // Link roads only fork with link roads, and no prong may dominate
    // another by class alone.
    fn fork_compatible_by_road_class(&self, intersection: &Intersection, fork: &Fork) -> bool {
        let via_class = self.network.edge(intersection[0].eid).classification;

        let right_is_link = self
            .network
            .edge(intersection[fork.right].eid)
            .classification
            .is_link();
        for index in fork.right + 1..=fork.left {
            if self.network.edge(intersection[index].eid).classification.is_link() != right_is_link
            {
                return false;
            }
        }

        for base in fork.right..=fork.left {
            let base_class = self.network.edge(intersection[base].eid).classification;
            for compare in fork.right..=fork.left {
                let compare_class = self.network.edge(intersection[compare].eid).classification;
                if obvious_by_road_class(via_class, base_class, compare_class)
                    && intersection[base].eid != intersection[compare].eid
                {
                    return false;
                }
            }
        }
        true
    }

    /// A validated fork: geometrically isolated from its neighbors,
    /// class-compatible, no obvious winner, all prongs enterable.
    pub(crate) fn find_fork(&self, via: EdgeID, intersection: &Intersection) -> Option<Fork> {
        let fork = self.find_fork_candidates(intersection)?;

        // the fork has to stand free of neighboring streets on both sides
        let next = if fork.left + 1 == intersection.len() {
            0
        } else {
            fork.left + 1
        };
        let separated_at_left_side = intersection[fork.left]
            .angle
            .deviation(intersection[next].angle)
            >= GROUP_ANGLE;
        let separated_at_right_side = intersection[fork.right]
            .angle
            .deviation(intersection[fork.right - 1].angle)
            >= GROUP_ANGLE;

        let has_obvious = self.fork_has_obvious(via, intersection, &fork);
        let compatible = self.fork_compatible_by_road_class(intersection, &fork);
        let only_valid_entries = intersection.has_valid_entries(fork.right..=fork.left);

        if separated_at_left_side
            && separated_at_right_side
            && !has_obvious
            && compatible
            && only_valid_entries
        {
            Some(fork)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::Angle;

    use crate::{
        ConnectedRoad, EdgeData, EdgeID, Intersection, NameTable, RoadClass, RoadClassification,
        RoadNetwork, SuffixTable, TurnClassifier,
    };

    fn network_of(classifications: Vec<RoadClassification>) -> RoadNetwork {
        let mut network = RoadNetwork::new();
        for classification in classifications {
            network.add_edge(EdgeData {
                classification,
                name: None,
            });
        }
        network
    }

    fn residential_network(edges: usize) -> RoadNetwork {
        network_of(vec![RoadClassification::new(RoadClass::Residential); edges])
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
    fn test_two_prong_fork() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        let i = intersection(vec![0.0, 170.0, 195.0]);
        let fork = classifier.find_fork(EdgeID(0), &i).unwrap();
        assert_eq!(fork.right, 1);
        assert_eq!(fork.left, 2);
        assert_eq!(fork.size(), 2);
    }

    #[test]
    fn test_three_prong_fork() {
        let network = residential_network(4);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // none of the three prongs is much narrower than its neighbors
        let i = intersection(vec![0.0, 160.0, 175.0, 195.0]);
        let fork = classifier.find_fork(EdgeID(0), &i).unwrap();
        assert_eq!(fork.right, 1);
        assert_eq!(fork.left, 3);
        assert_eq!(fork.size(), 3);
    }

    #[test]
    fn test_wide_angles_are_no_fork() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // a plain crossing, nothing near straight
        let i = intersection(vec![0.0, 90.0, 270.0]);
        assert!(classifier.find_fork(EdgeID(0), &i).is_none());
    }

    #[test]
    fn test_neighbor_too_close_is_no_fork() {
        let network = residential_network(4);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // the road at 240 sits within GROUP_ANGLE of the leftmost prong
        let i = intersection(vec![0.0, 170.0, 195.0, 240.0]);
        assert!(classifier.find_fork(EdgeID(0), &i).is_none());
    }

    #[test]
    fn test_closed_prong_is_no_fork() {
        let network = residential_network(3);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        let mut i = intersection(vec![0.0, 170.0, 195.0]);
        i[2].entry_allowed = false;
        assert!(classifier.find_fork(EdgeID(0), &i).is_none());
    }

    #[test]
    fn test_link_roads_fork_only_with_link_roads() {
        let network = network_of(vec![
            RoadClassification::new(RoadClass::Motorway),
            RoadClassification::new(RoadClass::Motorway),
            RoadClassification::link(RoadClass::Motorway),
        ]);
        let names = NameTable::new();
        let suffixes = SuffixTable::default();
        let classifier = TurnClassifier::new(&network, &names, &suffixes);

        // mainline and ramp never read as one fork
        let i = intersection(vec![0.0, 170.0, 195.0]);
        assert!(classifier.find_fork(EdgeID(0), &i).is_none());
    }
}
