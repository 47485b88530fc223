use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Functional class of a road, from most to least important.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Path,
}

/// A road's class plus whether it's an interchange/connector link.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct RoadClassification {
    pub class: RoadClass,
    pub link: bool,
}

// How much more important a road must be before class alone decides a turn.
const PRIORITY_DISTINCTION_FACTOR: u16 = 4;

impl RoadClassification {
    pub fn new(class: RoadClass) -> RoadClassification {
        RoadClassification { class, link: false }
    }

    pub fn link(class: RoadClass) -> RoadClassification {
        RoadClassification { class, link: true }
    }

    /// Parse an OSM highway= value.
    pub fn from_highway(value: &str) -> Result<RoadClassification> {
        let (base, link) = match value.strip_suffix("_link") {
            Some(base) => (base, true),
            None => (value, false),
        };
        let class = match base {
            "motorway" => RoadClass::Motorway,
            "trunk" => RoadClass::Trunk,
            "primary" => RoadClass::Primary,
            "secondary" => RoadClass::Secondary,
            "tertiary" => RoadClass::Tertiary,
            "residential" | "unclassified" | "living_street" => RoadClass::Residential,
            "service" | "track" => RoadClass::Service,
            "footway" | "path" | "cycleway" | "steps" | "pedestrian" => RoadClass::Path,
            _ => bail!("unknown highway value {}", value),
        };
        if link
            && !matches!(
                class,
                RoadClass::Motorway
                    | RoadClass::Trunk
                    | RoadClass::Primary
                    | RoadClass::Secondary
                    | RoadClass::Tertiary
            )
        {
            bail!("highway value {} can't be a link", value);
        }
        Ok(RoadClassification { class, link })
    }

    /// Lower is more important. Links rank just below their parent class.
    pub fn priority(self) -> u16 {
        let base = match self.class {
            RoadClass::Motorway => 0,
            RoadClass::Trunk => 2,
            RoadClass::Primary => 4,
            RoadClass::Secondary => 6,
            RoadClass::Tertiary => 8,
            RoadClass::Residential => 10,
            RoadClass::Service => 12,
            RoadClass::Path => 16,
        };
        if self.link {
            base + 1
        } else {
            base
        }
    }

    pub fn is_link(self) -> bool {
        self.link
    }

    /// Bike and foot infrastructure never competes with motorized classes.
    pub fn is_low_priority(self) -> bool {
        self.class == RoadClass::Path
    }
}

/// Coming from `via`, is `candidate` so clearly the main continuation that a
/// driver wouldn't even consider `other`?
pub fn obvious_by_road_class(
    via: RoadClassification,
    candidate: RoadClassification,
    other: RoadClassification,
) -> bool {
    let much_more_important =
        PRIORITY_DISTINCTION_FACTOR * candidate.priority() < other.priority();
    let continues_on_same_class = via == candidate;
    (much_more_important && continues_on_same_class)
        || (!candidate.is_low_priority() && !via.is_low_priority() && other.is_low_priority())
}

/// Are two classes close enough in importance to be announced as a fork?
pub fn can_be_seen_as_fork(a: RoadClassification, b: RoadClassification) -> bool {
    (i32::from(a.priority()) - i32::from(b.priority())).abs() <= 1
}
