use serde::{Deserialize, Serialize};

use geom::Angle;

/// Semantic category of a maneuver.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TurnType {
    /// Nothing assigned yet.
    NoTurn,
    /// Stay on the same road.
    Continue,
    /// The road ahead continues under a different name.
    NewName,
    /// An obvious continuation that doesn't need to be spoken.
    Suppressed,
    /// Advisory only; nothing changes for the driver.
    Notification,
    Turn,
    /// The via road dead-ends into a cross street.
    EndOfRoad,
    Fork,
    OnRamp,
}

/// Coarse direction of a turn, counter-clockwise from the U-turn.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DirectionModifier {
    UTurn,
    SharpRight,
    Right,
    SlightRight,
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
}

impl DirectionModifier {
    /// Swap left and right. U-turns and straight are their own mirror image.
    pub fn mirror(self) -> DirectionModifier {
        match self {
            DirectionModifier::UTurn => DirectionModifier::UTurn,
            DirectionModifier::SharpRight => DirectionModifier::SharpLeft,
            DirectionModifier::Right => DirectionModifier::Left,
            DirectionModifier::SlightRight => DirectionModifier::SlightLeft,
            DirectionModifier::Straight => DirectionModifier::Straight,
            DirectionModifier::SlightLeft => DirectionModifier::SlightRight,
            DirectionModifier::Left => DirectionModifier::Right,
            DirectionModifier::SharpLeft => DirectionModifier::SharpRight,
        }
    }
}

/// The label a connected road ends up with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnInstruction {
    pub turn_type: TurnType,
    pub direction_modifier: DirectionModifier,
}

impl TurnInstruction {
    pub const NO_TURN: TurnInstruction = TurnInstruction {
        turn_type: TurnType::NoTurn,
        direction_modifier: DirectionModifier::UTurn,
    };

    pub fn new(turn_type: TurnType, direction_modifier: DirectionModifier) -> TurnInstruction {
        TurnInstruction {
            turn_type,
            direction_modifier,
        }
    }
}

impl Default for TurnInstruction {
    fn default() -> TurnInstruction {
        TurnInstruction::NO_TURN
    }
}

/// Map a turn angle to its coarse direction. 180 reads as straight ahead, 0
/// as turning back.
pub fn get_turn_direction(angle: Angle) -> DirectionModifier {
    let degrees = angle.normalized_degrees();
    if degrees > 0.0 && degrees < 60.0 {
        DirectionModifier::SharpRight
    } else if degrees >= 60.0 && degrees < 140.0 {
        DirectionModifier::Right
    } else if degrees >= 140.0 && degrees < 160.0 {
        DirectionModifier::SlightRight
    } else if degrees >= 160.0 && degrees <= 200.0 {
        DirectionModifier::Straight
    } else if degrees > 200.0 && degrees <= 220.0 {
        DirectionModifier::SlightLeft
    } else if degrees > 220.0 && degrees <= 300.0 {
        DirectionModifier::Left
    } else if degrees > 300.0 && degrees < 360.0 {
        DirectionModifier::SharpLeft
    } else {
        DirectionModifier::UTurn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_table() {
        for (degrees, expected) in vec![
            (0.0, DirectionModifier::UTurn),
            (30.0, DirectionModifier::SharpRight),
            (59.9, DirectionModifier::SharpRight),
            (60.0, DirectionModifier::Right),
            (139.9, DirectionModifier::Right),
            (140.0, DirectionModifier::SlightRight),
            (160.0, DirectionModifier::Straight),
            (180.0, DirectionModifier::Straight),
            (200.0, DirectionModifier::Straight),
            (200.1, DirectionModifier::SlightLeft),
            (220.0, DirectionModifier::SlightLeft),
            (300.0, DirectionModifier::Left),
            (300.1, DirectionModifier::SharpLeft),
            (359.9, DirectionModifier::SharpLeft),
        ] {
            assert_eq!(
                get_turn_direction(Angle::degrees(degrees)),
                expected,
                "at {} degrees",
                degrees
            );
        }
    }

    #[test]
    fn test_mirror_involution() {
        for modifier in vec![
            DirectionModifier::UTurn,
            DirectionModifier::SharpRight,
            DirectionModifier::Right,
            DirectionModifier::SlightRight,
            DirectionModifier::Straight,
            DirectionModifier::SlightLeft,
            DirectionModifier::Left,
            DirectionModifier::SharpLeft,
        ] {
            assert_eq!(modifier.mirror().mirror(), modifier);
        }
        assert_eq!(
            DirectionModifier::SharpRight.mirror(),
            DirectionModifier::SharpLeft
        );
        assert_eq!(DirectionModifier::Straight.mirror(), DirectionModifier::Straight);
    }
}
