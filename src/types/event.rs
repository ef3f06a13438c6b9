use std::fmt;

use serde::{Serialize, Serializer};

/// Side of the court an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub const fn as_str(self) -> &'static str {
        match self {
            Team::Home => "HOME",
            Team::Away => "AWAY",
        }
    }

    /// Parses a team token, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Team> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOME" => Some(Team::Home),
            "AWAY" => Some(Team::Away),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a made basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Points {
    One,
    Two,
    Three,
}

impl Points {
    pub const fn value(self) -> i64 {
        match self {
            Points::One => 1,
            Points::Two => 2,
            Points::Three => 3,
        }
    }

    pub fn from_value(value: i64) -> Option<Points> {
        match value {
            1 => Some(Points::One),
            2 => Some(Points::Two),
            3 => Some(Points::Three),
            _ => None,
        }
    }
}

/// Entry type in a game's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Point(Points),
    Foul,
    RemoveFoul,
    RemoveScore,
    Undo,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Point(Points::One) => "POINT_1",
            EventKind::Point(Points::Two) => "POINT_2",
            EventKind::Point(Points::Three) => "POINT_3",
            EventKind::Foul => "FOUL",
            EventKind::RemoveFoul => "REMOVE_FOUL",
            EventKind::RemoveScore => "REMOVE_SCORE",
            EventKind::Undo => "UNDO",
        }
    }

    pub fn parse(s: &str) -> Option<EventKind> {
        match s {
            "POINT_1" => Some(EventKind::Point(Points::One)),
            "POINT_2" => Some(EventKind::Point(Points::Two)),
            "POINT_3" => Some(EventKind::Point(Points::Three)),
            "FOUL" => Some(EventKind::Foul),
            "REMOVE_FOUL" => Some(EventKind::RemoveFoul),
            "REMOVE_SCORE" => Some(EventKind::RemoveScore),
            "UNDO" => Some(EventKind::Undo),
            _ => None,
        }
    }

    /// Score change this event applied when it was recorded.
    #[must_use]
    pub const fn points(self) -> i64 {
        match self {
            EventKind::Point(points) => points.value(),
            _ => 0,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
