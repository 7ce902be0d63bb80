//! Pipe Pieces
//!
//! Piece tokens, their openings and how rotation turns them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FlowError;

bitflags! {
    /// Sides of a cell a pipe connects to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Openings: u8 {
        const NORTH = 0x1;
        const EAST = 0x2;
        const SOUTH = 0x4;
        const WEST = 0x8;
    }
}

impl Openings {
    /// Turn the openings clockwise by a number of quarter turns
    pub fn rotated(self, quarter_turns: u8) -> Self {
        let turns = quarter_turns % 4;
        let bits = self.bits();
        let rotated = ((bits << turns) | (bits >> (4 - turns))) & 0x0F;
        Self::from_bits_truncate(rotated)
    }
}

/// Compass direction between neighbouring cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    /// The direction pointing back at this one
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The opening flag facing this direction
    pub fn opening(self) -> Openings {
        match self {
            Direction::North => Openings::NORTH,
            Direction::East => Openings::EAST,
            Direction::South => Openings::SOUTH,
            Direction::West => Openings::WEST,
        }
    }

    /// Row and column offset of the neighbour in this direction
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// Piece types a layout may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    #[serde(rename = "S")]
    Straight,
    #[serde(rename = "L")]
    Elbow,
    #[serde(rename = "T")]
    Tee,
    #[serde(rename = "X")]
    Cross,
    #[serde(rename = "K1")]
    CornerNorthEast,
    #[serde(rename = "K2")]
    CornerEastSouth,
    #[serde(rename = "K3")]
    CornerSouthWest,
    #[serde(rename = "K4")]
    CornerWestNorth,
    #[serde(rename = "P")]
    Pool,
}

impl PieceType {
    /// Layout token for this piece
    pub fn token(self) -> &'static str {
        match self {
            PieceType::Straight => "S",
            PieceType::Elbow => "L",
            PieceType::Tee => "T",
            PieceType::Cross => "X",
            PieceType::CornerNorthEast => "K1",
            PieceType::CornerEastSouth => "K2",
            PieceType::CornerSouthWest => "K3",
            PieceType::CornerWestNorth => "K4",
            PieceType::Pool => "P",
        }
    }

    /// Openings at rotation 0
    pub fn base_openings(self) -> Openings {
        match self {
            PieceType::Straight => Openings::NORTH | Openings::SOUTH,
            PieceType::Elbow => Openings::NORTH | Openings::EAST,
            PieceType::Tee => Openings::EAST | Openings::SOUTH | Openings::WEST,
            PieceType::Cross | PieceType::Pool => Openings::all(),
            PieceType::CornerNorthEast => Openings::NORTH | Openings::EAST,
            PieceType::CornerEastSouth => Openings::EAST | Openings::SOUTH,
            PieceType::CornerSouthWest => Openings::SOUTH | Openings::WEST,
            PieceType::CornerWestNorth => Openings::WEST | Openings::NORTH,
        }
    }

    /// Openings after `rotation` clockwise quarter turns
    pub fn openings(self, rotation: u8) -> Openings {
        self.base_openings().rotated(rotation)
    }

    /// Pools receive water but never pass it on
    pub fn is_pool(self) -> bool {
        matches!(self, PieceType::Pool)
    }

    /// Whether level scrambling turns this piece.
    ///
    /// Crosses and pools look the same from every side and corner pieces
    /// are authored in place.
    pub fn is_scrambled(self) -> bool {
        matches!(self, PieceType::Straight | PieceType::Elbow | PieceType::Tee)
    }
}

impl FromStr for PieceType {
    type Err = FlowError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "S" => Ok(PieceType::Straight),
            "L" => Ok(PieceType::Elbow),
            "T" => Ok(PieceType::Tee),
            "X" => Ok(PieceType::Cross),
            "K1" => Ok(PieceType::CornerNorthEast),
            "K2" => Ok(PieceType::CornerEastSouth),
            "K3" => Ok(PieceType::CornerSouthWest),
            "K4" => Ok(PieceType::CornerWestNorth),
            "P" => Ok(PieceType::Pool),
            other => Err(FlowError::malformed_layout(format!("unknown piece token '{}'", other))),
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_is_clockwise() {
        let north = Openings::NORTH;
        assert_eq!(north.rotated(1), Openings::EAST);
        assert_eq!(north.rotated(2), Openings::SOUTH);
        assert_eq!(north.rotated(3), Openings::WEST);
        assert_eq!(north.rotated(4), Openings::NORTH);
        assert_eq!(Openings::WEST.rotated(1), Openings::NORTH);
    }

    #[test]
    fn test_straight_alternates_axis() {
        let vertical = Openings::NORTH | Openings::SOUTH;
        let horizontal = Openings::EAST | Openings::WEST;
        assert_eq!(PieceType::Straight.openings(0), vertical);
        assert_eq!(PieceType::Straight.openings(1), horizontal);
        assert_eq!(PieceType::Straight.openings(2), vertical);
        assert_eq!(PieceType::Straight.openings(3), horizontal);
    }

    #[test]
    fn test_corner_variants_cover_all_elbows() {
        let corners = [
            PieceType::CornerNorthEast,
            PieceType::CornerEastSouth,
            PieceType::CornerSouthWest,
            PieceType::CornerWestNorth,
        ];
        for (turns, corner) in corners.iter().enumerate() {
            assert_eq!(corner.base_openings(), PieceType::Elbow.openings(turns as u8));
            assert!(!corner.is_scrambled());
        }
    }

    #[test]
    fn test_token_parsing() {
        for token in ["S", "L", "T", "X", "K1", "K2", "K3", "K4", "P"] {
            let piece: PieceType = token.parse().unwrap();
            assert_eq!(piece.token(), token);
        }
        assert!("K5".parse::<PieceType>().is_err());
        assert!("s".parse::<PieceType>().is_err());
    }

    #[test]
    fn test_direction_opposites() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dr, dc) = direction.offset();
            let (or, oc) = direction.opposite().offset();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }
}
