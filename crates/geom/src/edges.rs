use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// The set of rectangle edges dragged by a resize handle.
///
/// Handles are named by compass code: `n`, `s`, `e`, `w` and the four
/// corners. The legacy names `horizontal`, `vertical` and `both` map to
/// `e`, `s` and `se`. An edge that is not dragged stays fixed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Edges {
    /// Top edge.
    pub north: bool,
    /// Bottom edge.
    pub south: bool,
    /// Right edge.
    pub east: bool,
    /// Left edge.
    pub west: bool,
}

impl Edges {
    /// Top edge only.
    pub const N: Self = Self::new(true, false, false, false);
    /// Bottom edge only.
    pub const S: Self = Self::new(false, true, false, false);
    /// Right edge only.
    pub const E: Self = Self::new(false, false, true, false);
    /// Left edge only.
    pub const W: Self = Self::new(false, false, false, true);
    /// Top-right corner.
    pub const NE: Self = Self::new(true, false, true, false);
    /// Top-left corner.
    pub const NW: Self = Self::new(true, false, false, true);
    /// Bottom-right corner.
    pub const SE: Self = Self::new(false, true, true, false);
    /// Bottom-left corner.
    pub const SW: Self = Self::new(false, true, false, true);

    /// Construct an edge set.
    const fn new(north: bool, south: bool, east: bool, west: bool) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Does dragging these edges change the width?
    pub fn horizontal(&self) -> bool {
        self.east || self.west
    }

    /// Does dragging these edges change the height?
    pub fn vertical(&self) -> bool {
        self.north || self.south
    }

    /// Multiplier applied to a horizontal pointer delta. Dragging the west
    /// edge to the left grows the rectangle.
    pub fn x_sign(&self) -> i32 {
        if self.west { -1 } else { 1 }
    }

    /// Multiplier applied to a vertical pointer delta.
    pub fn y_sign(&self) -> i32 {
        if self.north { -1 } else { 1 }
    }

    /// The compass code for this edge set.
    pub fn code(&self) -> &'static str {
        match (self.north, self.south, self.east, self.west) {
            (true, false, false, false) => "n",
            (false, true, false, false) => "s",
            (false, false, true, false) => "e",
            (false, false, false, true) => "w",
            (true, false, true, false) => "ne",
            (true, false, false, true) => "nw",
            (false, true, true, false) => "se",
            (false, true, false, true) => "sw",
            _ => "",
        }
    }
}

impl FromStr for Edges {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let edges = match s.trim().to_ascii_lowercase().as_str() {
            "n" => Self::N,
            "s" | "vertical" => Self::S,
            "e" | "horizontal" => Self::E,
            "w" => Self::W,
            "ne" => Self::NE,
            "nw" => Self::NW,
            "se" | "both" => Self::SE,
            "sw" => Self::SW,
            _ => return Err(Error::Direction(s.to_string())),
        };
        Ok(edges)
    }
}

impl fmt::Display for Edges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_and_aliases() -> Result<()> {
        assert_eq!("nw".parse::<Edges>()?, Edges::NW);
        assert_eq!("SE".parse::<Edges>()?, Edges::SE);
        assert_eq!("horizontal".parse::<Edges>()?, Edges::E);
        assert_eq!("vertical".parse::<Edges>()?, Edges::S);
        assert_eq!("both".parse::<Edges>()?, Edges::SE);
        assert!("ns".parse::<Edges>().is_err());
        assert!("".parse::<Edges>().is_err());
        Ok(())
    }

    #[test]
    fn axes() {
        assert!(Edges::E.horizontal());
        assert!(!Edges::E.vertical());
        assert!(Edges::N.vertical());
        assert!(!Edges::N.horizontal());
        assert!(Edges::SW.horizontal() && Edges::SW.vertical());
        assert_eq!(Edges::W.x_sign(), -1);
        assert_eq!(Edges::E.x_sign(), 1);
        assert_eq!(Edges::N.y_sign(), -1);
        assert_eq!(Edges::NW.to_string(), "nw");
    }
}
