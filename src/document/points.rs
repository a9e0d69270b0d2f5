use std::fmt;
use std::str::FromStr;

/// A font size.
///
/// DOCX stores sizes in half-points (`w:sz`), so that is the internal unit;
/// sizes such as 10.5pt are represented exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points {
    half_points: u32,
}

impl Points {
    /// The smallest size the normalizer ever writes.
    pub const MIN: Points = Points { half_points: 2 };
    pub const ZERO: Points = Points { half_points: 0 };

    pub const fn from_half_points(half_points: u32) -> Self {
        Self { half_points }
    }

    /// Converts a point value, rounding to the nearest half point.
    ///
    /// Returns `None` for negative, non-finite or out of range values.
    pub fn from_pt(pt: f64) -> Option<Self> {
        let half = (pt * 2.0).round();
        if !half.is_finite() || half < 0.0 || half > f64::from(u32::MAX) {
            return None;
        }
        Some(Self {
            half_points: half as u32,
        })
    }

    pub const fn half_points(self) -> u32 {
        self.half_points
    }

    pub const fn is_zero(self) -> bool {
        self.half_points == 0
    }

    /// `max(self - delta, 1pt)`.
    pub fn shrink(self, delta: Points) -> Points {
        Points {
            half_points: self.half_points.saturating_sub(delta.half_points),
        }
        .max(Self::MIN)
    }

    /// Parses a `w:sz` value: an integer count of half-points, or a universal
    /// measure in points such as `12pt`.
    pub fn parse_half_point_measure(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.strip_suffix("pt") {
            Some(pt) => pt.trim().parse::<f64>().ok().and_then(Self::from_pt),
            None => value.parse::<u32>().ok().map(Self::from_half_points),
        }
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.half_points % 2 == 0 {
            write!(f, "{}pt", self.half_points / 2)
        } else {
            write!(f, "{}.5pt", self.half_points / 2)
        }
    }
}

/// Parses a point value such as `11` or `10.5`.
impl FromStr for Points {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pt: f64 = s
            .trim()
            .trim_end_matches("pt")
            .parse()
            .map_err(|_| format!("'{s}' is not a number of points"))?;
        Self::from_pt(pt).ok_or_else(|| format!("'{s}' is not a valid point size"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_clamps_to_one_point() {
        let size = Points::from_half_points(24);
        assert_eq!(size.shrink(Points::from_half_points(4)).half_points(), 20);
        assert_eq!(size.shrink(Points::from_half_points(24)), Points::MIN);
        assert_eq!(size.shrink(Points::from_half_points(100)), Points::MIN);
        // sizes already below the floor are raised to it
        assert_eq!(Points::from_half_points(1).shrink(Points::ZERO), Points::MIN);
    }

    #[test]
    fn test_parse_half_point_measure() {
        assert_eq!(
            Points::parse_half_point_measure("21"),
            Some(Points::from_half_points(21))
        );
        assert_eq!(
            Points::parse_half_point_measure("10.5pt"),
            Some(Points::from_half_points(21))
        );
        assert_eq!(Points::parse_half_point_measure("large"), None);
        assert_eq!(Points::parse_half_point_measure("-4"), None);
    }

    #[test]
    fn test_from_str_and_display() {
        assert_eq!("10.5".parse::<Points>().unwrap().to_string(), "10.5pt");
        assert_eq!("12".parse::<Points>().unwrap().half_points(), 24);
        assert!("-1".parse::<Points>().is_err());
        assert!("abc".parse::<Points>().is_err());
        assert!("NaN".parse::<Points>().is_err());
    }
}
