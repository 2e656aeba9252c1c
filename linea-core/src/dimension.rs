//! Active vector dimension

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vector length the calculator is currently working in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "2")]
    Two,
    #[default]
    #[serde(rename = "3")]
    Three,
}

impl Dimension {
    pub fn len(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            2 => Some(Dimension::Two),
            3 => Some(Dimension::Three),
            _ => None,
        }
    }

}

/// Text that names neither 2D nor 3D
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dimension must be 2 or 3, got '{0}'")]
pub struct ParseDimensionError(pub String);

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2" | "2d" | "two" => Ok(Dimension::Two),
            "3" | "3d" | "three" => Ok(Dimension::Three),
            _ => Err(ParseDimensionError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}D", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_len() {
        assert_eq!("2".parse::<Dimension>(), Ok(Dimension::Two));
        assert_eq!(" 3D ".parse::<Dimension>(), Ok(Dimension::Three));
        assert_eq!("4".parse::<Dimension>(), Err(ParseDimensionError("4".to_string())));
        assert_eq!(
            "4".parse::<Dimension>().unwrap_err().to_string(),
            "dimension must be 2 or 3, got '4'"
        );
        assert_eq!(Dimension::from_len(3).map(Dimension::len), Some(3));
        assert_eq!(Dimension::default(), Dimension::Three);
    }
}
