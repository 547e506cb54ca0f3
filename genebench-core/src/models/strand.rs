use std::fmt::{self, Display};

use crate::errors::GeneModelError;

/// Genomic strand of a gene model. Unstranded models are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Plus,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Minus,
}

impl Strand {
    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl TryFrom<char> for Strand {
    type Error = GeneModelError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Strand::Plus),
            '-' => Ok(Strand::Minus),
            other => Err(GeneModelError::InvalidStrand(other.to_string())),
        }
    }
}

impl TryFrom<&str> for Strand {
    type Error = GeneModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Strand::try_from(c),
            _ => Err(GeneModelError::InvalidStrand(value.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("+", Strand::Plus)]
    #[case("-", Strand::Minus)]
    fn test_parse_strand(#[case] raw: &str, #[case] expected: Strand) {
        assert_eq!(Strand::try_from(raw).unwrap(), expected);
    }

    #[rstest]
    #[case(".")]
    #[case("")]
    #[case("++")]
    fn test_parse_invalid_strand(#[case] raw: &str) {
        assert_eq!(
            Strand::try_from(raw),
            Err(GeneModelError::InvalidStrand(raw.to_string()))
        );
    }
}
