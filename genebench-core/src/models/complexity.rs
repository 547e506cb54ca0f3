use std::fmt::{self, Display};

/// Structural complexity class of a gene, by number of exons.
///
/// - `Simple`: 1-2 exons
/// - `Moderate`: 3-10 exons
/// - `Complex`: 11 or more exons
///
/// A model with no exons falls into `Simple`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [
        Complexity::Simple,
        Complexity::Moderate,
        Complexity::Complex,
    ];

    pub fn from_exon_count(n: usize) -> Complexity {
        match n {
            0..=2 => Complexity::Simple,
            3..=10 => Complexity::Moderate,
            _ => Complexity::Complex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }
}

impl Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
