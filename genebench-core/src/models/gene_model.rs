use crate::errors::GeneModelError;

use super::complexity::Complexity;
use super::interval::GenomicInterval;
use super::strand::Strand;

/// One gene's structure: an identifier, a strand and an ordered,
/// non-overlapping list of exons.
///
/// The exon list is validated once at construction and never mutated
/// afterwards. An empty exon list is allowed so that a tool which
/// predicted nothing for a region can still be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGeneModel"))]
pub struct GeneModel {
    id: String,
    strand: Strand,
    exons: Vec<GenomicInterval>,
}

impl GeneModel {
    ///
    /// Build a gene model, rejecting empty identifiers, unsorted exons and
    /// exons that overlap each other. Exons that merely touch (`a.end == b.start`)
    /// are accepted.
    ///
    pub fn new(
        id: impl Into<String>,
        strand: Strand,
        exons: Vec<GenomicInterval>,
    ) -> Result<Self, GeneModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GeneModelError::EmptyGeneId);
        }

        for (index, pair) in exons.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start() < prev.start() {
                return Err(GeneModelError::UnsortedExons {
                    gene_id: id,
                    index: index + 1,
                });
            }
            if next.start() < prev.end() {
                return Err(GeneModelError::OverlappingExons {
                    gene_id: id,
                    index: index + 1,
                });
            }
        }

        Ok(GeneModel { id, strand, exons })
    }

    ///
    /// Convenience constructor from raw `(start, end)` pairs.
    ///
    pub fn from_coords(
        id: impl Into<String>,
        strand: Strand,
        coords: &[(u32, u32)],
    ) -> Result<Self, GeneModelError> {
        let exons = coords
            .iter()
            .map(|&(start, end)| GenomicInterval::new(start, end))
            .collect::<Result<Vec<_>, _>>()?;
        GeneModel::new(id, strand, exons)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn exons(&self) -> &[GenomicInterval] {
        &self.exons
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    /// Span from the first exon start to the last exon end, or `None`
    /// when the model has no exons.
    pub fn extent(&self) -> Option<GenomicInterval> {
        let first = self.exons.first()?;
        let last = self.exons.last()?;
        Some(first.hull(last))
    }

    /// Total number of exonic bases.
    pub fn coding_length(&self) -> u64 {
        self.exons.iter().map(|e| e.len() as u64).sum()
    }

    pub fn complexity(&self) -> Complexity {
        Complexity::from_exon_count(self.exons.len())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGeneModel {
    id: String,
    strand: Strand,
    exons: Vec<GenomicInterval>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeneModel> for GeneModel {
    type Error = GeneModelError;

    fn try_from(raw: RawGeneModel) -> Result<Self, Self::Error> {
        GeneModel::new(raw.id, raw.strand, raw.exons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_valid_model() {
        let gene = GeneModel::from_coords("g1", Strand::Plus, &[(100, 200), (300, 400)]).unwrap();
        assert_eq!(gene.id(), "g1");
        assert_eq!(gene.exon_count(), 2);
        assert_eq!(gene.extent(), Some(GenomicInterval::new(100, 400).unwrap()));
        assert_eq!(gene.coding_length(), 200);
        assert_eq!(gene.complexity(), Complexity::Simple);
    }

    #[rstest]
    fn test_touching_exons_are_accepted() {
        assert!(GeneModel::from_coords("g1", Strand::Minus, &[(100, 200), (200, 300)]).is_ok());
    }

    #[rstest]
    fn test_empty_model_has_no_extent() {
        let gene = GeneModel::new("g1", Strand::Plus, vec![]).unwrap();
        assert_eq!(gene.extent(), None);
        assert_eq!(gene.coding_length(), 0);
    }

    #[rstest]
    fn test_unsorted_exons_rejected() {
        let err =
            GeneModel::from_coords("g1", Strand::Plus, &[(300, 400), (100, 200)]).unwrap_err();
        assert_eq!(
            err,
            GeneModelError::UnsortedExons {
                gene_id: "g1".to_string(),
                index: 1
            }
        );
    }

    #[rstest]
    #[case(&[(100, 200), (150, 250)])]
    #[case(&[(100, 200), (100, 200)])]
    fn test_overlapping_exons_rejected(#[case] coords: &[(u32, u32)]) {
        let err = GeneModel::from_coords("g1", Strand::Plus, coords).unwrap_err();
        assert!(matches!(err, GeneModelError::OverlappingExons { index: 1, .. }));
    }

    #[rstest]
    fn test_zero_length_exon_rejected() {
        let err = GeneModel::from_coords("g1", Strand::Plus, &[(100, 100)]).unwrap_err();
        assert_eq!(err, GeneModelError::InvalidInterval { start: 100, end: 100 });
    }

    #[rstest]
    fn test_position_zero_rejected() {
        let err = GeneModel::from_coords("g1", Strand::Plus, &[(0, 100)]).unwrap_err();
        assert_eq!(err, GeneModelError::InvalidInterval { start: 0, end: 100 });
    }

    #[rstest]
    fn test_empty_id_rejected() {
        let err = GeneModel::from_coords("", Strand::Plus, &[(100, 200)]).unwrap_err();
        assert_eq!(err, GeneModelError::EmptyGeneId);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn test_deserialize_validates() {
        let ok: GeneModel =
            serde_json::from_str(r#"{"id": "g1", "strand": "-", "exons": [[1, 5], [9, 12]]}"#)
                .unwrap();
        assert_eq!(ok.strand(), Strand::Minus);

        let unsorted = serde_json::from_str::<GeneModel>(
            r#"{"id": "g1", "strand": "+", "exons": [[9, 12], [1, 5]]}"#,
        );
        assert!(unsorted.is_err());

        let bad_strand =
            serde_json::from_str::<GeneModel>(r#"{"id": "g1", "strand": ".", "exons": []}"#);
        assert!(bad_strand.is_err());
    }
}
