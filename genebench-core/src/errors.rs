use thiserror::Error;

/// Structural problems with a gene model. These are never repaired
/// silently: a reordered or merged exon list would no longer be
/// comparable across tools.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneModelError {
    #[error("Gene model has an empty identifier")]
    EmptyGeneId,

    #[error("Invalid interval [{start}, {end}): need 1 <= start < end")]
    InvalidInterval { start: u32, end: u32 },

    #[error("Exons of gene {gene_id} are not sorted by start (exon {index})")]
    UnsortedExons { gene_id: String, index: usize },

    #[error("Exon {index} of gene {gene_id} overlaps the preceding exon")]
    OverlappingExons { gene_id: String, index: usize },

    #[error("Invalid strand: {0}")]
    InvalidStrand(String),

    #[error("Duplicate gene identifier: {0}")]
    DuplicateGeneId(String),
}
