pub mod complexity;
pub mod gene_model;
pub mod gene_set;
pub mod interval;
pub mod strand;

// re-export for cleaner imports
pub use self::complexity::Complexity;
pub use self::gene_model::GeneModel;
pub use self::gene_set::GeneSet;
pub use self::interval::{COORDINATE_CONVENTION, GenomicInterval, iou, overlap_length, union_length};
pub use self::strand::Strand;
