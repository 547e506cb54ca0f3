//! Core types for genebench: tools for benchmarking gene structure predictions.
//!
//! Gene models are plain, validated values. Once built they are only ever read:
//!
//! ```rust
//! use genebench_core::models::{GeneModel, Strand};
//!
//! let gene = GeneModel::from_coords("ENSG1", Strand::Plus, &[(100, 200), (300, 400)]).unwrap();
//! assert_eq!(gene.exon_count(), 2);
//!
//! // exons must be sorted and must not overlap
//! assert!(GeneModel::from_coords("ENSG2", Strand::Plus, &[(300, 400), (100, 200)]).is_err());
//! ```
//!
//! All coordinates follow [`models::COORDINATE_CONVENTION`].

pub mod errors;
pub mod models;
