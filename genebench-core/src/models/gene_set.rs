use std::collections::BTreeMap;
use std::collections::btree_map::Values;

use crate::errors::GeneModelError;

use super::complexity::Complexity;
use super::gene_model::GeneModel;

///
/// GeneSet: gene models keyed by their identifier.
///
/// Iteration is always in identifier order so that every pass over a
/// set is reproducible.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<GeneModel>", into = "Vec<GeneModel>")
)]
pub struct GeneSet {
    genes: BTreeMap<String, GeneModel>,
}

impl GeneSet {
    ///
    /// Build a set from gene models. Identifiers must be unique.
    ///
    pub fn new(genes: Vec<GeneModel>) -> Result<Self, GeneModelError> {
        let mut map = BTreeMap::new();
        for gene in genes {
            let id = gene.id().to_string();
            if map.contains_key(&id) {
                return Err(GeneModelError::DuplicateGeneId(id));
            }
            map.insert(id, gene);
        }
        Ok(GeneSet { genes: map })
    }

    pub fn get(&self, id: &str) -> Option<&GeneModel> {
        self.genes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.genes.contains_key(id)
    }

    pub fn iter(&self) -> Values<'_, String, GeneModel> {
        self.genes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Total number of exons over all genes.
    pub fn exon_count(&self) -> usize {
        self.genes.values().map(|g| g.exon_count()).sum()
    }

    /// Number of genes in each complexity class.
    pub fn complexity_counts(&self) -> BTreeMap<Complexity, usize> {
        let mut counts: BTreeMap<Complexity, usize> =
            Complexity::ALL.iter().map(|c| (*c, 0)).collect();
        for gene in self.genes.values() {
            *counts.entry(gene.complexity()).or_default() += 1;
        }
        counts
    }
}

impl TryFrom<Vec<GeneModel>> for GeneSet {
    type Error = GeneModelError;

    fn try_from(value: Vec<GeneModel>) -> Result<Self, Self::Error> {
        GeneSet::new(value)
    }
}

impl From<GeneSet> for Vec<GeneModel> {
    fn from(value: GeneSet) -> Self {
        value.genes.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a GeneSet {
    type Item = &'a GeneModel;
    type IntoIter = Values<'a, String, GeneModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.values()
    }
}
