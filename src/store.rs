use crate::filter::{FilterConstraints, filter_properties};
use crate::property::{ArrheniusProperty, PropertyKind, capitalize};
use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory home of the diffusivity and solubility collections
///
/// Collections only ever grow: records are appended by the loader at start-up
/// and by custom-property submissions afterwards. Nothing is written back to
/// disk, so appended records last as long as the process.
#[derive(Debug, Default)]
pub struct PropertyStore {
    diffusivities: RwLock<Vec<ArrheniusProperty>>,
    solubilities: RwLock<Vec<ArrheniusProperty>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collections(
        diffusivities: Vec<ArrheniusProperty>,
        solubilities: Vec<ArrheniusProperty>,
    ) -> Self {
        PropertyStore {
            diffusivities: RwLock::new(diffusivities),
            solubilities: RwLock::new(solubilities),
        }
    }

    fn collection(&self, kind: PropertyKind) -> &RwLock<Vec<ArrheniusProperty>> {
        match kind {
            PropertyKind::Diffusivity => &self.diffusivities,
            PropertyKind::Solubility => &self.solubilities,
        }
    }

    // A panicking writer can only have left a fully pushed or untouched Vec behind.
    fn read(&self, kind: PropertyKind) -> RwLockReadGuard<'_, Vec<ArrheniusProperty>> {
        self.collection(kind)
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, kind: PropertyKind) -> RwLockWriteGuard<'_, Vec<ArrheniusProperty>> {
        self.collection(kind)
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self, kind: PropertyKind) -> usize {
        self.read(kind).len()
    }

    pub fn is_empty(&self, kind: PropertyKind) -> bool {
        self.read(kind).is_empty()
    }

    /// Snapshot of the whole collection
    pub fn all(&self, kind: PropertyKind) -> Vec<ArrheniusProperty> {
        self.read(kind).clone()
    }

    /// Records of `kind` matching `constraints`, in insertion order
    pub fn filter(&self, kind: PropertyKind, constraints: &FilterConstraints) -> Vec<ArrheniusProperty> {
        filter_properties(&self.read(kind), constraints)
    }

    /// Appends one record and returns the new collection length
    pub fn append(&self, kind: PropertyKind, mut property: ArrheniusProperty) -> usize {
        property.normalize();
        let mut collection = self.write(kind);
        collection.push(property);
        collection.len()
    }

    /// Appends many records, used by the loader
    pub fn extend<I>(&self, kind: PropertyKind, properties: I)
    where
        I: IntoIterator<Item = ArrheniusProperty>,
    {
        let mut collection = self.write(kind);
        for mut property in properties {
            property.normalize();
            collection.push(property);
        }
    }

    /// Sorted, distinct lower-case materials
    pub fn materials(&self, kind: PropertyKind) -> Vec<String> {
        self.read(kind)
            .iter()
            .map(|p| p.material.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, distinct display authors of records whose material is in `materials`
    ///
    /// An empty `materials` set selects every record.
    pub fn authors(&self, kind: PropertyKind, materials: &BTreeSet<String>) -> Vec<String> {
        self.read(kind)
            .iter()
            .filter(|p| materials.is_empty() || materials.contains(&p.material))
            .map(|p| capitalize(&p.author))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest publication year, if the collection is not empty
    pub fn year_bounds(&self, kind: PropertyKind) -> Option<(i32, i32)> {
        let collection = self.read(kind);
        let min = collection.iter().map(|p| p.year).min()?;
        let max = collection.iter().map(|p| p.year).max()?;
        Some((min, max))
    }
}
