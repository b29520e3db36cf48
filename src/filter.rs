//! Narrowing a property collection down to the records matching the dashboard controls.
//!
//! Every axis follows the same rule: an empty (or absent) constraint places no
//! restriction on that axis, it never means "match nothing".

use crate::property::{ArrheniusProperty, Isotope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Constraints applied by [`filter_properties`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConstraints {
    /// Lower-case material names
    #[serde(default)]
    pub materials: BTreeSet<String>,
    #[serde(default)]
    pub isotopes: BTreeSet<Isotope>,
    /// Lower-case author names
    #[serde(default)]
    pub authors: BTreeSet<String>,
    /// Inclusive year interval
    #[serde(default)]
    pub years: Option<(i32, i32)>,
}

impl FilterConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.materials = normalize_names(materials);
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.authors = normalize_names(authors);
        self
    }

    pub fn isotopes<I>(mut self, isotopes: I) -> Self
    where
        I: IntoIterator<Item = Isotope>,
    {
        self.isotopes = isotopes.into_iter().collect();
        self
    }

    /// Sets the year interval; an inverted interval places no restriction
    pub fn years(mut self, low: i32, high: i32) -> Self {
        self.years = if low <= high { Some((low, high)) } else { None };
        self
    }

    /// Same constraints without the year interval
    pub fn without_years(&self) -> Self {
        FilterConstraints {
            years: None,
            ..self.clone()
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.materials.is_empty()
            && self.isotopes.is_empty()
            && self.authors.is_empty()
            && self.years.is_none()
    }

    /// Whether `prop` satisfies every supplied axis
    pub fn matches(&self, prop: &ArrheniusProperty) -> bool {
        let material_ok = self.materials.is_empty()
            || self.materials.contains(&prop.material.to_lowercase());
        let isotope_ok = self.isotopes.is_empty() || self.isotopes.contains(&prop.isotope);
        let author_ok =
            self.authors.is_empty() || self.authors.contains(&prop.author.to_lowercase());
        let year_ok = match self.years {
            Some((low, high)) if low <= high => prop.year >= low && prop.year <= high,
            _ => true,
        };

        material_ok && isotope_ok && author_ok && year_ok
    }
}

fn normalize_names<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Returns the records matching `constraints`, in their original order
///
/// # Arguments
/// * `properties` - Full collection to scan
/// * `constraints` - Material, isotope, author and year constraints
///
/// # Returns
/// * Clones of the matching records; nothing is re-sorted or deduplicated
///
/// # Examples
/// ```
/// use htm_dashboard::filter::{FilterConstraints, filter_properties};
/// use htm_dashboard::property::{ArrheniusProperty, Isotope};
///
/// let props = vec![
///     ArrheniusProperty::new("tungsten", Isotope::H, "frauenfelder", 1990, 4.1e-7, 0.39),
///     ArrheniusProperty::new("copper", Isotope::H, "reiter", 2005, 1e-6, 0.4),
/// ];
/// let tungsten = filter_properties(
///     &props,
///     &FilterConstraints::new().materials(["tungsten"]).years(1950, 2000),
/// );
/// assert_eq!(tungsten.len(), 1);
/// assert!(filter_properties(&props, &FilterConstraints::new().years(2006, 2021)).is_empty());
/// ```
pub fn filter_properties(
    properties: &[ArrheniusProperty],
    constraints: &FilterConstraints,
) -> Vec<ArrheniusProperty> {
    properties
        .iter()
        .filter(|prop| constraints.matches(prop))
        .cloned()
        .collect()
}
