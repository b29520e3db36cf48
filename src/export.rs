//! Downloadable exports of the current selection: the filtered records as JSON,
//! or a Python script that rebuilds the same query against the
//! `h_transport_materials` package.

use crate::error::Result;
use crate::filter::FilterConstraints;
use crate::property::{ArrheniusProperty, PropertyKind};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const DATA_FILENAME: &str = "data.json";
pub const SCRIPT_FILENAME: &str = "script.py";

/// Serialised form of one record in the data download
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    pub material: String,
    pub isotope: String,
    pub author: String,
    pub year: i32,
    pub pre_exp: f64,
    pub act_energy: f64,
    pub units: String,
    pub range: Option<[f64; 2]>,
    /// `https://doi.org/...` when the source has a DOI
    pub doi: Option<String>,
    pub citations: Option<u32>,
}

impl DataEntry {
    pub fn from_property(prop: &ArrheniusProperty, kind: PropertyKind) -> Self {
        DataEntry {
            material: prop.material.clone(),
            isotope: prop.isotope.symbol().to_string(),
            author: prop.author.clone(),
            year: prop.year,
            pre_exp: prop.pre_exp,
            act_energy: prop.act_energy,
            units: prop.units_or_default(kind),
            range: prop.range.map(|(low, high)| [low, high]),
            doi: prop.doi_url(),
            citations: prop.source.as_ref().and_then(|s| s.citations),
        }
    }
}

/// Builds the data payload for a filtered subset
pub fn create_data_entries(properties: &[ArrheniusProperty], kind: PropertyKind) -> Vec<DataEntry> {
    properties
        .iter()
        .map(|prop| DataEntry::from_property(prop, kind))
        .collect()
}

/// Pretty-printed JSON document offered as [`DATA_FILENAME`]
pub fn create_data_json(properties: &[ArrheniusProperty], kind: PropertyKind) -> Result<String> {
    Ok(serde_json::to_string_pretty(&create_data_entries(properties, kind))?)
}

fn python_list<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let items: Vec<String> = values
        .into_iter()
        .map(|v| format!("\"{}\"", v.to_lowercase().replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Generates a Python script reproducing the query described by `constraints`
///
/// The script captures the filter parameters rather than the resolved
/// records, so running it later picks up whatever the library then contains.
/// Axes without a constraint produce no `.filter(...)` call.
///
/// # Arguments
/// * `constraints` - Material, isotope, author and year constraints
/// * `kind` - Selects `htm.diffusivities` or `htm.solubilities`
///
/// # Returns
/// * Script text offered as [`SCRIPT_FILENAME`]
pub fn generate_python_code(constraints: &FilterConstraints, kind: PropertyKind) -> String {
    let group = kind.group_name();
    let mut code = String::new();

    code.push_str("import h_transport_materials as htm\n");
    code.push_str("import matplotlib.pyplot as plt\n\n");
    code.push_str("# filter the database\n");
    let _ = write!(code, "{} = htm.{}", group, group);
    if !constraints.materials.is_empty() {
        let _ = write!(
            code,
            ".filter(material={})",
            python_list(constraints.materials.iter().map(String::as_str))
        );
    }
    if !constraints.isotopes.is_empty() {
        let _ = write!(
            code,
            ".filter(isotope={})",
            python_list(constraints.isotopes.iter().map(|i| i.symbol()))
        );
    }
    if !constraints.authors.is_empty() {
        let _ = write!(
            code,
            ".filter(author={})",
            python_list(constraints.authors.iter().map(String::as_str))
        );
    }
    code.push('\n');

    if let Some((low, high)) = constraints.years {
        let _ = writeln!(
            code,
            "{} = htm.PropertiesGroup([prop for prop in {} if {} <= prop.year <= {}])",
            group, group, low, high
        );
    }

    code.push_str("\n# plot the properties\n");
    let _ = writeln!(code, "htm.plotting.plot({})", group);
    code.push_str("plt.yscale(\"log\")\n");
    code.push_str("plt.legend()\n");
    code.push_str("plt.show()\n");
    code
}
