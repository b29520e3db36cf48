#![cfg(not(tarpaulin_include))]

use crate::error::{DashboardError, Result};
use crate::property::{ArrheniusProperty, BibSource, Isotope, PropertyKind};
use crate::store::PropertyStore;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUNDLED_DIFFUSIVITIES: &str = include_str!("../data/diffusivities.json");
const BUNDLED_SOLUBILITIES: &str = include_str!("../data/solubilities.json");

/// Builds a store from the sample dataset compiled into the binary
///
/// # Returns
/// * `Result<PropertyStore>` - The populated store, or an error if the bundled JSON is malformed
pub fn bundled() -> Result<PropertyStore> {
    let store = PropertyStore::new();
    store.extend(
        PropertyKind::Diffusivity,
        from_json_reader(BUNDLED_DIFFUSIVITIES.as_bytes())?,
    );
    store.extend(
        PropertyKind::Solubility,
        from_json_reader(BUNDLED_SOLUBILITIES.as_bytes())?,
    );
    info!(
        "Loaded bundled dataset: {} diffusivities, {} solubilities",
        store.len(PropertyKind::Diffusivity),
        store.len(PropertyKind::Solubility)
    );
    Ok(store)
}

/// Builds a store from a data directory
///
/// For each kind the directory may contain `<group>.json` or `<group>.csv`
/// (`diffusivities.json`, `solubilities.csv`, ...). JSON is preferred when both
/// exist. A kind with no file starts out empty.
///
/// # Arguments
/// * `dir` - Directory holding the dataset files
///
/// # Returns
/// * `Result<PropertyStore>` - The populated store or the first parse error
///
/// # Examples
/// ```no_run
/// use htm_dashboard::loader::load_dir;
/// use htm_dashboard::property::PropertyKind;
///
/// match load_dir("data") {
///     Ok(store) => println!("{} diffusivities", store.len(PropertyKind::Diffusivity)),
///     Err(e) => eprintln!("Error loading dataset: {}", e),
/// }
/// ```
pub fn load_dir(dir: impl AsRef<Path>) -> Result<PropertyStore> {
    let dir = dir.as_ref();
    let store = PropertyStore::new();

    for kind in PropertyKind::ALL {
        let json_path = dir.join(format!("{}.json", kind.group_name()));
        let csv_path = dir.join(format!("{}.csv", kind.group_name()));

        let properties = if json_path.is_file() {
            from_json(&json_path)?
        } else if csv_path.is_file() {
            from_csv(&csv_path)?
        } else {
            warn!("No {} file found in {}", kind.group_name(), dir.display());
            Vec::new()
        };

        info!("Loaded {} {} from {}", properties.len(), kind.group_name(), dir.display());
        store.extend(kind, properties);
    }

    Ok(store)
}

/// Loads properties from a JSON array file
pub fn from_json(filepath: impl AsRef<Path>) -> Result<Vec<ArrheniusProperty>> {
    let file = File::open(filepath)?;
    from_json_reader(BufReader::new(file))
}

pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<ArrheniusProperty>> {
    let properties: Vec<ArrheniusProperty> = serde_json::from_reader(reader)?;
    properties.into_iter().map(validate).collect()
}

/// One row of a property CSV file; empty cells deserialize to `None`
#[derive(Debug, Deserialize)]
struct CsvRow {
    material: String,
    isotope: String,
    author: String,
    year: i32,
    pre_exp: f64,
    act_energy: f64,
    #[serde(default)]
    range_low: Option<f64>,
    #[serde(default)]
    range_high: Option<f64>,
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    citations: Option<u32>,
}

impl CsvRow {
    fn into_property(self) -> Result<ArrheniusProperty> {
        let isotope: Isotope = self
            .isotope
            .parse()
            .map_err(DashboardError::InvalidRecord)?;

        let mut prop = ArrheniusProperty::new(
            &self.material,
            isotope,
            &self.author,
            self.year,
            self.pre_exp,
            self.act_energy,
        );

        prop.range = match (self.range_low, self.range_high) {
            (Some(low), Some(high)) => Some((low, high)),
            (None, None) => None,
            _ => {
                return Err(DashboardError::InvalidRecord(format!(
                    "{} ({}): range needs both bounds",
                    prop.author, prop.year
                )));
            }
        };
        prop.units = self.units.filter(|u| !u.trim().is_empty());

        let doi = self.doi.filter(|d| !d.trim().is_empty());
        if doi.is_some() || self.citations.is_some() {
            prop.source = Some(BibSource {
                key: None,
                doi,
                citations: self.citations,
            });
        }

        Ok(prop)
    }
}

/// Loads properties from a CSV file with a header row
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<Vec<ArrheniusProperty>> {
    let file = File::open(filepath)?;
    from_csv_reader(BufReader::new(file))
}

pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<ArrheniusProperty>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut properties = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        properties.push(validate(row?.into_property()?)?);
    }
    Ok(properties)
}

fn validate(mut prop: ArrheniusProperty) -> Result<ArrheniusProperty> {
    prop.normalize();
    if prop.material.is_empty() || prop.author.is_empty() {
        return Err(DashboardError::InvalidRecord(
            "material and author must not be empty".to_string(),
        ));
    }
    if !prop.pre_exp.is_finite() || !prop.act_energy.is_finite() {
        return Err(DashboardError::InvalidRecord(format!(
            "{} ({}): non-finite Arrhenius parameters",
            prop.author, prop.year
        )));
    }
    if let Some((low, high)) = prop.range {
        if !(low > 0.0 && low < high) {
            return Err(DashboardError::InvalidRecord(format!(
                "{} ({}): invalid temperature range {}-{}",
                prop.author, prop.year, low, high
            )));
        }
    }
    Ok(prop)
}
