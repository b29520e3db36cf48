use crate::property::{ArrheniusProperty, PropertyKind};
use serde::{Deserialize, Serialize};

/// Column order of the literature table
pub const TABLE_KEYS: [&str; 8] = [
    "material",
    "isotope",
    "pre_exp",
    "act_energy",
    "range",
    "author",
    "year",
    "doi",
];

/// Scientific notation with a sign column and a two-digit exponent
///
/// `5.2e-8` is written ` 5.20e-08` and `-1.5e22` is written `-1.50e+22`.
pub fn scientific(value: f64) -> String {
    let formatted = format!("{:.2e}", value.abs());
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if value.is_sign_negative() { '-' } else { ' ' };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exponent.abs())
}

/// One row of the literature table
///
/// Every column is optional; a column the record cannot fill is left out of
/// the serialised row instead of being shown as an empty string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isotope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_exp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_energy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Markdown DOI link, or the citation key when no DOI is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl TableRow {
    pub fn from_property(prop: &ArrheniusProperty, kind: PropertyKind) -> Self {
        let range = match prop.range {
            Some((low, high)) => format!("{:.0}-{:.0}", low, high),
            None => "none".to_string(),
        };

        let doi = prop.source.as_ref().and_then(|source| {
            match source.normalized_doi() {
                Some(doi) => Some(format!("[{}](https://doi.org/{})", doi, doi)),
                None => source.key.clone(),
            }
        });

        TableRow {
            material: Some(prop.material.clone()),
            isotope: Some(prop.isotope.symbol().to_string()),
            pre_exp: Some(format!("{} {}", scientific(prop.pre_exp), prop.units_or_default(kind))),
            act_energy: Some(format!("{:.2}", prop.act_energy)),
            range: Some(range),
            author: Some(prop.display_author()),
            year: Some(prop.year),
            doi,
        }
    }

    /// Cell text for a column of [`TABLE_KEYS`]; absent cells are empty
    pub fn cell(&self, key: &str) -> String {
        let value = match key {
            "material" => self.material.clone(),
            "isotope" => self.isotope.clone(),
            "pre_exp" => self.pre_exp.clone(),
            "act_energy" => self.act_energy.clone(),
            "range" => self.range.clone(),
            "author" => self.author.clone(),
            "year" => self.year.map(|y| y.to_string()),
            "doi" => self.doi.clone(),
            _ => None,
        };
        value.unwrap_or_default()
    }
}

/// Table rows for the filtered subset, in subset order
pub fn make_table(properties: &[ArrheniusProperty], kind: PropertyKind) -> Vec<TableRow> {
    properties
        .iter()
        .map(|prop| TableRow::from_property(prop, kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_pads_the_exponent() {
        assert_eq!(scientific(5.2e-8), " 5.20e-08");
        assert_eq!(scientific(1.2e22), " 1.20e+22");
        assert_eq!(scientific(-3.0e5), "-3.00e+05");
        assert_eq!(scientific(0.41), " 4.10e-01");
        assert_eq!(scientific(1.0e-120), " 1.00e-120");
    }
}
