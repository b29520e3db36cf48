use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Boltzmann constant in eV/K
pub const K_B: f64 = 8.617333262e-5;

/// Temperature range (K) assumed when a property does not state one
pub const DEFAULT_RANGE: (f64, f64) = (300.0, 1200.0);

lazy_static! {
    static ref DOI_RE: Regex = Regex::new(r"10\.\d{4,9}/\S+").expect("valid DOI pattern");
}

/// Which of the two parallel datasets a record or an operation applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Diffusivity,
    Solubility,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 2] = [PropertyKind::Diffusivity, PropertyKind::Solubility];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Diffusivity => "diffusivity",
            PropertyKind::Solubility => "solubility",
        }
    }

    /// Name of the matching collection in the Python materials library
    pub fn group_name(&self) -> &'static str {
        match self {
            PropertyKind::Diffusivity => "diffusivities",
            PropertyKind::Solubility => "solubilities",
        }
    }

    /// Units of the pre-exponential factor when a record does not carry its own
    pub fn default_units(&self) -> &'static str {
        match self {
            PropertyKind::Diffusivity => "m^2 s^-1",
            PropertyKind::Solubility => "m^-3 Pa^-0.5",
        }
    }

    /// Axis label used by the property-vs-temperature chart
    pub fn axis_label(&self) -> String {
        match self {
            PropertyKind::Diffusivity => format!("Diffusivity ({})", self.default_units()),
            PropertyKind::Solubility => format!("Solubility ({})", self.default_units()),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diffusivity" | "diffusivities" => Ok(PropertyKind::Diffusivity),
            "solubility" | "solubilities" => Ok(PropertyKind::Solubility),
            other => Err(format!("unknown property kind '{}'", other)),
        }
    }
}

/// Hydrogen isotope a measurement was made with
///
/// Deserialised through [`FromStr`], so datasets may spell the isotope out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Isotope {
    H,
    D,
    T,
}

impl Isotope {
    pub const ALL: [Isotope; 3] = [Isotope::H, Isotope::D, Isotope::T];

    pub fn symbol(&self) -> &'static str {
        match self {
            Isotope::H => "H",
            Isotope::D => "D",
            Isotope::T => "T",
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Isotope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "hydrogen" | "protium" => Ok(Isotope::H),
            "d" | "deuterium" => Ok(Isotope::D),
            "t" | "tritium" => Ok(Isotope::T),
            other => Err(format!("unknown isotope '{}'", other)),
        }
    }
}

impl TryFrom<String> for Isotope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Bibliographic source of a property
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BibSource {
    /// Citation key, e.g. `frauenfelder_1969`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Number of times the source has been cited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<u32>,
}

impl BibSource {
    /// Bare DOI (`10.xxxx/...`), whichever way it was written in the dataset
    pub fn normalized_doi(&self) -> Option<String> {
        self.doi.as_deref().and_then(normalize_doi)
    }

    pub fn doi_url(&self) -> Option<String> {
        self.normalized_doi()
            .map(|doi| format!("https://doi.org/{}", doi))
    }
}

/// Extracts a bare DOI from strings such as `doi:10.1/x` or `https://doi.org/10.1/x`
pub fn normalize_doi(raw: &str) -> Option<String> {
    DOI_RE
        .find(raw.trim())
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';']).to_string())
}

/// One Arrhenius-law property entry (a diffusivity or a solubility)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrheniusProperty {
    /// Lower-case material name
    pub material: String,
    pub isotope: Isotope,
    /// Lower-case author name
    pub author: String,
    pub year: i32,
    /// Pre-exponential factor
    pub pre_exp: f64,
    /// Activation energy in eV
    pub act_energy: f64,
    /// Valid temperature range in K
    #[serde(default)]
    pub range: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BibSource>,
}

impl ArrheniusProperty {
    /// Creates a property with the material and author normalised to lower case
    pub fn new(
        material: &str,
        isotope: Isotope,
        author: &str,
        year: i32,
        pre_exp: f64,
        act_energy: f64,
    ) -> Self {
        ArrheniusProperty {
            material: material.trim().to_lowercase(),
            isotope,
            author: author.trim().to_lowercase(),
            year,
            pre_exp,
            act_energy,
            range: None,
            units: None,
            source: None,
        }
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }

    pub fn with_source(mut self, source: BibSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Lower-cases the free-form text fields
    pub fn normalize(&mut self) {
        self.material = self.material.trim().to_lowercase();
        self.author = self.author.trim().to_lowercase();
    }

    /// Evaluates the Arrhenius law at `temperature` (K)
    ///
    /// # Arguments
    /// * `temperature` - Absolute temperature in kelvin
    ///
    /// # Returns
    /// * `pre_exp * exp(-act_energy / (k_B * T))`
    pub fn value(&self, temperature: f64) -> f64 {
        self.pre_exp * (-self.act_energy / (K_B * temperature)).exp()
    }

    /// Valid temperature range, falling back to [`DEFAULT_RANGE`]
    pub fn temperature_range(&self) -> (f64, f64) {
        self.range.unwrap_or(DEFAULT_RANGE)
    }

    /// Samples the curve over its valid range
    ///
    /// # Arguments
    /// * `samples` - Number of evenly spaced temperatures (at least two are used)
    ///
    /// # Returns
    /// * `(temperature, value)` pairs in increasing temperature order
    pub fn curve(&self, samples: usize) -> Vec<(f64, f64)> {
        let (low, high) = self.temperature_range();
        linspace(low, high, samples)
            .into_iter()
            .map(|t| (t, self.value(t)))
            .collect()
    }

    /// Author name as shown in legends and dropdowns
    pub fn display_author(&self) -> String {
        capitalize(&self.author)
    }

    /// `"Author (year)"`, used to label curves and citation bars
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_author(), self.year)
    }

    pub fn units_or_default(&self, kind: PropertyKind) -> String {
        self.units
            .clone()
            .unwrap_or_else(|| kind.default_units().to_string())
    }

    pub fn citations(&self) -> u32 {
        self.source.as_ref().and_then(|s| s.citations).unwrap_or(0)
    }

    pub fn doi_url(&self) -> Option<String> {
        self.source.as_ref().and_then(BibSource::doi_url)
    }
}

/// Upper-cases the first character and lower-cases the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `samples` evenly spaced values from `low` to `high` inclusive
pub fn linspace(low: f64, high: f64, samples: usize) -> Vec<f64> {
    let n = samples.max(2);
    let step = (high - low) / (n - 1) as f64;
    (0..n).map(|i| low + step * i as f64).collect()
}
