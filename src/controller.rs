//! Binds dashboard control values to the filter, figure, table and export
//! builders.
//!
//! Every output is recomputed from the current controls and the shared
//! [`PropertyStore`]; the only mutation is [`Controller::add_property`].

use crate::config::Config;
use crate::downloader;
use crate::error::Result;
use crate::export;
use crate::figures::{self, Category, ChartKind, Figure};
use crate::filter::FilterConstraints;
use crate::property::{ArrheniusProperty, DEFAULT_RANGE, Isotope, PropertyKind};
use crate::store::PropertyStore;
use crate::table::{self, TableRow};
use chrono::Datelike;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inline message shown when a custom property submission is incomplete
pub const SUBMIT_ERROR: &str = "Error!";

/// Raw values of the filter controls of one tab
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    pub materials: Vec<String>,
    pub isotopes: Vec<String>,
    pub authors: Vec<String>,
    /// Year slider as `[low, high]`
    pub years: Option<(i32, i32)>,
}

impl ControlState {
    /// Converts the control values into filter constraints
    ///
    /// Isotope values that do not name an isotope are dropped.
    pub fn constraints(&self) -> FilterConstraints {
        let isotopes = self.isotopes.iter().filter_map(|raw| match raw.parse::<Isotope>() {
            Ok(isotope) => Some(isotope),
            Err(e) => {
                warn!("Ignoring isotope filter value: {}", e);
                None
            }
        });

        let constraints = FilterConstraints::new()
            .materials(&self.materials)
            .authors(&self.authors)
            .isotopes(isotopes);
        match self.years {
            Some((low, high)) => constraints.years(low, high),
            None => constraints,
        }
    }
}

/// Body of every chart request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartRequest {
    #[serde(flatten)]
    pub controls: ControlState,
    /// Grouping of the line chart
    pub colour_by: Category,
    /// The "compute mean curve" button triggered this render
    pub mean: bool,
    /// Citations chart shows citations per year instead of totals
    pub per_year: bool,
}

/// Values offered by the dropdowns and the year slider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlOptions {
    pub materials: Vec<String>,
    pub authors: Vec<String>,
    pub isotopes: Vec<String>,
    pub years: Option<(i32, i32)>,
}

/// Values of the "add custom property" form; every field may be left blank
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPropertyForm {
    pub pre_exp: Option<f64>,
    pub act_energy: Option<f64>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub isotope: Option<String>,
    pub material: Option<String>,
    pub range_low: Option<f64>,
    pub range_high: Option<f64>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl NewPropertyForm {
    /// Whether every required field holds a usable value
    ///
    /// The isotope must name one of [`Isotope::ALL`]; the range is optional.
    pub fn is_complete(&self) -> bool {
        self.to_property().is_ok()
    }

    /// Builds the property described by the form
    ///
    /// A missing range bound takes its value from [`DEFAULT_RANGE`]. The range
    /// itself is not checked; a curve that is not positive is left off the graph.
    pub fn to_property(&self) -> std::result::Result<ArrheniusProperty, String> {
        let (Some(pre_exp), Some(act_energy), Some(author), Some(year), Some(isotope), Some(material)) = (
            self.pre_exp,
            self.act_energy,
            non_blank(&self.author),
            self.year,
            non_blank(&self.isotope),
            non_blank(&self.material),
        ) else {
            return Err("missing required field".to_string());
        };

        let isotope: Isotope = isotope.parse()?;
        if !pre_exp.is_finite() || !act_energy.is_finite() {
            return Err("Arrhenius parameters must be finite".to_string());
        }

        let low = self.range_low.unwrap_or(DEFAULT_RANGE.0);
        let high = self.range_high.unwrap_or(DEFAULT_RANGE.1);

        Ok(ArrheniusProperty::new(material, isotope, author, year, pre_exp, act_energy)
            .with_range(low, high))
    }
}

/// Result of a custom property submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddPropertyOutcome {
    /// Refreshed material dropdown options (unchanged on error)
    pub materials: Vec<String>,
    /// Refreshed author dropdown options (unchanged on error)
    pub authors: Vec<String>,
    /// Empty on success, [`SUBMIT_ERROR`] otherwise
    pub error: String,
    /// Whether the form dialog stays open
    pub modal_open: bool,
}

/// Request body of a custom property submission
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddPropertyRequest {
    #[serde(flatten)]
    pub form: NewPropertyForm,
    /// Current material selection, used to narrow the author options
    pub material_filter: Vec<String>,
}

/// Next state of the "add custom property" dialog
///
/// An open dialog with an incomplete form stays open; otherwise a click on
/// the open or submit button toggles it.
pub fn toggle_modal(is_open: bool, clicked: bool, form_complete: bool) -> bool {
    if is_open && !form_complete {
        return is_open;
    }
    if clicked { !is_open } else { is_open }
}

/// A file offered for download
#[derive(Clone, Debug, PartialEq)]
pub struct Download {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

/// Chart parameters taken from the configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartSettings {
    pub curve_samples: usize,
    pub year_bin_width: i32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        let config = Config::default();
        ChartSettings::from(&config)
    }
}

impl From<&Config> for ChartSettings {
    fn from(config: &Config) -> Self {
        ChartSettings {
            curve_samples: config.curve_samples,
            year_bin_width: config.year_bin_width,
        }
    }
}

/// Outputs of one dashboard tab (diffusivity or solubility)
pub struct Controller<'a> {
    store: &'a PropertyStore,
    kind: PropertyKind,
    settings: ChartSettings,
}

impl<'a> Controller<'a> {
    pub fn new(store: &'a PropertyStore, kind: PropertyKind, settings: ChartSettings) -> Self {
        Controller {
            store,
            kind,
            settings,
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    fn select(&self, controls: &ControlState) -> Vec<ArrheniusProperty> {
        self.store.filter(self.kind, &controls.constraints())
    }

    /// Property-vs-temperature chart, with the mean curve when `mean` is set
    pub fn update_graph(&self, controls: &ControlState, colour_by: Category, mean: bool) -> Figure {
        let properties = self.select(controls);
        let mut figure =
            figures::make_graph(self.kind, &properties, colour_by, self.settings.curve_samples);
        if mean {
            figures::add_mean_value(&mut figure, &properties, self.settings.curve_samples);
        }
        figure
    }

    /// Entries-per-year histogram over the full known year range
    ///
    /// The year slider only highlights bins, it does not narrow the records.
    pub fn entries_per_year(&self, controls: &ControlState) -> Figure {
        let constraints = controls.constraints();
        let all_time = self.store.filter(self.kind, &constraints.without_years());
        figures::make_figure_prop_per_year(
            &all_time,
            self.settings.year_bin_width,
            self.store.year_bounds(self.kind),
            constraints.years,
        )
    }

    pub fn piechart(&self, controls: &ControlState, category: Category) -> Figure {
        figures::make_piechart(&self.select(controls), category)
    }

    pub fn citations(&self, controls: &ControlState, per_year: bool, current_year: i32) -> Figure {
        figures::make_citations_graph(&self.select(controls), per_year, current_year)
    }

    /// Builds any chart of the tab from a chart request
    pub fn chart(&self, chart: ChartKind, request: &ChartRequest) -> Figure {
        let controls = &request.controls;
        match chart {
            ChartKind::Graph => self.update_graph(controls, request.colour_by, request.mean),
            ChartKind::PieMaterial => self.piechart(controls, Category::Material),
            ChartKind::PieIsotope => self.piechart(controls, Category::Isotope),
            ChartKind::PieAuthor => self.piechart(controls, Category::Author),
            ChartKind::Citations => {
                self.citations(controls, request.per_year, chrono::Local::now().year())
            }
            ChartKind::EntriesPerYear => self.entries_per_year(controls),
        }
    }

    pub fn table(&self, controls: &ControlState) -> Vec<TableRow> {
        table::make_table(&self.select(controls), self.kind)
    }

    /// `data.json` with the filtered records
    pub fn export_data(&self, controls: &ControlState) -> Result<Download> {
        let json = export::create_data_json(&self.select(controls), self.kind)?;
        Ok(Download {
            filename: export::DATA_FILENAME,
            content_type: "application/json",
            content: json.into_bytes(),
        })
    }

    /// `script.py` reproducing the current filters
    pub fn export_code(&self, controls: &ControlState) -> Download {
        let code = export::generate_python_code(&controls.constraints(), self.kind);
        Download {
            filename: export::SCRIPT_FILENAME,
            content_type: "text/x-python",
            content: code.into_bytes(),
        }
    }

    pub fn export_csv(&self, controls: &ControlState) -> Result<Download> {
        let csv = downloader::to_csv(&self.table(controls))?;
        Ok(Download {
            filename: downloader::CSV_FILENAME,
            content_type: "text/csv",
            content: csv.into_bytes(),
        })
    }

    #[cfg(feature = "web")]
    pub fn export_xlsx(&self, controls: &ControlState) -> Result<Download> {
        let bytes = downloader::to_xlsx(&self.table(controls))?;
        Ok(Download {
            filename: downloader::XLSX_FILENAME,
            content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            content: bytes,
        })
    }

    /// Every known material, for the "select all materials" button
    pub fn all_materials(&self) -> Vec<String> {
        self.store.materials(self.kind)
    }

    /// Every known author, for the "select all authors" button
    pub fn all_authors(&self) -> Vec<String> {
        self.store.authors(self.kind, &BTreeSet::new())
    }

    pub fn options(&self) -> ControlOptions {
        ControlOptions {
            materials: self.all_materials(),
            authors: self.all_authors(),
            isotopes: Isotope::ALL.iter().map(|i| i.symbol().to_string()).collect(),
            years: self.store.year_bounds(self.kind),
        }
    }

    /// Handles a custom property submission
    ///
    /// An incomplete or invalid form leaves the store untouched and reports
    /// [`SUBMIT_ERROR`]. A valid one appends exactly one record, visible to
    /// every later request of every session.
    ///
    /// # Arguments
    /// * `form` - Submitted form values
    /// * `material_filter` - Current material selection; narrows the returned author options
    ///
    /// # Returns
    /// * Refreshed dropdown options and the inline error message
    pub fn add_property(&self, form: &NewPropertyForm, material_filter: &[String]) -> AddPropertyOutcome {
        let selected: BTreeSet<String> = material_filter
            .iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();

        // the submit button is a click on an open dialog
        let modal_open = toggle_modal(true, true, form.is_complete());

        let error = match form.to_property() {
            Ok(property) => {
                info!(
                    "Adding custom {} for {} by {} ({})",
                    self.kind, property.material, property.author, property.year
                );
                let len = self.store.append(self.kind, property);
                info!("{} collection now holds {} records", self.kind, len);
                String::new()
            }
            Err(reason) => {
                warn!("Rejected custom {}: {}", self.kind, reason);
                SUBMIT_ERROR.to_string()
            }
        };

        AddPropertyOutcome {
            materials: self.store.materials(self.kind),
            authors: self.store.authors(self.kind, &selected),
            error,
            modal_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_stays_open_while_form_incomplete() {
        assert!(toggle_modal(true, true, false));
        assert!(!toggle_modal(true, true, true));
        assert!(toggle_modal(false, true, false));
        assert!(!toggle_modal(false, false, true));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let form = NewPropertyForm {
            pre_exp: Some(1e-7),
            act_energy: Some(0.2),
            author: Some("  ".to_string()),
            year: Some(2020),
            isotope: Some("H".to_string()),
            material: Some("tungsten".to_string()),
            ..Default::default()
        };
        assert!(!form.is_complete());
        assert!(form.to_property().is_err());
    }

    #[test]
    fn partial_range_uses_default_bound() {
        let form = NewPropertyForm {
            pre_exp: Some(1e-7),
            act_energy: Some(0.2),
            author: Some("Doe".to_string()),
            year: Some(2020),
            isotope: Some("d".to_string()),
            material: Some("Tungsten".to_string()),
            range_low: Some(500.0),
            range_high: None,
        };
        let prop = form.to_property().unwrap();
        assert_eq!(prop.range, Some((500.0, 1200.0)));
        assert_eq!(prop.isotope, Isotope::D);
        assert_eq!(prop.material, "tungsten");
        assert_eq!(prop.author, "doe");
    }

    #[test]
    fn unusual_range_is_still_appended() {
        let store = PropertyStore::new();
        let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
        let form = NewPropertyForm {
            pre_exp: Some(1e-7),
            act_energy: Some(0.2),
            author: Some("Doe".to_string()),
            year: Some(2020),
            isotope: Some("H".to_string()),
            material: Some("copper".to_string()),
            range_low: Some(1500.0),
            range_high: None,
        };
        assert!(form.is_complete());

        let outcome = controller.add_property(&form, &[]);
        assert_eq!(outcome.error, "");
        assert!(!outcome.modal_open);
        assert_eq!(store.len(PropertyKind::Diffusivity), 1);
        assert_eq!(store.all(PropertyKind::Diffusivity)[0].range, Some((1500.0, 1200.0)));
    }

    #[test]
    fn incomplete_submission_keeps_dialog_open() {
        let store = PropertyStore::new();
        let controller = Controller::new(&store, PropertyKind::Solubility, ChartSettings::default());
        let form = NewPropertyForm {
            material: Some("copper".to_string()),
            ..Default::default()
        };

        let outcome = controller.add_property(&form, &[]);
        assert_eq!(outcome.error, SUBMIT_ERROR);
        assert!(outcome.modal_open);
        assert!(store.is_empty(PropertyKind::Solubility));
    }

    #[test]
    fn unknown_isotope_keeps_dialog_open() {
        let store = PropertyStore::new();
        let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
        let form = NewPropertyForm {
            pre_exp: Some(1e-7),
            act_energy: Some(0.2),
            author: Some("Doe".to_string()),
            year: Some(2020),
            isotope: Some("muonium".to_string()),
            material: Some("copper".to_string()),
            ..Default::default()
        };

        let outcome = controller.add_property(&form, &[]);
        assert_eq!(outcome.error, SUBMIT_ERROR);
        assert!(outcome.modal_open);
        assert!(store.is_empty(PropertyKind::Diffusivity));
    }
}
