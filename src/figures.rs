//! Chart descriptions built from a filtered subset of properties.
//!
//! Builders are pure: they take records and parameters and return a [`Figure`]
//! that the web layer either serialises to JSON or hands to [`crate::graph`]
//! for rendering. None of them fails on an empty subset.

use crate::property::{ArrheniusProperty, PropertyKind, linspace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Colour cycle shared by every chart
pub const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

pub const MEAN_COLOR: &str = "#000000";
pub const HIGHLIGHT_COLOR: &str = "#ef553b";
pub const BIN_COLOR: &str = "#636efa";

/// Categorical key used to colour curves and to split pie charts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Material,
    Isotope,
    Author,
}

impl Category {
    /// Value of this category for `prop`, as displayed
    pub fn value_of(&self, prop: &ArrheniusProperty) -> String {
        match self {
            Category::Material => prop.material.to_lowercase(),
            Category::Isotope => prop.isotope.symbol().to_string(),
            Category::Author => prop.display_author(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Material => "Materials",
            Category::Isotope => "Isotopes",
            Category::Author => "Authors",
        }
    }
}

/// Every chart the dashboard can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Graph,
    PieMaterial,
    PieIsotope,
    PieAuthor,
    Citations,
    EntriesPerYear,
}

/// One curve of a line chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    /// Legend group (the colour-by value)
    pub group: String,
    pub color: String,
    pub dashed: bool,
    /// Only the first series of a group appears in the legend
    pub show_legend: bool,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: String,
}

/// Histogram bin covering `[start, end)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearBin {
    pub start: i32,
    pub end: i32,
    pub count: usize,
    /// Overlaps the currently selected year interval
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FigureData {
    Lines { series: Vec<Series>, log_y: bool },
    Pie { slices: Vec<Slice> },
    Bars { bars: Vec<Bar> },
    Histogram { bins: Vec<YearBin> },
}

/// Renderer-independent description of a chart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(flatten)]
    pub data: FigureData,
}

impl Figure {
    /// Number of series, slices, bars or bins
    pub fn len(&self) -> usize {
        match &self.data {
            FigureData::Lines { series, .. } => series.len(),
            FigureData::Pie { slices } => slices.len(),
            FigureData::Bars { bars } => bars.len(),
            FigureData::Histogram { bins } => bins.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assigns palette colours to category values in order of first appearance
#[derive(Default)]
struct ColorCycle {
    assigned: HashMap<String, String>,
}

impl ColorCycle {
    /// Returns the colour for `key` and whether it was seen for the first time
    fn color_for(&mut self, key: &str) -> (String, bool) {
        if let Some(color) = self.assigned.get(key) {
            return (color.clone(), false);
        }
        let color = PALETTE[self.assigned.len() % PALETTE.len()].to_string();
        self.assigned.insert(key.to_string(), color.clone());
        (color, true)
    }
}

/// Builds the property-vs-temperature line chart
///
/// # Arguments
/// * `kind` - Selects the y axis label
/// * `properties` - Records to plot, one curve each
/// * `colour_by` - Category deciding curve colour and legend grouping
/// * `samples` - Points per curve
///
/// # Returns
/// * A `Lines` figure with a logarithmic y axis
pub fn make_graph(
    kind: PropertyKind,
    properties: &[ArrheniusProperty],
    colour_by: Category,
    samples: usize,
) -> Figure {
    let mut colors = ColorCycle::default();
    let mut series = Vec::with_capacity(properties.len());

    for prop in properties {
        let points = prop.curve(samples);
        if points.iter().any(|&(_, v)| !v.is_finite() || v <= 0.0) {
            log::debug!("Skipping {} curve with non-positive values", prop.label());
            continue;
        }
        let group = colour_by.value_of(prop);
        let (color, first_of_group) = colors.color_for(&group);
        series.push(Series {
            name: prop.label(),
            group,
            color,
            dashed: false,
            show_legend: first_of_group,
            points,
        });
    }

    Figure {
        title: format!("{} vs temperature", capitalize_kind(kind)),
        x_label: "Temperature (K)".to_string(),
        y_label: kind.axis_label(),
        data: FigureData::Lines {
            series,
            log_y: true,
        },
    }
}

fn capitalize_kind(kind: PropertyKind) -> String {
    crate::property::capitalize(kind.as_str())
}

/// Geometric mean of the displayed curves, sampled over their combined range
///
/// At each temperature only curves whose valid range contains it contribute.
/// Returns `None` when there is nothing to average.
pub fn mean_curve(properties: &[ArrheniusProperty], samples: usize) -> Option<Series> {
    let low = properties
        .iter()
        .map(|p| p.temperature_range().0)
        .fold(f64::INFINITY, f64::min);
    let high = properties
        .iter()
        .map(|p| p.temperature_range().1)
        .fold(f64::NEG_INFINITY, f64::max);
    if !low.is_finite() || !high.is_finite() {
        return None;
    }

    let mut points = Vec::new();
    for t in linspace(low, high, samples) {
        let logs: Vec<f64> = properties
            .iter()
            .filter(|p| {
                let (lo, hi) = p.temperature_range();
                t >= lo - 1e-9 && t <= hi + 1e-9
            })
            .map(|p| p.value(t))
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(f64::ln)
            .collect();
        if logs.is_empty() {
            continue;
        }
        let mean_log = logs.iter().sum::<f64>() / logs.len() as f64;
        points.push((t, mean_log.exp()));
    }

    if points.is_empty() {
        return None;
    }
    Some(Series {
        name: "Mean".to_string(),
        group: "Mean".to_string(),
        color: MEAN_COLOR.to_string(),
        dashed: true,
        show_legend: true,
        points,
    })
}

/// Appends the mean curve to a line chart; other figures are left untouched
pub fn add_mean_value(figure: &mut Figure, properties: &[ArrheniusProperty], samples: usize) {
    if let FigureData::Lines { series, .. } = &mut figure.data {
        if let Some(mean) = mean_curve(properties, samples) {
            series.push(mean);
        }
    }
}

/// Counts records per category value, largest slice first
///
/// Categories absent from `properties` never appear, so no slice has a zero
/// count. Ties keep the order in which the values first occur.
pub fn make_piechart(properties: &[ArrheniusProperty], category: Category) -> Figure {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for prop in properties {
        let value = category.value_of(prop);
        match counts.iter_mut().find(|(label, _)| *label == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let slices = counts
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| Slice {
            label,
            count,
            color: PALETTE[i % PALETTE.len()].to_string(),
        })
        .collect();

    Figure {
        title: category.title().to_string(),
        x_label: String::new(),
        y_label: String::new(),
        data: FigureData::Pie { slices },
    }
}

/// Citation counts per record, highest first
///
/// # Arguments
/// * `properties` - Records to chart; a record without a source counts zero citations
/// * `per_year` - Divide each total by the years since publication
/// * `current_year` - Year used for the per-year normalisation
pub fn make_citations_graph(
    properties: &[ArrheniusProperty],
    per_year: bool,
    current_year: i32,
) -> Figure {
    let mut bars: Vec<Bar> = properties
        .iter()
        .map(|prop| {
            let total = prop.citations() as f64;
            let value = if per_year {
                total / (current_year - prop.year).max(1) as f64
            } else {
                total
            };
            Bar {
                label: prop.label(),
                value,
                color: BIN_COLOR.to_string(),
            }
        })
        .collect();
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));

    Figure {
        title: "Citations".to_string(),
        x_label: String::new(),
        y_label: if per_year {
            "Citations per year".to_string()
        } else {
            "Number of citations".to_string()
        },
        data: FigureData::Bars { bars },
    }
}

/// Histogram of entries per publication year
///
/// # Arguments
/// * `properties` - Records filtered on every axis except years
/// * `step` - Bin width in years
/// * `year_bounds` - Full known year range of the collection; `None` gives no bins
/// * `selected_years` - Interval to highlight; it never removes bins
pub fn make_figure_prop_per_year(
    properties: &[ArrheniusProperty],
    step: i32,
    year_bounds: Option<(i32, i32)>,
    selected_years: Option<(i32, i32)>,
) -> Figure {
    let step = step.max(1);
    let mut bins = Vec::new();

    if let Some((min_year, max_year)) = year_bounds {
        let mut start = min_year;
        while start <= max_year {
            let end = start + step;
            let count = properties
                .iter()
                .filter(|p| p.year >= start && p.year < end)
                .count();
            let selected = match selected_years {
                Some((lo, hi)) => start <= hi && end > lo,
                None => false,
            };
            bins.push(YearBin {
                start,
                end,
                count,
                selected,
            });
            start = end;
        }
    }

    Figure {
        title: "Entries per year".to_string(),
        x_label: "Year".to_string(),
        y_label: "Number of entries".to_string(),
        data: FigureData::Histogram { bins },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Isotope;

    #[test]
    fn colour_cycle_reuses_group_colours() {
        let mut cycle = ColorCycle::default();
        let (a, first_a) = cycle.color_for("tungsten");
        let (b, first_b) = cycle.color_for("copper");
        let (a2, again) = cycle.color_for("tungsten");
        assert!(first_a && first_b && !again);
        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn mean_of_identical_curves_is_the_curve() {
        let prop = ArrheniusProperty::new("w", Isotope::H, "a", 2000, 1e-7, 0.3);
        let mean = mean_curve(&[prop.clone(), prop.clone()], 5).expect("mean");
        for (t, v) in mean.points {
            assert!((v - prop.value(t)).abs() / v < 1e-12);
        }
    }
}
