use htm_dashboard::downloader::to_csv;
use htm_dashboard::export::{DataEntry, create_data_json, generate_python_code};
use htm_dashboard::filter::FilterConstraints;
use htm_dashboard::property::{ArrheniusProperty, BibSource, Isotope, PropertyKind};
use htm_dashboard::table::make_table;

fn heinola() -> ArrheniusProperty {
    ArrheniusProperty::new("tungsten", Isotope::H, "heinola", 2010, 5.2e-8, 0.21)
        .with_range(1500.0, 2500.0)
        .with_source(BibSource {
            key: Some("heinola_diffusion_2010".to_string()),
            doi: Some("https://doi.org/10.1103/PhysRevB.82.094102".to_string()),
            citations: Some(190),
        })
}

#[test]
fn data_json_lists_the_filtered_records() {
    let json = create_data_json(&[heinola()], PropertyKind::Diffusivity).unwrap();
    let entries: Vec<DataEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.material, "tungsten");
    assert_eq!(entry.isotope, "H");
    assert_eq!(entry.units, "m^2 s^-1");
    assert_eq!(entry.range, Some([1500.0, 2500.0]));
    assert_eq!(
        entry.doi.as_deref(),
        Some("https://doi.org/10.1103/PhysRevB.82.094102")
    );
    assert_eq!(entry.citations, Some(190));
}

#[test]
fn data_json_of_empty_subset_is_an_empty_array() {
    let json = create_data_json(&[], PropertyKind::Solubility).unwrap();
    assert_eq!(json.trim(), "[]");
}

#[test]
fn python_script_only_filters_constrained_axes() {
    let constraints = FilterConstraints::new().materials(["Tungsten"]);
    let code = generate_python_code(&constraints, PropertyKind::Diffusivity);
    assert!(code.contains("import h_transport_materials as htm"));
    assert!(code.contains("diffusivities = htm.diffusivities.filter(material=[\"tungsten\"])"));
    assert!(!code.contains("isotope="));
    assert!(!code.contains("author="));
    assert!(!code.contains("prop.year"));
    assert!(code.contains("htm.plotting.plot(diffusivities)"));
}

#[test]
fn python_script_includes_year_window() {
    let constraints = FilterConstraints::new()
        .isotopes([Isotope::D, Isotope::H])
        .authors(["Heinola"])
        .years(1990, 2015);
    let code = generate_python_code(&constraints, PropertyKind::Solubility);
    assert!(code.contains("solubilities = htm.solubilities"));
    assert!(code.contains(".filter(isotope=[\"h\", \"d\"])"));
    assert!(code.contains(".filter(author=[\"heinola\"])"));
    assert!(code.contains("if 1990 <= prop.year <= 2015"));
}

#[test]
fn table_rows_format_units_and_doi_links() {
    let rows = make_table(&[heinola()], PropertyKind::Diffusivity);
    let row = &rows[0];
    assert_eq!(row.pre_exp.as_deref(), Some(" 5.20e-08 m^2 s^-1"));
    assert_eq!(row.act_energy.as_deref(), Some("0.21"));
    assert_eq!(row.range.as_deref(), Some("1500-2500"));
    assert_eq!(row.author.as_deref(), Some("Heinola"));
    assert_eq!(
        row.doi.as_deref(),
        Some("[10.1103/PhysRevB.82.094102](https://doi.org/10.1103/PhysRevB.82.094102)")
    );
}

#[test]
fn csv_has_header_and_one_line_per_row() {
    let without_range = ArrheniusProperty::new("nickel", Isotope::H, "robertson", 1973, 7.04e-7, 0.41);
    let rows = make_table(&[heinola(), without_range], PropertyKind::Diffusivity);
    let csv = to_csv(&rows).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "material,isotope,pre_exp,act_energy,range,author,year,doi");
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("nickel,H,"));
    assert!(lines[2].contains(",none,Robertson,1973,"));
}
