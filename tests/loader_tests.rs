use htm_dashboard::DashboardError;
use htm_dashboard::loader::{bundled, from_csv_reader, from_json_reader, load_dir};
use htm_dashboard::property::{Isotope, PropertyKind};
use std::fs;
use tempfile::tempdir;

#[test]
fn bundled_dataset_loads_both_kinds() {
    let store = bundled().unwrap();
    assert_eq!(store.len(PropertyKind::Diffusivity), 14);
    assert_eq!(store.len(PropertyKind::Solubility), 8);
    assert!(store.materials(PropertyKind::Diffusivity).contains(&"tungsten".to_string()));
}

#[test]
fn json_records_are_normalised() {
    let json = r#"[
        {"material": "Tungsten", "isotope": "d", "author": "Heinola", "year": 2010,
         "pre_exp": 3.68e-8, "act_energy": 0.21, "range": [1500.0, 2500.0]}
    ]"#;
    let props = from_json_reader(json.as_bytes()).unwrap();
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].material, "tungsten");
    assert_eq!(props[0].author, "heinola");
    assert_eq!(props[0].isotope, Isotope::D);
    assert_eq!(props[0].range, Some((1500.0, 2500.0)));
}

#[test]
fn csv_rows_with_optional_cells() {
    let csv = "material,isotope,author,year,pre_exp,act_energy,range_low,range_high,units,doi,citations\n\
               copper,H,reiter,1996,4.9e-7,0.39,470,1200,,10.1016/x.1996,310\n\
               nickel,tritium,robertson,1973,7.04e-7,0.41,,,,,\n";
    let props = from_csv_reader(csv.as_bytes()).unwrap();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].range, Some((470.0, 1200.0)));
    assert_eq!(props[0].citations(), 310);
    assert_eq!(props[0].doi_url().as_deref(), Some("https://doi.org/10.1016/x.1996"));
    assert_eq!(props[1].isotope, Isotope::T);
    assert_eq!(props[1].range, None);
    assert!(props[1].source.is_none());
}

#[test]
fn csv_with_half_a_range_is_rejected() {
    let csv = "material,isotope,author,year,pre_exp,act_energy,range_low,range_high\n\
               copper,H,reiter,1996,4.9e-7,0.39,470,\n";
    match from_csv_reader(csv.as_bytes()) {
        Err(DashboardError::InvalidRecord(message)) => assert!(message.contains("range")),
        other => panic!("expected an invalid record, got {:?}", other),
    }
}

#[test]
fn inverted_range_is_rejected() {
    let json = r#"[{"material": "w", "isotope": "H", "author": "a", "year": 2000,
                    "pre_exp": 1e-7, "act_energy": 0.2, "range": [900.0, 300.0]}]"#;
    assert!(matches!(
        from_json_reader(json.as_bytes()),
        Err(DashboardError::InvalidRecord(_))
    ));
}

#[test]
fn data_directory_mixes_json_and_csv() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("diffusivities.json"),
        r#"[{"material": "w", "isotope": "H", "author": "a", "year": 2000, "pre_exp": 1e-7, "act_energy": 0.2}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("solubilities.csv"),
        "material,isotope,author,year,pre_exp,act_energy\nw,H,b,2001,1e22,0.5\nw,D,b,2001,1e22,0.5\n",
    )
    .unwrap();

    let store = load_dir(dir.path()).unwrap();
    assert_eq!(store.len(PropertyKind::Diffusivity), 1);
    assert_eq!(store.len(PropertyKind::Solubility), 2);
}

#[test]
fn missing_files_give_empty_collections() {
    let dir = tempdir().unwrap();
    let store = load_dir(dir.path()).unwrap();
    assert!(store.is_empty(PropertyKind::Diffusivity));
    assert!(store.is_empty(PropertyKind::Solubility));
    assert_eq!(store.year_bounds(PropertyKind::Diffusivity), None);
}

#[test]
fn json_isotopes_may_be_spelled_out() {
    let json = r#"[
        {"material": "tungsten", "isotope": "Deuterium", "author": "heinola", "year": 2010,
         "pre_exp": 3.68e-8, "act_energy": 0.21},
        {"material": "flibe", "isotope": "tritium", "author": "calderoni", "year": 2008,
         "pre_exp": 9.3e-7, "act_energy": 0.44}
    ]"#;
    let props = from_json_reader(json.as_bytes()).unwrap();
    assert_eq!(props[0].isotope, Isotope::D);
    assert_eq!(props[1].isotope, Isotope::T);
}

#[test]
fn json_with_unknown_isotope_is_an_error() {
    let json = r#"[{"material": "w", "isotope": "muonium", "author": "a", "year": 2000,
                    "pre_exp": 1e-7, "act_energy": 0.2}]"#;
    assert!(matches!(from_json_reader(json.as_bytes()), Err(DashboardError::Json(_))));
}
