use htm_dashboard::controller::{
    ChartRequest, ChartSettings, ControlState, Controller, NewPropertyForm, SUBMIT_ERROR,
};
use htm_dashboard::figures::{Category, ChartKind, FigureData};
use htm_dashboard::loader;
use htm_dashboard::property::PropertyKind;

fn complete_form() -> NewPropertyForm {
    NewPropertyForm {
        pre_exp: Some(2.5e-7),
        act_energy: Some(0.3),
        author: Some("Smith".to_string()),
        year: Some(2023),
        isotope: Some("H".to_string()),
        material: Some("Vanadium".to_string()),
        range_low: Some(400.0),
        range_high: Some(900.0),
    }
}

fn tungsten_controls() -> ControlState {
    ControlState {
        materials: vec!["tungsten".to_string()],
        ..ControlState::default()
    }
}

#[test]
fn added_property_is_visible_to_later_requests() {
    let store = loader::bundled().unwrap();
    let before = store.len(PropertyKind::Diffusivity);
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());

    let outcome = controller.add_property(&complete_form(), &[]);
    assert_eq!(outcome.error, "");
    assert!(!outcome.modal_open, "A successful submission closes the dialog");
    assert_eq!(store.len(PropertyKind::Diffusivity), before + 1);
    assert!(outcome.materials.contains(&"vanadium".to_string()));
    assert!(outcome.authors.contains(&"Smith".to_string()));

    // a second controller over the same store sees the record
    let other = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let rows = other.table(&ControlState {
        materials: vec!["vanadium".to_string()],
        ..ControlState::default()
    });
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].range.as_deref(), Some("400-900"));
}

#[test]
fn incomplete_form_reports_error_and_leaves_store_untouched() {
    let store = loader::bundled().unwrap();
    let before = store.len(PropertyKind::Solubility);
    let controller = Controller::new(&store, PropertyKind::Solubility, ChartSettings::default());

    let form = NewPropertyForm {
        author: None,
        ..complete_form()
    };
    let outcome = controller.add_property(&form, &[]);
    assert_eq!(outcome.error, SUBMIT_ERROR);
    assert!(outcome.modal_open);
    assert_eq!(store.len(PropertyKind::Solubility), before);
}

#[test]
fn unknown_isotope_is_rejected() {
    let store = loader::bundled().unwrap();
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let form = NewPropertyForm {
        isotope: Some("muonium".to_string()),
        ..complete_form()
    };
    let outcome = controller.add_property(&form, &[]);
    assert_eq!(outcome.error, SUBMIT_ERROR);
}

#[test]
fn author_options_follow_material_selection() {
    let store = loader::bundled().unwrap();
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let outcome = controller.add_property(&NewPropertyForm::default(), &["copper".to_string()]);
    assert_eq!(outcome.authors, vec!["Katz".to_string(), "Reiter".to_string()]);
}

#[test]
fn graph_has_one_curve_per_filtered_record_plus_mean() {
    let store = loader::bundled().unwrap();
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let controls = tungsten_controls();

    let plain = controller.update_graph(&controls, Category::Material, false);
    assert_eq!(plain.len(), 5);

    let with_mean = controller.update_graph(&controls, Category::Material, true);
    match with_mean.data {
        FigureData::Lines { series, log_y } => {
            assert!(log_y);
            assert_eq!(series.len(), 6);
            let mean = series.last().unwrap();
            assert_eq!(mean.name, "Mean");
            assert!(mean.dashed);
        }
        other => panic!("expected a line chart, got {:?}", other),
    }
}

#[test]
fn histogram_ignores_the_year_filter() {
    let store = loader::bundled().unwrap();
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let controls = ControlState {
        years: Some((2000, 2010)),
        ..tungsten_controls()
    };
    let figure = controller.chart(ChartKind::EntriesPerYear, &ChartRequest {
        controls,
        ..ChartRequest::default()
    });
    let FigureData::Histogram { bins } = figure.data else {
        panic!("expected a histogram");
    };
    let total: usize = bins.iter().map(|b| b.count).sum();
    assert_eq!(total, 5, "Every tungsten record is counted");
    assert!(bins.iter().any(|b| b.selected));
    assert!(bins.iter().any(|b| !b.selected));
}

#[test]
fn downloads_carry_the_expected_filenames() {
    let store = loader::bundled().unwrap();
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let controls = tungsten_controls();

    assert_eq!(controller.export_data(&controls).unwrap().filename, "data.json");
    assert_eq!(controller.export_code(&controls).filename, "script.py");
    let csv = controller.export_csv(&controls).unwrap();
    assert_eq!(csv.filename, "properties.csv");
    let text = String::from_utf8(csv.content).unwrap();
    assert_eq!(text.lines().count(), 6, "Header plus five tungsten rows");
}

#[test]
fn options_cover_the_whole_collection() {
    let store = loader::bundled().unwrap();
    let controller = Controller::new(&store, PropertyKind::Diffusivity, ChartSettings::default());
    let options = controller.options();
    assert_eq!(options.isotopes, vec!["H", "D", "T"]);
    assert_eq!(options.years, Some((1969, 2021)));
    assert!(options.materials.windows(2).all(|w| w[0] < w[1]));
}
