use htm_dashboard::filter::{FilterConstraints, filter_properties};
use htm_dashboard::property::{ArrheniusProperty, Isotope};

fn sample() -> Vec<ArrheniusProperty> {
    vec![
        ArrheniusProperty::new("tungsten", Isotope::H, "frauenfelder", 1990, 4.1e-7, 0.39),
        ArrheniusProperty::new("copper", Isotope::H, "reiter", 2005, 4.9e-7, 0.39),
        ArrheniusProperty::new("tungsten", Isotope::D, "heinola", 2010, 3.68e-8, 0.21),
        ArrheniusProperty::new("flibe", Isotope::T, "calderoni", 2008, 9.3e-7, 0.44),
    ]
}

#[test]
fn empty_constraints_return_everything_in_order() {
    let props = sample();
    let result = filter_properties(&props, &FilterConstraints::new());
    assert_eq!(result, props, "Unrestricted filter must keep every record in order");
}

#[test]
fn material_match_is_case_insensitive() {
    let props = sample();
    let result = filter_properties(&props, &FilterConstraints::new().materials(["TungSten"]));
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|p| p.material == "tungsten"));
}

#[test]
fn year_bounds_are_inclusive() {
    let props = sample();
    let result = filter_properties(&props, &FilterConstraints::new().years(1990, 2005));
    let years: Vec<i32> = result.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![1990, 2005]);
}

#[test]
fn tungsten_before_2000_matches_one_record() {
    let props = sample();
    let constraints = FilterConstraints::new().materials(["tungsten"]).years(1950, 2000);
    let result = filter_properties(&props, &constraints);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].author, "frauenfelder");
}

#[test]
fn axes_combine_conjunctively() {
    let props = sample();
    let constraints = FilterConstraints::new()
        .materials(["tungsten", "copper"])
        .isotopes([Isotope::H])
        .authors(["Reiter"]);
    let result = filter_properties(&props, &constraints);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].material, "copper");
}

#[test]
fn year_window_without_records_is_empty() {
    let props = sample();
    let result = filter_properties(&props, &FilterConstraints::new().years(2011, 2021));
    assert!(result.is_empty());
}

#[test]
fn inverted_years_and_blank_names_place_no_restriction() {
    let props = sample();
    let constraints = FilterConstraints::new().materials(["", "  "]).years(2020, 1990);
    assert!(constraints.is_unrestricted());
    assert_eq!(filter_properties(&props, &constraints).len(), props.len());
}

#[test]
fn filtering_never_mutates_the_input() {
    let props = sample();
    let before = props.clone();
    let _ = filter_properties(&props, &FilterConstraints::new().isotopes([Isotope::T]));
    assert_eq!(props, before);
}
