use super::*;

#[test]
fn threshold_resolution_prefers_label_over_name_over_fallback() {
  let mut params = Parameters::new();
  params.set_distance_threshold("merge", 0.5);
  params.set_distance_threshold_for("merge", 3, 0.1);

  assert_eq!(params.distance_threshold("merge", 3), 0.1);
  assert_eq!(params.distance_threshold("merge", 1), 0.5);
  assert_eq!(params.distance_threshold("vertex_split", 1), 0.0);
}

#[test]
fn max_iterations_falls_back_to_default() {
  let mut params = Parameters::new();
  params.set_max_iterations("refinement", 5);

  assert_eq!(params.max_iterations("refinement"), 5);
  assert_eq!(params.max_iterations("coarsening"), 1);

  params.set_default_max_iterations(0);
  assert_eq!(params.max_iterations("coarsening"), 0);
  assert_eq!(params.max_iterations("refinement"), 5);
}

#[test]
fn relabelling_maps_listed_labels_only() {
  let mut params = Parameters::new();
  params.set_relabelling(vec![7, 9], vec![1, 2]);

  assert_eq!(params.relabel(7), 1);
  assert_eq!(params.relabel(9), 2);
  assert_eq!(params.relabel(4), 4);
}

#[test]
fn subdomain_count_is_at_least_one() {
  let mut params = Parameters::new();
  params.set_number_of_subdomains(0);
  assert_eq!(params.number_of_subdomains(), 1);
}

#[test]
fn threshold_attribute_names_default_sensibly() {
  let mut params = Parameters::new();
  assert_eq!(params.upper_threshold_attribute("refinement"), "refinement");
  assert_eq!(params.lower_threshold_attribute("coarsening"), "coarsening");

  params.set_upper_threshold_attribute("interface_refinement", "sizing");
  assert_eq!(
    params.upper_threshold_attribute("interface_refinement"),
    "sizing"
  );
}
