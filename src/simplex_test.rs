use super::*;

fn v(i: u32) -> Simplex0 {
  Simplex0::new(i)
}

#[test]
fn edge_identity_ignores_endpoint_order() {
  assert_eq!(Simplex1::new(v(3), v(7)), Simplex1::new(v(7), v(3)));
  assert_eq!(Simplex1::new(v(3), v(7)).endpoints(), (v(3), v(7)));
}

#[test]
fn edge_other_endpoint() {
  let e = Simplex1::new(v(2), v(9));
  assert_eq!(e.other(v(2)), v(9));
  assert_eq!(e.other(v(9)), v(2));
}

#[test]
fn edge_substitute_recanonicalises() {
  let e = Simplex1::new(v(2), v(9));
  assert_eq!(e.substitute(v(9), v(1)), Simplex1::new(v(1), v(2)));
}

#[test]
fn triangle_identity_ignores_corner_order() {
  let t1 = Simplex2::new(v(5), v(1), v(3));
  let t2 = Simplex2::new(v(3), v(5), v(1));
  assert_eq!(t1, t2);
  assert_eq!(t1.vertices(), [v(1), v(3), v(5)]);
}

#[test]
fn triangle_edges_cover_all_pairs() {
  let t = Simplex2::new(v(1), v(2), v(3));
  let edges = t.edges();

  assert!(edges.contains(&Simplex1::new(v(1), v(2))));
  assert!(edges.contains(&Simplex1::new(v(2), v(3))));
  assert!(edges.contains(&Simplex1::new(v(1), v(3))));
}

#[test]
fn opposite_vertex_and_edge_are_inverse() {
  let t = Simplex2::new(v(1), v(2), v(3));

  for corner in t.vertices() {
    let e = t.opposite_edge(corner);
    assert_eq!(t.opposite_vertex(e), corner);
  }
}

#[test]
fn triangle_substitute_replaces_one_corner() {
  let t = Simplex2::new(v(1), v(2), v(3));
  let s = t.substitute(v(2), v(8));

  assert!(s.contains(v(1)));
  assert!(s.contains(v(3)));
  assert!(s.contains(v(8)));
  assert!(!s.contains(v(2)));
}

#[test]
fn simplex_dimension_tags() {
  assert_eq!(Simplex::from(v(0)).dimension(), 0);
  assert_eq!(Simplex::from(Simplex1::new(v(0), v(1))).dimension(), 1);
  assert_eq!(Simplex::from(Simplex2::new(v(0), v(1), v(2))).dimension(), 2);
}
