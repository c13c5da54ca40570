use super::*;

/// Probe directions must be usable after normalisation and pairwise distinct,
/// otherwise a retry repeats the same degenerate probe.
#[test]
fn test_probe_directions_distinct() {
  let dirs: Vec<glam::DVec3> = PROBE_DIRECTIONS
    .iter()
    .map(|d| glam::DVec3::from_array(*d).normalize())
    .collect();

  for (i, a) in dirs.iter().enumerate() {
    assert!(a.is_finite(), "Direction {} should normalise", i);
    for (j, b) in dirs.iter().enumerate().skip(i + 1) {
      assert!(
        a.dot(*b) < 0.99,
        "Directions {} and {} are nearly parallel",
        i,
        j
      );
    }
  }
}

/// No probe may run along a coordinate axis or a coordinate plane diagonal.
#[test]
fn test_probe_directions_off_axis() {
  for d in PROBE_DIRECTIONS {
    let n = glam::DVec3::from_array(d).normalize();
    assert!(n.x.abs() > 0.05 && n.y.abs() > 0.05 && n.z.abs() > 0.05);
    assert!((n.x.abs() - n.y.abs()).abs() > 1e-3);
    assert!((n.y.abs() - n.z.abs()).abs() > 1e-3);
  }
}

/// Probe angles must not repeat modulo pi (a ray and its reverse see the
/// same degeneracies).
#[test]
fn test_probe_angles_distinct_modulo_pi() {
  for (i, a) in PROBE_ANGLES.iter().enumerate() {
    for b in PROBE_ANGLES.iter().skip(i + 1) {
      let diff = (a - b).rem_euclid(std::f64::consts::PI);
      assert!(diff > 0.05 && diff < std::f64::consts::PI - 0.05);
    }
  }
}

#[test]
fn test_default_duplicity_allows_split() {
  // A split that puts every index in exactly one octant has ratio 1.
  assert!(DEFAULT_MAX_DUPLICITY >= 1.0);
  assert!(DEFAULT_MAX_LEAF_SIZE >= 1);
  assert!(DEFAULT_MAX_DEPTH <= MAX_SUPPORTED_DEPTH);
}
