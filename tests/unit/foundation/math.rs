use super::*;

fn fnv(s: &str) -> u32 {
    let mut h = Fnv1a32::new_default();
    h.write_str(s);
    h.finish()
}

#[test]
fn fnv_matches_reference_vectors() {
    assert_eq!(fnv(""), 0x811c_9dc5);
    assert_eq!(fnv("a"), 0xe40c_292c);
    assert_eq!(fnv("foobar"), 0xbf9c_f968);
}

#[test]
fn fnv_hashes_utf16_units() {
    let mut a = Fnv1a32::new_default();
    a.write_str("é");
    let mut b = Fnv1a32::new_default();
    b.write_unit(0x00e9);
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn smoothstep_edges_and_midpoint() {
    assert_eq!(smoothstep(0.3, 1.0, 0.0), 0.0);
    assert_eq!(smoothstep(0.3, 1.0, 1.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
    assert_eq!(smoothstep(1.0, 1.0, 0.5), 0.0);
    assert_eq!(smoothstep(1.0, 1.0, 1.0), 1.0);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(128, 255), 128);
    assert_eq!(mul_div255(0, 200), 0);
    assert_eq!(add_sat_u8(200, 100), 255);
}
