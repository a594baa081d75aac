use super::*;
use crate::scatter::rng::SceneRng;

fn center_avoid(axis: BiasAxis, radius: f64, strength: f64) -> Bias {
    Bias::CenterAvoid(CenterAvoid {
        axis,
        radius,
        strength,
    })
}

#[test]
fn uniform_is_constant_one() {
    let b = Bias::Uniform;
    for (x, y) in [(0.0, 0.0), (0.5, 0.5), (0.99, 0.1)] {
        assert_eq!(b.weight(x, y), 1.0);
    }
}

#[test]
fn center_avoid_is_zero_at_center_and_one_at_edge() {
    let b = center_avoid(BiasAxis::Both, 0.3, 0.7);
    assert_eq!(b.weight(0.5, 0.5), 0.0);
    assert_eq!(b.weight(0.0, 0.0), 1.0);
    let mid = b.weight(0.1, 0.1);
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn axis_modes_measure_different_distances() {
    let x = center_avoid(BiasAxis::X, 0.3, 0.0);
    let y = center_avoid(BiasAxis::Y, 0.3, 0.0);
    let both = center_avoid(BiasAxis::Both, 0.3, 0.0);

    // On the vertical centre line only the x axis sees the centre.
    assert_eq!(x.weight(0.5, 0.0), 0.0);
    assert_eq!(y.weight(0.5, 0.0), 1.0);
    assert_eq!(both.weight(0.5, 0.0), 0.0);
    assert_eq!(both.weight(0.0, 0.5), 0.0);
}

#[test]
fn strength_sharpens_the_falloff() {
    let soft = center_avoid(BiasAxis::Both, 0.3, 0.0);
    let hard = center_avoid(BiasAxis::Both, 0.3, 1.0);
    let (px, py) = (0.15, 0.15);
    assert!(hard.weight(px, py) < soft.weight(px, py));
}

#[test]
fn edge_bias_evaluates_like_center_avoid() {
    let p = CenterAvoid::default();
    assert_eq!(
        Bias::EdgeBias(p).weight(0.2, 0.3),
        Bias::CenterAvoid(p).weight(0.2, 0.3)
    );
}

#[test]
fn acceptance_inside_radius_is_lower_than_outside() {
    let bias = center_avoid(BiasAxis::Both, 0.4, 0.5);
    let mut rng = SceneRng::from_seed_str("bias-monotonicity");
    let (mut in_n, mut in_acc, mut out_n, mut out_acc) = (0u32, 0u32, 0u32, 0u32);
    for _ in 0..50_000 {
        let x = rng.next_f64();
        let y = rng.next_f64();
        let accepted = rng.next_f64() <= bias.weight(x, y);
        let d = ((x - 0.5).abs() / 0.5).min((y - 0.5).abs() / 0.5);
        if d < 0.4 {
            in_n += 1;
            in_acc += u32::from(accepted);
        } else {
            out_n += 1;
            out_acc += u32::from(accepted);
        }
    }
    assert!(in_n > 0 && out_n > 0);
    let p_in = f64::from(in_acc) / f64::from(in_n);
    let p_out = f64::from(out_acc) / f64::from(out_n);
    assert!(p_in < p_out, "inside {p_in} vs outside {p_out}");
}

#[test]
fn deserializes_tagged_and_unknown_kinds() {
    let b: Bias =
        serde_json::from_str(r#"{"type":"centerAvoid","axis":"x","radius":0.2}"#).unwrap();
    assert_eq!(
        b,
        Bias::CenterAvoid(CenterAvoid {
            axis: BiasAxis::X,
            radius: 0.2,
            strength: 0.7,
        })
    );
    let u: Bias = serde_json::from_str(r#"{"type":"spiral"}"#).unwrap();
    assert_eq!(u, Bias::Uniform);
    let e: Bias = serde_json::from_str(r#"{"type":"edgeBias","axis":"diag"}"#).unwrap();
    assert!(matches!(
        e,
        Bias::EdgeBias(CenterAvoid {
            axis: BiasAxis::Both,
            ..
        })
    ));
}
