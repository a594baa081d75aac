use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap(), src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    assert_eq!(blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap(), src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((3 * w + 3) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[0, 0, 0, 255]);

    let out = blur_rgba8_premul(&src, w, h, 3, 1.0).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((sum_a - 255).abs() <= 6);
}

#[test]
fn shadow_blur_length_maps_to_sigma_and_radius() {
    assert_eq!(sigma_for_blur_px(6.0), 3.0);
    assert_eq!(radius_for_sigma(3.0), 9);
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(sigma_for_blur_px(-2.0), 0.0);
}

#[test]
fn bad_sigma_is_rejected() {
    let src = vec![0u8; 4];
    assert!(blur_rgba8_premul(&src, 1, 1, 2, 0.0).is_err());
    assert!(blur_rgba8_premul(&src, 2, 1, 2, 1.0).is_err());
}
