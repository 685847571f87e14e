use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let mask = AlphaMask::from_fn(5, 3, |x, y| (x * 40 + y * 7) as u8).unwrap();
    assert_eq!(blur_mask(&mask, 0.0).unwrap(), mask);

    let layer = Layer::from_premul(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(blur_layer(&layer, 0.0).unwrap(), layer);
}

#[test]
fn blur_rejects_negative_or_huge_sigma() {
    let mask = AlphaMask::from_fn(2, 2, |_, _| 255).unwrap();
    for sigma in [-1.0, f32::NAN, MAX_BLUR_SIGMA + 1.0] {
        let err = blur_mask(&mask, sigma).unwrap_err();
        assert!(matches!(err, PlinthError::InvalidParameter(_)));
    }
}

#[test]
fn blur_constant_buffer_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let kernel = gaussian_kernel_q16(3, 2.0).unwrap();
    let out = blur_q16::<4>(&src, w, h, &kernel).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_mask_grows_by_kernel_radius_and_conserves_energy() {
    let mask = AlphaMask::from_fn(1, 1, |_, _| 255).unwrap();
    let out = blur_mask(&mask, 1.0).unwrap();
    assert_eq!(kernel_radius(1.0), 3);
    assert_eq!((out.width(), out.height()), (7, 7));

    let nonzero = out.as_raw().iter().filter(|&&v| v != 0).count();
    assert!(nonzero > 1);
    assert_eq!(out.max_level(), out.level(3, 3));

    let sum: u32 = out.as_raw().iter().map(|&v| u32::from(v)).sum();
    assert!((sum as i32 - 255).abs() <= 6);
}

#[test]
fn blur_layer_spreads_alpha_without_clipping() {
    let layer = Layer::from_premul(1, 1, vec![255, 255, 255, 255]).unwrap();
    let out = blur_layer(&layer, 0.8).unwrap();
    assert_eq!((out.width, out.height), (7, 7));
    let edge = out.pixel(0, 3)[3];
    let center = out.pixel(3, 3)[3];
    assert!(center > edge);
}
