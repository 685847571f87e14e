use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_black_on_white_is_mid_gray() {
    let out = over([255, 255, 255, 255], [0, 0, 0, 128]);
    assert_eq!(out, [127, 127, 127, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    over_in_place(&mut dst, &[9, 9, 9, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![9, 9, 9, 255, 0, 0, 0, 0]);
}

#[test]
fn paste_over_clips_to_destination() {
    let mut dst = Layer::transparent(3, 3).unwrap();
    let src = Layer::from_premul(2, 2, [50u8, 60, 70, 255].repeat(4)).unwrap();

    paste_over(&mut dst, &src, -1, 2);
    assert_eq!(dst.pixel(0, 2), [50, 60, 70, 255]);
    assert_eq!(dst.pixel(1, 2), [0, 0, 0, 0]);
    assert_eq!(dst.alpha_bounds().map(|r| (r.width, r.height)), Some((1, 1)));

    paste_over(&mut dst, &src, 5, 5);
    assert_eq!(dst.max_alpha(), 255);
}
