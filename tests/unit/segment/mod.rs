use super::*;
use crate::foundation::core::Rgba8;

fn product_on_white() -> RasterImage {
    let mut img = image::RgbaImage::from_pixel(20, 20, image::Rgba([250, 250, 250, 255]));
    for y in 6..14 {
        for x in 5..15 {
            img.put_pixel(x, y, image::Rgba([180, 30, 40, 255]));
        }
    }
    RasterImage::new(img).unwrap()
}

#[test]
fn keep_alpha_is_identity() {
    let photo = product_on_white();
    assert_eq!(KeepAlpha.segment(&photo).unwrap(), photo);
}

#[test]
fn closures_work_as_segmenters() {
    let blank = |p: &RasterImage| RasterImage::new(image::RgbaImage::new(p.width(), p.height()));
    let out = run_segmenter(&blank, &product_on_white());
    assert!(out.alpha_bounds().is_none());
}

fn run_segmenter(seg: &dyn Segmenter, photo: &RasterImage) -> RasterImage {
    seg.segment(photo).unwrap()
}

#[test]
fn border_key_removes_plain_backdrop() {
    let seg = BorderKeySegmenter::default();
    let photo = product_on_white();
    assert_eq!(seg.estimate_backdrop(&photo), Some([250, 250, 250]));

    let cut = seg.segment(&photo).unwrap();
    assert_eq!(cut.dimensions(), photo.dimensions());
    assert_eq!(cut.pixel(0, 0)[3], 0);
    assert_eq!(cut.pixel(10, 10), [180, 30, 40, 255]);
    assert_eq!(
        cut.alpha_bounds(),
        Some(crate::foundation::core::PixelRect::new(5, 6, 10, 8))
    );
}

#[test]
fn soft_ramp_gives_partial_alpha() {
    let mut img = image::RgbaImage::from_pixel(5, 5, image::Rgba([255, 255, 255, 255]));
    img.put_pixel(2, 2, image::Rgba([204, 204, 204, 255]));
    let photo = RasterImage::new(img).unwrap();

    let seg = BorderKeySegmenter {
        tolerance: 0.1,
        softness: 0.2,
    };
    let a = seg.segment(&photo).unwrap().pixel(2, 2)[3];
    assert!((126..=129).contains(&a), "alpha {a}");
}

#[test]
fn transparent_border_leaves_cutout_alone() {
    let mut img = image::RgbaImage::new(6, 6);
    img.put_pixel(3, 3, image::Rgba([1, 2, 3, 255]));
    let photo = RasterImage::new(img).unwrap();
    let seg = BorderKeySegmenter::default();
    assert_eq!(seg.estimate_backdrop(&photo), None);
    assert_eq!(seg.segment(&photo).unwrap(), photo);
}

#[test]
fn out_of_range_tolerance_is_rejected() {
    let photo = RasterImage::filled(4, 4, Rgba8::WHITE).unwrap();
    let err = BorderKeySegmenter::with_tolerance(1.5)
        .segment(&photo)
        .unwrap_err();
    assert!(matches!(err, PlinthError::InvalidParameter(_)));
}
