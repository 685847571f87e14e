use super::*;
use crate::foundation::core::Rgba8;
use crate::segment::KeepAlpha;
use crate::studio::params::{ReflectionParameters, ShadowParameters, StudioStyle};

#[test]
fn subject_rect_points_at_subject_after_trim() {
    let subject = RasterImage::filled(24, 32, Rgba8::rgb(10, 120, 230)).unwrap();
    let out = compose(&subject, &StudioRequest::default()).unwrap();

    let r = out.subject_rect;
    assert_eq!((r.width, r.height), (24, 32));
    assert!(r.x >= 0 && r.y >= 0);
    assert!(r.right() <= i64::from(out.image.width()));
    for (x, y) in [(0, 0), (23, 0), (0, 31), (23, 31), (12, 16)] {
        let px = out.image.pixel((r.x + x) as u32, (r.y + y) as u32);
        assert_eq!(px, [10, 120, 230, 255]);
    }
    // Ground shadow reaches below the subject.
    assert!(r.bottom() < i64::from(out.image.height()));
}

#[test]
fn invalid_request_fails_before_any_work() {
    let subject = RasterImage::filled(8, 8, Rgba8::WHITE).unwrap();
    let request = StudioRequest::new(StudioStyle::Gradient(ShadowParameters {
        blur_radius: -3.0,
        ..ShadowParameters::default()
    }));
    let err = compose(&subject, &request).unwrap_err();
    assert!(matches!(err, crate::PlinthError::InvalidParameter(_)));
}

#[test]
fn compose_photo_runs_segmenter_first() {
    let subject = RasterImage::filled(16, 16, Rgba8::WHITE).unwrap();
    let direct = compose(&subject, &StudioRequest::default()).unwrap();
    let via = compose_photo(&subject, &KeepAlpha, &StudioRequest::default()).unwrap();
    assert_eq!(direct.image, via.image);
    assert_eq!(direct.subject_rect, via.subject_rect);
}

#[test]
fn huge_pixel_shifts_are_rejected_instead_of_allocating() {
    let subject = RasterImage::filled(100, 200, Rgba8::WHITE).unwrap();
    let requests = [
        StudioRequest::new(StudioStyle::Gradient(ShadowParameters {
            vertical_offset: i32::MAX,
            blur_radius: 0.0,
            ..ShadowParameters::default()
        })),
        StudioRequest::new(StudioStyle::Reflection(ReflectionParameters {
            gap: u32::MAX,
            ..ReflectionParameters::default()
        })),
    ];
    for request in requests {
        let err = compose(&subject, &request).unwrap_err();
        assert!(matches!(err, crate::PlinthError::InvalidParameter(_)), "{err}");
    }
}
