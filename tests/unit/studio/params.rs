use super::*;

#[test]
fn defaults_validate() {
    StudioRequest::default().validate().unwrap();
    StudioRequest::new(StudioStyle::Gradient(ShadowParameters::default()))
        .validate()
        .unwrap();
    StudioRequest::new(StudioStyle::Reflection(ReflectionParameters::default()))
        .validate()
        .unwrap();
}

#[test]
fn json_mode_tag_selects_style_and_fills_defaults() {
    let req = StudioRequest::from_json_str(
        r##"{
            "style": { "mode": "gradient", "intensity": 0.8, "spread": 1.4 },
            "backdrop": "#f4f4f0"
        }"##,
    )
    .unwrap();

    let StudioStyle::Gradient(p) = req.style else {
        panic!("expected gradient style, got {:?}", req.style);
    };
    assert_eq!(p.intensity, 0.8);
    assert_eq!(p.spread, 1.4);
    assert_eq!(p.blur_radius, ShadowParameters::default().blur_radius);
    assert_eq!(req.backdrop, Some(Rgba8::rgb(0xf4, 0xf4, 0xf0)));
    assert!(req.trim);
    assert_eq!(req.style.name(), "gradient");
}

#[test]
fn reflection_falloff_parses_snake_case() {
    let req = StudioRequest::from_json_str(
        r#"{ "style": { "mode": "reflection", "falloff": "quadratic", "length_fraction": 0.5 } }"#,
    )
    .unwrap();
    let StudioStyle::Reflection(p) = req.style else {
        panic!("expected reflection style");
    };
    assert_eq!(p.falloff, Falloff::Quadratic);
    assert_eq!(p.falloff.exponent(), 2);
    assert_eq!(p.length_fraction, 0.5);
}

#[test]
fn unknown_mode_is_invalid_parameter() {
    let err = StudioRequest::from_json_str(r#"{ "style": { "mode": "neon" } }"#).unwrap_err();
    assert!(matches!(err, PlinthError::InvalidParameter(_)));
}

#[test]
fn out_of_domain_values_are_rejected() {
    let bad_shadows = [
        ShadowParameters {
            intensity: 1.5,
            ..ShadowParameters::default()
        },
        ShadowParameters {
            blur_radius: -1.0,
            ..ShadowParameters::default()
        },
        ShadowParameters {
            spread: 0.0,
            ..ShadowParameters::default()
        },
        ShadowParameters {
            squash: Some(0.0),
            ..ShadowParameters::default()
        },
        ShadowParameters {
            vertical_offset: MAX_VERTICAL_OFFSET + 1,
            ..ShadowParameters::default()
        },
        ShadowParameters {
            vertical_offset: i32::MIN,
            ..ShadowParameters::default()
        },
    ];
    for p in bad_shadows {
        let err = StudioRequest::new(StudioStyle::Silhouette(p))
            .validate()
            .unwrap_err();
        assert!(matches!(err, PlinthError::InvalidParameter(_)), "{p:?}");
    }

    let bad_reflections = [
        ReflectionParameters {
            length_fraction: 0.0,
            ..ReflectionParameters::default()
        },
        ReflectionParameters {
            gap: MAX_REFLECTION_GAP + 1,
            ..ReflectionParameters::default()
        },
        ReflectionParameters {
            gap: u32::MAX,
            ..ReflectionParameters::default()
        },
    ];
    for p in bad_reflections {
        let err = StudioRequest::new(StudioStyle::Reflection(p))
            .validate()
            .unwrap_err();
        assert!(matches!(err, PlinthError::InvalidParameter(_)), "{p:?}");
    }

    let bad_canvas = StudioRequest {
        canvas_scale: 0.5,
        ..StudioRequest::default()
    };
    assert!(bad_canvas.validate().is_err());
}

#[test]
fn u8_levels_map_to_unit_range() {
    let p = ShadowParameters::default().with_intensity_u8(255);
    assert_eq!(p.intensity, 1.0);
    let r = ReflectionParameters::default().with_opacity_u8(0);
    assert_eq!(r.opacity, 0.0);
}

#[test]
fn pixel_shifts_at_their_bounds_are_accepted() {
    for offset in [-MAX_VERTICAL_OFFSET, 0, MAX_VERTICAL_OFFSET] {
        let p = ShadowParameters {
            vertical_offset: offset,
            ..ShadowParameters::default()
        };
        StudioRequest::new(StudioStyle::Gradient(p))
            .validate()
            .unwrap();
    }
    let r = ReflectionParameters {
        gap: MAX_REFLECTION_GAP,
        ..ReflectionParameters::default()
    };
    StudioRequest::new(StudioStyle::Reflection(r))
        .validate()
        .unwrap();
}
