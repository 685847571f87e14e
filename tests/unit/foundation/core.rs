use super::*;
use serde_json::json;

#[test]
fn rect_union_ignores_empty_and_covers_both() {
    let a = PixelRect::new(0, 0, 10, 10);
    let b = PixelRect::new(-5, 8, 4, 6);
    let u = a.union(b);
    assert_eq!(u, PixelRect::new(-5, 0, 15, 14));

    let empty = PixelRect::new(100, 100, 0, 3);
    assert_eq!(a.union(empty), a);
    assert_eq!(empty.union(a), a);
}

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("0000FF80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));

    assert!("#12345".parse::<Rgba8>().is_err());
    assert!("#zz0000".parse::<Rgba8>().is_err());
}

#[test]
fn parses_rgba_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 1.0, "g": 0.5, "b": 0.0})).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 128, 0));

    let c: Rgba8 = serde_json::from_value(json!([0.0, 0.0, 0.0, 0.5])).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 0, 128));

    assert!(serde_json::from_value::<Rgba8>(json!([0.1, 0.2])).is_err());
}

#[test]
fn hex_serialization_round_trips() {
    for c in [Rgba8::rgb(244, 244, 240), Rgba8::rgba(1, 2, 3, 4)] {
        let v = serde_json::to_value(c).unwrap();
        let back: Rgba8 = serde_json::from_value(v).unwrap();
        assert_eq!(back, c);
    }
}
