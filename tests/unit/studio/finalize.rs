use super::*;

fn canvas_with_block(w: u32, h: u32, block: PixelRect) -> Layer {
    let mut canvas = Layer::transparent(w, h).unwrap();
    let red = Layer::from_raster(
        &RasterImage::filled(block.width, block.height, Rgba8::rgb(200, 20, 20)).unwrap(),
    );
    crate::effects::composite::paste_over(&mut canvas, &red, block.x, block.y);
    canvas
}

#[test]
fn trim_drops_transparent_margin() {
    let canvas = canvas_with_block(30, 20, PixelRect::new(4, 6, 10, 5));
    let trimmed = trim(&canvas.to_raster().unwrap()).unwrap();
    assert_eq!(trimmed.dimensions(), (10, 5));
    assert_eq!(trimmed.pixel(0, 0), [200, 20, 20, 255]);
}

#[test]
fn trim_is_idempotent() {
    let canvas = canvas_with_block(30, 20, PixelRect::new(3, 2, 7, 9));
    let once = trim(&canvas.to_raster().unwrap()).unwrap();
    let twice = trim(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn empty_canvas_fails_with_or_without_trim() {
    let canvas = Layer::transparent(16, 16).unwrap();
    for trim_canvas in [true, false] {
        let err = finalize(&canvas, trim_canvas, None).unwrap_err();
        assert!(err.is_empty_composition(), "trim={trim_canvas}: {err}");
    }
    let blank = RasterImage::new(image::RgbaImage::new(4, 4)).unwrap();
    assert!(trim(&blank).unwrap_err().is_empty_composition());
}

#[test]
fn untrimmed_output_keeps_canvas_size() {
    let canvas = canvas_with_block(30, 20, PixelRect::new(4, 6, 10, 5));
    let out = finalize(&canvas, false, None).unwrap();
    assert_eq!(out.image.dimensions(), (30, 20));
    assert_eq!(out.crop, PixelRect::new(0, 0, 30, 20));
    assert!(out.preview.is_none());
}

#[test]
fn preview_is_opaque_and_matches_image_size() {
    let canvas = canvas_with_block(30, 20, PixelRect::new(4, 6, 10, 5));
    let out = finalize(&canvas, true, Some(Rgba8::rgba(255, 255, 255, 10))).unwrap();
    assert_eq!(out.crop, PixelRect::new(4, 6, 10, 5));

    let preview = out.preview.unwrap();
    assert_eq!(preview.dimensions(), out.image.dimensions());
    assert!(preview.as_raw().chunks_exact(4).all(|px| px[3] == 255));
    // Transparent output is untouched by flattening.
    assert_eq!(out.image.pixel(0, 0), [200, 20, 20, 255]);
}

#[test]
fn flatten_blends_partial_alpha_over_backdrop() {
    let img = RasterImage::from_raw(1, 1, vec![255, 0, 0, 128]).unwrap();
    let flat = flatten(&img, Rgba8::WHITE).unwrap();
    assert_eq!(flat.pixel(0, 0), [255, 127, 127, 255]);
}
