use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::PlinthResult;
use crate::raster::image::RasterImage;

/// Encode `img` as PNG, keeping its alpha channel.
pub fn encode_png(img: &RasterImage) -> PlinthResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.as_rgba8()
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Encode `img` as PNG and write it to `path`, creating parent directories as needed.
pub fn save_png(img: &RasterImage, path: impl AsRef<Path>) -> PlinthResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    let bytes = encode_png(img)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}
