use crate::foundation::error::{PlinthError, PlinthResult};
use crate::foundation::math::mul_div255_u8;
use crate::raster::layer::Layer;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over of one pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(src[i], dc);
    }
    out
}

/// Source-over every pixel of `src` onto the equally sized `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> PlinthResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PlinthError::Other(anyhow::anyhow!(
            "over_in_place expects equal-length rgba8 buffers"
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over `src` onto `dst` with its top-left corner at `(x, y)`.
///
/// Parts of `src` falling outside `dst` are dropped.
pub fn paste_over(dst: &mut Layer, src: &Layer, x: i64, y: i64) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(i64::from(dst.width));
    let y1 = (y + i64::from(src.height)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let dst_w = dst.width as usize;
    let src_w = src.width as usize;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        for dx in x0..x1 {
            let sx = (dx - x) as usize;
            let si = (sy * src_w + sx) * 4;
            let s = [
                src.data[si],
                src.data[si + 1],
                src.data[si + 2],
                src.data[si + 3],
            ];
            if s[3] == 0 {
                continue;
            }
            let di = ((dy as usize) * dst_w + dx as usize) * 4;
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&over(d, s));
        }
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
