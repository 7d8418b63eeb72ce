//! Hex geometry and view math on plain numbers and `Vec2`, no ECS.
//!
//! Positions here are in *screen space*: `+x` right, `+y` down.
//! [`screen_to_world`] flips into Bevy's y-up world.

use bevy::prelude::Vec2;

/// Angle of hex corner 0 in degrees. Corner `i` sits at `60°·i + CORNER_0_DEG`.
pub const CORNER_0_DEG: f32 = -30.0;

fn sqrt3() -> f32 {
    3.0_f32.sqrt()
}

/// Pointy-top axial → pixel projection.
///
/// `size` is the hex circumradius, `spacing` inflates the distance between
/// centers so adjacent hexes are drawn with a gap (`1.0` means touching).
///
/// # Examples
/// ```
/// # use sol3000::math::axial_to_pixel;
/// assert_eq!(axial_to_pixel(0, 0, 10.0, 1.0).x, 0.0);
/// assert_eq!(axial_to_pixel(0, 2, 10.0, 1.0).y, 30.0);
/// ```
pub fn axial_to_pixel(q: i32, r: i32, size: f32, spacing: f32) -> Vec2 {
    let s = size * spacing;
    Vec2::new(
        s * sqrt3() * (q as f32 + r as f32 / 2.0),
        s * 1.5 * r as f32,
    )
}

/// Inverse of [`axial_to_pixel`]: returns the axial cell whose center is
/// nearest to `pos`.
pub fn pixel_to_axial(pos: Vec2, size: f32, spacing: f32) -> (i32, i32) {
    let s = size * spacing;
    let q = (sqrt3() / 3.0 * pos.x - pos.y / 3.0) / s;
    let r = (2.0 / 3.0 * pos.y) / s;
    cube_round(q, r)
}

/// Rounds fractional axial coordinates to the containing hex.
///
/// Rounds all three cube components and then recomputes the one with the
/// largest rounding error so that `q + r + s == 0` still holds.
pub fn cube_round(q: f32, r: f32) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i32, rr as i32)
}

/// Offset of corner `index` (0..5) from the hex center, scaled by `size`.
pub fn corner_offset(index: usize, size: f32) -> Vec2 {
    let angle = (60.0 * (index % 6) as f32 + CORNER_0_DEG).to_radians();
    Vec2::new(size * angle.cos(), size * angle.sin())
}

/// Whether `offset` from a pointy-top hex center lies inside the hexagon of
/// circumradius `size`. Edges count as inside.
pub fn point_in_hex(offset: Vec2, size: f32) -> bool {
    let apothem = size * sqrt3() / 2.0;
    let p = offset.abs();
    p.x <= apothem && 0.5 * p.x + sqrt3() / 2.0 * p.y <= apothem
}

/// Number of cells in a hexagon-shaped grid of the given ring radius.
pub fn hex_count(radius: u32) -> usize {
    let n = radius as usize;
    3 * n * n + 3 * n + 1
}

/// Flips a screen-space (y-down) position into world space (y-up).
pub fn screen_to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Fbm<Perlin>`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Camera translation after zooming from `old_scale` to `new_scale` while
/// keeping `anchor` (a world position, usually under the cursor) fixed on
/// screen.
pub fn zoom_about(camera: Vec2, anchor: Vec2, old_scale: f32, new_scale: f32) -> Vec2 {
    if old_scale <= 0.0 {
        return camera;
    }
    camera + (anchor - camera) * (1.0 - new_scale / old_scale)
}

/// World position under a viewport `cursor` (pixels, y down) for a camera at
/// `camera` with orthographic `scale` over a viewport of `viewport` pixels.
pub fn viewport_to_world(cursor: Vec2, viewport: Vec2, camera: Vec2, scale: f32) -> Vec2 {
    camera + screen_to_world(cursor - viewport / 2.0) * scale
}
