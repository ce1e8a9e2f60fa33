//! Pure selection-geometry functions. All functions are total: inputs
//! outside the image bounds are clamped, never rejected, and nothing
//! here panics or touches pixel data.

use crate::types::{AspectRatio, GuideLine, Point, Rect};

/// Smallest selection dimension a zoom-out may leave behind.
pub const MIN_ZOOM_DIMENSION: i32 = 10;

const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Computes the selection rectangle anchored at `press` and extending
/// toward `current`, clamped to `bounds` and ordered so that
/// `left <= right` and `top <= bottom` whatever the drag direction.
///
/// With a fixed `ratio` the height is derived from the width; when a
/// boundary clamp shrinks one axis the other is re-derived from it, so
/// the constraint survives clamping. Seeding the initial maximal box is
/// the same call with `press = (0, 0)` and `current = (w, h)`.
pub fn derive_box(
    bounds: (u32, u32),
    press: Point,
    current: Point,
    ratio: Option<AspectRatio>,
) -> Rect {
    let bound_w = bounds.0 as f64;
    let bound_h = bounds.1 as f64;

    let start_x = (press.x as f64).clamp(0.0, bound_w);
    let start_y = (press.y as f64).clamp(0.0, bound_h);
    let current_x = (current.x as f64).clamp(0.0, bound_w);
    let current_y = (current.y as f64).clamp(0.0, bound_h);

    let mut width = (current_x - start_x).abs();
    let mut height = (current_y - start_y).abs();

    if let Some(r) = ratio {
        height = width / r.num as f64 * r.den as f64;
    }

    // Clamp the horizontal axis in the direction of the drag.
    if start_x < current_x {
        if start_x + width > bound_w {
            width = bound_w - start_x;
            if let Some(r) = ratio {
                height = width / r.num as f64 * r.den as f64;
            }
        }
    } else if start_x - width < 0.0 {
        width = start_x;
        if let Some(r) = ratio {
            height = width / r.num as f64 * r.den as f64;
        }
    }

    // Clamp the vertical axis; with a ratio active the width is
    // re-derived from the clamped height. Re-derivation only ever
    // shrinks, so the horizontal clamp cannot be undone here.
    if start_y < current_y {
        if start_y + height > bound_h {
            height = bound_h - start_y;
            if let Some(r) = ratio {
                width = height / r.den as f64 * r.num as f64;
            }
        }
    } else if start_y - height < 0.0 {
        height = start_y;
        if let Some(r) = ratio {
            width = height / r.den as f64 * r.num as f64;
        }
    }

    let (left, right) = if current_x < start_x {
        (start_x - width, start_x)
    } else {
        (start_x, start_x + width)
    };
    let (top, bottom) = if current_y < start_y {
        (start_y - height, start_y)
    } else {
        (start_y, start_y + height)
    };

    Rect::new(left as i32, top as i32, right as i32, bottom as i32)
}

/// Validates a proposed move of an existing box. Returns the offset
/// unchanged when every translated corner stays within
/// `[0, w] x [0, h]`, otherwise `None`. A move is rejected wholesale
/// rather than partially clamped, so dragging along an edge never
/// distorts the box.
pub fn clamp_translate(rect: Rect, dx: i32, dy: i32, bounds: (u32, u32)) -> Option<(i32, i32)> {
    let moved = rect.translated(dx, dy);
    if moved.left >= 0
        && moved.top >= 0
        && moved.right <= bounds.0 as i32
        && moved.bottom <= bounds.1 as i32
    {
        Some((dx, dy))
    } else {
        None
    }
}

/// Grows or shrinks the box from its top-left corner by `step_px` on
/// the width axis. The height follows the fixed `ratio` when one is
/// set, otherwise the box's own current shape, so zooming preserves
/// shape either way. Growth is clamped against `bounds`; a shrink that
/// would leave either dimension under [`MIN_ZOOM_DIMENSION`] returns
/// the box unchanged.
pub fn apply_zoom(
    rect: Rect,
    delta_sign: i32,
    step_px: u32,
    ratio: Option<AspectRatio>,
    bounds: (u32, u32),
) -> Rect {
    let bound_w = bounds.0 as f64;
    let bound_h = bounds.1 as f64;
    let left = rect.left as f64;
    let top = rect.top as f64;

    let (num, den) = match ratio {
        Some(r) => (r.num as f64, r.den as f64),
        None if rect.width() > 0 && rect.height() > 0 => {
            (rect.width() as f64, rect.height() as f64)
        }
        // A degenerate box has no shape to preserve.
        None => (1.0, 1.0),
    };

    let delta = if delta_sign > 0 {
        step_px as f64
    } else {
        -(step_px as f64)
    };

    let mut new_width = rect.width() as f64 + delta;
    let mut new_height = new_width / num * den;

    if left + new_width > bound_w {
        new_width = bound_w - left;
        new_height = new_width / num * den;
    }
    if top + new_height > bound_h {
        new_height = bound_h - top;
        new_width = new_height / den * num;
    }

    if delta < 0.0
        && (new_width < MIN_ZOOM_DIMENSION as f64 || new_height < MIN_ZOOM_DIMENSION as f64)
    {
        return rect;
    }

    Rect::new(
        rect.left,
        rect.top,
        (left + new_width) as i32,
        (top + new_height) as i32,
    )
}

/// Maps a canvas-space box back to source-image pixel space. Each of
/// the four coordinates is scaled by its axis ratio and truncated
/// independently; an off-by-one between the mapped width and
/// `displayed_width * ratio` is expected.
pub fn to_source_box(rect: Rect, source: (u32, u32), displayed: (u32, u32)) -> Rect {
    if displayed.0 == 0 || displayed.1 == 0 {
        return rect;
    }

    let x_ratio = source.0 as f64 / displayed.0 as f64;
    let y_ratio = source.1 as f64 / displayed.1 as f64;

    Rect::new(
        (rect.left as f64 * x_ratio) as i32,
        (rect.top as f64 * y_ratio) as i32,
        (rect.right as f64 * x_ratio) as i32,
        (rect.bottom as f64 * y_ratio) as i32,
    )
}

/// Two vertical and two horizontal guide lines at the golden-ratio
/// offsets within the box. Derived values only; recomputed on every box
/// update.
pub fn golden_guides(rect: Rect) -> [GuideLine; 4] {
    let width = rect.width() as f64;
    let height = rect.height() as f64;

    let near_x = rect.left + (width * (1.0 - INV_PHI)) as i32;
    let far_x = rect.left + (width * INV_PHI) as i32;
    let near_y = rect.top + (height * (1.0 - INV_PHI)) as i32;
    let far_y = rect.top + (height * INV_PHI) as i32;

    [
        GuideLine {
            x0: near_x,
            y0: rect.top,
            x1: near_x,
            y1: rect.bottom,
        },
        GuideLine {
            x0: far_x,
            y0: rect.top,
            x1: far_x,
            y1: rect.bottom,
        },
        GuideLine {
            x0: rect.left,
            y0: near_y,
            x1: rect.right,
            y1: near_y,
        },
        GuideLine {
            x0: rect.left,
            y0: far_y,
            x1: rect.right,
            y1: far_y,
        },
    ]
}
