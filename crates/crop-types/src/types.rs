use serde::{Deserialize, Serialize};

/// A point in canvas (display) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with `left <= right` and `top <= bottom`,
/// in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        debug_assert!(left <= right && top <= bottom);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Closed-bounds containment: points on the edge count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// A fixed width:height constraint. Absent means free-form selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub num: u32,
    pub den: u32,
}

impl AspectRatio {
    pub fn new(num: u32, den: u32) -> Self {
        debug_assert!(num > 0 && den > 0);
        Self { num, den }
    }

    /// Swaps width and height, e.g. 4:3 becomes 3:4.
    pub fn rotated(self) -> Self {
        Self {
            num: self.den,
            den: self.num,
        }
    }
}

/// Dimensions of the currently displayed frame. Computed once per image
/// load/rotation/resize and replaced wholesale; `displayed_*` never
/// exceed `source_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub source_width: u32,
    pub source_height: u32,
    pub displayed_width: u32,
    pub displayed_height: u32,
}

impl ImageGeometry {
    pub fn new(source: (u32, u32), displayed: (u32, u32)) -> Self {
        Self {
            source_width: source.0,
            source_height: source.1,
            displayed_width: displayed.0,
            displayed_height: displayed.1,
        }
    }

    pub fn displayed(&self) -> (u32, u32) {
        (self.displayed_width, self.displayed_height)
    }

    pub fn source(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }
}

/// One golden-ratio guide line inside the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideLine {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10, 20, 110, 70);
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let r = Rect::new(0, 0, 100, 50);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(100, 50)));
        assert!(r.contains(Point::new(50, 25)));
        assert!(!r.contains(Point::new(101, 25)));
        assert!(!r.contains(Point::new(50, -1)));
    }

    #[test]
    fn test_aspect_ratio_rotated() {
        let ratio = AspectRatio::new(4, 3);
        assert_eq!(ratio.rotated(), AspectRatio::new(3, 4));
        assert_eq!(ratio.rotated().rotated(), ratio);
    }
}
