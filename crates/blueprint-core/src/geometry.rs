//! Geometric primitives for diagram layout and positioning.
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! The coordinate system matches SVG: origin at the top-left, X grows to the
//! right and Y grows downward.

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use blueprint_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean distance from the origin.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the bounds of a box of `size` centered on this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;
        Bounds {
            min_x: self.x - half_width,
            min_y: self.y - half_height,
            max_x: self.x + half_width,
            max_y: self.y + half_height,
        }
    }

    /// Finds where the ray from this point toward `target` leaves a box of
    /// `size` centered on this point.
    ///
    /// Falls back to `target` when the two points coincide.
    pub fn box_exit_toward(self, target: Point, size: Size) -> Point {
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;

        let dist = target.sub_point(self);
        let length = dist.hypot();
        if length < 0.001 {
            return target;
        }

        let dx = dist.x() / length;
        let dy = dist.y() / length;

        // Distance along the ray to the vertical and horizontal edges
        let t_x = if dx.abs() > f32::EPSILON {
            half_width / dx.abs()
        } else {
            f32::MAX
        };
        let t_y = if dy.abs() > f32::EPSILON {
            half_height / dy.abs()
        } else {
            f32::MAX
        };
        let t = t_x.min(t_y);

        Point::new(dx.mul_add(t, self.x), dy.mul_add(t, self.y))
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the larger width and the larger height of the two sizes.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// A rectangular bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn max_point(self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the smallest bounds containing both.
    pub fn merge(&self, other: &Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1.0f32..500.0, 1.0f32..500.0).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        #[test]
        fn exit_point_is_on_boundary_or_target(
            a in point_strategy(),
            b in point_strategy(),
            size in size_strategy(),
        ) {
            let exit = a.box_exit_toward(b, size);
            let half_w = size.width() / 2.0;
            let half_h = size.height() / 2.0;

            let on_vertical = approx_eq!(f32, (exit.x() - a.x()).abs(), half_w, epsilon = 0.1);
            let on_horizontal = approx_eq!(f32, (exit.y() - a.y()).abs(), half_h, epsilon = 0.1);
            let is_fallback = approx_eq!(f32, exit.x(), b.x(), epsilon = 0.1)
                && approx_eq!(f32, exit.y(), b.y(), epsilon = 0.1);

            prop_assert!(exit.x().is_finite() && exit.y().is_finite());
            prop_assert!(
                on_vertical || on_horizontal || is_fallback,
                "{exit:?} not on boundary of box at {a:?} with size {size:?}"
            );
        }
    }
}
