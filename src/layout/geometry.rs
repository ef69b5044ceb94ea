/// A position in the diagram's coordinate space. `x` grows to the right and
/// `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point.
    pub fn y(self) -> f32 {
        self.y
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from two opposite corners.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Creates bounds spanning `min_x..max_x` horizontally and centered on
    /// `center_y` with the given height.
    pub fn band(min_x: f32, max_x: f32, center_y: f32, height: f32) -> Self {
        let half_height = height / 2.0;
        Self { min_x, min_y: center_y - half_height, max_x, max_y: center_y + half_height }
    }

    /// Returns the minimum x-coordinate of the bounds.
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds.
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds.
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds.
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds.
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds.
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds.
    pub fn center(self) -> Point {
        Point { x: (self.min_x + self.max_x) / 2.0, y: (self.min_y + self.max_y) / 2.0 }
    }

    /// Checks whether `point` lies inside the bounds, edges included.
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn band_is_centered() {
        let bounds = Bounds::band(10.0, 30.0, 50.0, 10.0);
        assert_approx_eq!(f32, bounds.min_y(), 45.0);
        assert_approx_eq!(f32, bounds.max_y(), 55.0);
        assert_approx_eq!(f32, bounds.width(), 20.0);
        assert_approx_eq!(f32, bounds.center().x(), 20.0);
        assert_approx_eq!(f32, bounds.center().y(), 50.0);
    }

    #[test]
    fn contains_edges() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 5.0);
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(10.0, 5.0)));
        assert!(!bounds.contains(Point::new(10.5, 2.0)));
        assert!(!bounds.contains(Point::new(5.0, -0.1)));
    }
}
