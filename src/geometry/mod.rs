//! Page geometry and unit conversion.
//!
//! Labels are authored in a top-left coordinate space: the origin sits at the
//! page's top-left corner and y grows downward. PDF user space puts the origin
//! at the bottom-left with y growing upward. [`PageSize::flip`] and
//! [`Rect::hanging_from`] compute render coordinates as plain values, so the
//! stored element geometry is never touched while painting.

use serde::{Deserialize, Serialize};

/// Points per millimeter (1 mm = 72/25.4 pt).
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Convert millimeters to points.
///
/// # Examples
///
/// ```
/// use labelgen::geometry::mm_to_pt;
///
/// assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
/// ```
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Convert points to millimeters.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelgen::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of an element, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Size {
    /// Create a size from point values.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a size from millimeter values.
    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self::new(mm_to_pt(width_mm), mm_to_pt(height_mm))
    }
}

/// A rectangle in bottom-left (renderer) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the lower-left corner
    pub x: f32,
    /// Y coordinate of the lower-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of `size` whose top-left corner is `top_left`, both in renderer
    /// space (y grows upward).
    ///
    /// ```
    /// use labelgen::geometry::{Point, Rect, Size};
    ///
    /// let r = Rect::hanging_from(Point::new(5.0, 90.0), Size::new(40.0, 30.0));
    /// assert_eq!((r.x, r.y, r.top()), (5.0, 60.0, 90.0));
    /// ```
    pub fn hanging_from(top_left: Point, size: Size) -> Self {
        Self::new(top_left.x, top_left.y - size.height, size.width, size.height)
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Page dimensions, stored in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
}

impl PageSize {
    /// ISO A4 (210 x 297 mm).
    pub const A4_MM: (f32, f32) = (210.0, 297.0);

    /// Create a page size from millimeters.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelgen::geometry::PageSize;
    ///
    /// let size = PageSize::from_mm(40.0, 30.0);
    /// assert!((size.width - 113.385_83).abs() < 1e-3);
    /// assert!((size.height - 85.039_37).abs() < 1e-3);
    /// ```
    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width: mm_to_pt(width_mm),
            height: mm_to_pt(height_mm),
        }
    }

    /// ISO A4 in points.
    pub fn a4() -> Self {
        Self::from_mm(Self::A4_MM.0, Self::A4_MM.1)
    }

    /// Dimensions converted back to millimeters.
    pub fn to_mm(&self) -> (f32, f32) {
        (pt_to_mm(self.width), pt_to_mm(self.height))
    }

    /// Full-page rectangle, used for the background fill.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Map a top-left anchored point to renderer space: `y' = height - y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use labelgen::geometry::{PageSize, Point};
    ///
    /// let page = PageSize { width: 100.0, height: 200.0 };
    /// assert_eq!(page.flip(Point::new(10.0, 50.0)), Point::new(10.0, 150.0));
    /// ```
    pub fn flip(&self, p: Point) -> Point {
        Point::new(p.x, self.height - p.y)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::a4()
    }
}
