//! Transient stroke paths.

use crate::geometry::Point;

/// Points closer than this to the previous one are dropped.
const MIN_STEP: f32 = 0.5;

/// Ordered image-space points of one continuous paint gesture.
///
/// A stroke lives from touch-down to touch-up. Each new point forms a segment
/// with the previous one; segments are rasterized as they arrive and the
/// stroke is discarded when the gesture ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `origin`.
    pub fn begin(origin: Point) -> Self {
        Self {
            points: vec![origin],
        }
    }

    /// Append a point. Returns `false` if it was too close to the last one.
    pub fn push(&mut self, point: Point) -> bool {
        if let Some(last) = self.points.last() {
            if last.distance(point) < MIN_STEP {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    /// The newest segment: the last two points, or the lone origin.
    pub fn last_segment(&self) -> &[Point] {
        let start = self.points.len().saturating_sub(2);
        &self.points[start..]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_has_origin_segment() {
        let stroke = Stroke::begin(Point::new(1.0, 2.0));
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.last_segment(), &[Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_push_extends_segment() {
        let mut stroke = Stroke::begin(Point::new(0.0, 0.0));
        assert!(stroke.push(Point::new(10.0, 0.0)));
        assert!(stroke.push(Point::new(20.0, 5.0)));
        assert_eq!(stroke.len(), 3);
        assert_eq!(
            stroke.last_segment(),
            &[Point::new(10.0, 0.0), Point::new(20.0, 5.0)]
        );
    }

    #[test]
    fn test_push_drops_jitter() {
        let mut stroke = Stroke::begin(Point::new(0.0, 0.0));
        assert!(!stroke.push(Point::new(0.1, 0.1)));
        assert_eq!(stroke.len(), 1);
    }

    #[test]
    fn test_default_is_empty() {
        let stroke = Stroke::default();
        assert!(stroke.is_empty());
        assert!(stroke.last_segment().is_empty());
    }
}
