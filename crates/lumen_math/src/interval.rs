/// A closed range of ray parameters `[min, max]`.
///
/// BVH traversal narrows `max` as closer hits are found so that farther
/// nodes can be culled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns a copy of this interval with its upper bound lowered to `max`.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, self.max.min(max))
    }

    /// Every parameter in front of the ray origin.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::MAX,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_with_max_only_shrinks() {
        let interval = Interval::new(0.0, 10.0);
        assert_eq!(interval.with_max(4.0), Interval::new(0.0, 4.0));
        assert_eq!(interval.with_max(20.0), interval);
    }

    #[test]
    fn test_interval_forward() {
        assert_eq!(Interval::FORWARD.min, 0.0);
        assert_eq!(Interval::FORWARD.max, f32::MAX);
        assert_eq!(Interval::FORWARD.with_max(5.0), Interval::new(0.0, 5.0));
    }
}
