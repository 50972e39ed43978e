//! Parameter schedules for the search.
//!
//! [`StepSchedule`] produces the sampling steps tried by the outer loop and
//! [`SubsetSchedule`] produces the frame counts tried for one extracted
//! sequence. Both are plain value generators with no knowledge of the video
//! or the stitcher.

/// Geometric schedule of sampling steps.
///
/// Starting at `min_step`, each raw value is multiplied by `growth_factor`
/// until it exceeds `max_step`. Raw values are floored to integers and
/// consecutive duplicates are dropped, so the result is strictly ascending.
///
/// # Example
///
/// ```
/// use panosweep::StepSchedule;
///
/// let schedule = StepSchedule::new(2, 10, 1.5);
/// assert_eq!(schedule.values(), vec![2, 3, 4, 6]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSchedule {
    /// First step value.
    pub min_step: u32,
    /// Largest raw value still admitted (inclusive).
    pub max_step: u32,
    /// Multiplier applied to the raw value between steps.
    pub growth_factor: f64,
}

impl Default for StepSchedule {
    fn default() -> Self {
        Self {
            min_step: 2,
            max_step: 10,
            growth_factor: 1.5,
        }
    }
}

impl StepSchedule {
    /// Create a schedule from explicit bounds.
    pub fn new(min_step: u32, max_step: u32, growth_factor: f64) -> Self {
        Self {
            min_step,
            max_step,
            growth_factor,
        }
    }

    /// Returns `true` if the schedule would produce no step values.
    ///
    /// That is the case when the growth factor does not grow (≤ 1 or not
    /// finite), when `min_step` is zero, or when `min_step > max_step`.
    pub fn is_empty(&self) -> bool {
        !self.growth_factor.is_finite()
            || self.growth_factor <= 1.0
            || self.min_step == 0
            || self.min_step > self.max_step
    }

    /// Generate the ordered step values.
    ///
    /// The inclusion test is applied to the raw (unfloored) value: with the
    /// defaults the fifth raw value is 10.125, which exceeds 10 and ends the
    /// schedule even though its floor would not.
    pub fn values(&self) -> Vec<u32> {
        if self.is_empty() {
            return Vec::new();
        }

        let limit = f64::from(self.max_step);
        let mut raw = f64::from(self.min_step);
        let mut steps: Vec<u32> = Vec::new();

        while raw <= limit {
            let step = raw.floor() as u32;
            if steps.last() != Some(&step) {
                steps.push(step);
            }
            raw *= self.growth_factor;
        }

        steps
    }
}

/// Arithmetic schedule of subset sizes for one extracted sequence.
///
/// Produces `floor, floor + increment, …` up to and including the number of
/// extracted frames. With the defaults (4, 2) that is the even numbers from 4;
/// an odd total is never reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetSchedule {
    /// Smallest subset size tried.
    pub floor: usize,
    /// Distance between consecutive subset sizes.
    pub increment: usize,
}

impl Default for SubsetSchedule {
    fn default() -> Self {
        Self {
            floor: 4,
            increment: 2,
        }
    }
}

impl SubsetSchedule {
    /// Create a schedule from an explicit floor and increment.
    pub fn new(floor: usize, increment: usize) -> Self {
        Self { floor, increment }
    }

    /// Subset sizes to try for `total` extracted frames, ascending.
    ///
    /// Empty when `total < floor` or when the increment is zero.
    pub fn sizes(&self, total: usize) -> Vec<usize> {
        if self.increment == 0 || self.floor == 0 || total < self.floor {
            return Vec::new();
        }
        (self.floor..=total).step_by(self.increment).collect()
    }
}
