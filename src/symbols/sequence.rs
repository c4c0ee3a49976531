use crate::symbols::Schema;
use tracing::debug;

/// Sequence buttons and shortcuts. Every input is dispatched through
/// [`SequenceController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Reverse,
    Forward,
    First,
    Last,
}

/// Which year of the schema is on display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceController {
    years: Vec<i32>,
    index: usize,
}

impl SequenceController {
    /// Starts at the first year. `None` when there are no years to step through.
    pub fn new(years: Vec<i32>) -> Option<Self> {
        if years.is_empty() {
            return None;
        }
        Some(Self { years, index: 0 })
    }

    pub fn from_schema(schema: &Schema) -> Option<Self> {
        Self::new(schema.attributes().iter().map(|a| a.year).collect())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn current_year(&self) -> i32 {
        self.years[self.index]
    }

    pub fn min_year(&self) -> i32 {
        self.years[0]
    }

    pub fn max_year(&self) -> i32 {
        self.years[self.years.len() - 1]
    }

    /// Next year, wrapping from the last back to the first
    pub fn forward(&mut self) -> usize {
        self.index = (self.index + 1) % self.years.len();
        self.index
    }

    /// Previous year, wrapping from the first to the last
    pub fn reverse(&mut self) -> usize {
        self.index = self.index.checked_sub(1).unwrap_or(self.years.len() - 1);
        self.index
    }

    /// Jump to a slider position, clamped to the slider's range
    pub fn slide(&mut self, position: usize) -> usize {
        self.index = position.min(self.years.len() - 1);
        self.index
    }

    pub fn apply(&mut self, control: Control) -> usize {
        let index = match control {
            Control::Reverse => self.reverse(),
            Control::Forward => self.forward(),
            Control::First => self.slide(0),
            Control::Last => self.slide(usize::MAX),
        };
        debug!(?control, year = self.current_year(), "sequence step");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seq() -> SequenceController {
        SequenceController::new((1965..=2022).collect()).unwrap()
    }

    #[test]
    fn test_bounds_from_first_and_last() {
        let s = seq();
        assert_eq!(s.min_year(), 1965);
        assert_eq!(s.max_year(), 2022);
        assert_eq!(s.current_year(), 1965);
    }

    #[test]
    fn test_forward_wraps_to_first() {
        let mut s = seq();
        s.apply(Control::Last);
        assert_eq!(s.current_year(), 2022);
        s.apply(Control::Forward);
        assert_eq!(s.current_year(), 1965);
    }

    #[test]
    fn test_reverse_wraps_to_last() {
        let mut s = seq();
        s.apply(Control::Reverse);
        assert_eq!(s.current_year(), 2022);
    }

    #[test]
    fn test_slide_is_clamped() {
        let mut s = seq();
        assert_eq!(s.slide(25), 25);
        assert_eq!(s.current_year(), 1990);
        s.slide(10_000);
        assert_eq!(s.current_year(), 2022);
    }

    #[test]
    fn test_empty_has_no_controller() {
        assert!(SequenceController::new(Vec::new()).is_none());
    }

    #[test]
    fn test_single_year_wraps_onto_itself() {
        let mut s = SequenceController::new(vec![2022]).unwrap();
        s.forward();
        assert_eq!(s.current_year(), 2022);
        s.reverse();
        assert_eq!(s.current_year(), 2022);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_forward_then_reverse_is_identity(len in 1usize..80, start in 0usize..80) {
            let mut s = SequenceController::new((0..len as i32).collect()).unwrap();
            s.slide(start);
            let before = s.index();
            s.apply(Control::Forward);
            s.apply(Control::Reverse);
            prop_assert_eq!(s.index(), before);
        }

        #[test]
        fn prop_full_cycle_returns_home(len in 1usize..80, start in 0usize..80) {
            let mut s = SequenceController::new((0..len as i32).collect()).unwrap();
            s.slide(start);
            let before = s.index();
            for _ in 0..len {
                s.forward();
            }
            prop_assert_eq!(s.index(), before);
            prop_assert!(s.index() < s.len());
        }
    }
}
