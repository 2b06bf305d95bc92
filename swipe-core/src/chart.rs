use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFrame {
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    All,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 5] = [
        TimeFrame::OneDay,
        TimeFrame::OneWeek,
        TimeFrame::OneMonth,
        TimeFrame::ThreeMonths,
        TimeFrame::All,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|tf| *tf == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Number of points and the lower bound of the band they fall in.
    fn shape(self) -> (usize, f64) {
        match self {
            TimeFrame::OneDay => (24, 90.0),
            TimeFrame::OneWeek => (7, 85.0),
            TimeFrame::OneMonth => (30, 75.0),
            TimeFrame::ThreeMonths => (12, 70.0),
            TimeFrame::All => (20, 60.0),
        }
    }

    pub fn labels(self) -> [&'static str; 5] {
        match self {
            TimeFrame::OneDay => ["", "6am", "12pm", "6pm", ""],
            TimeFrame::OneWeek => ["", "Mon", "Wed", "Fri", ""],
            TimeFrame::OneMonth => ["", "1w", "2w", "3w", ""],
            TimeFrame::ThreeMonths => ["", "May", "Jun", "Jul", ""],
            TimeFrame::All => ["", "2022", "2023", "2024", ""],
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFrame::OneDay => write!(f, "1D"),
            TimeFrame::OneWeek => write!(f, "1W"),
            TimeFrame::OneMonth => write!(f, "1M"),
            TimeFrame::ThreeMonths => write!(f, "3M"),
            TimeFrame::All => write!(f, "ALL"),
        }
    }
}

/// Illustrative performance series (percent of current value) for the
/// portfolio chart. There is no price history behind it.
pub fn chart_series<R: Rng>(time_frame: TimeFrame, rng: &mut R) -> Vec<f64> {
    let (points, low) = time_frame.shape();
    let mut series: Vec<f64> = (0..points).map(|_| rng.gen_range(low..100.0)).collect();
    series.shuffle(rng);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_series_shape_per_time_frame() {
        let mut rng = StdRng::seed_from_u64(7);
        let expected = [(24, 90.0), (7, 85.0), (30, 75.0), (12, 70.0), (20, 60.0)];

        for (tf, (len, low)) in TimeFrame::ALL.iter().zip(expected) {
            let series = chart_series(*tf, &mut rng);
            assert_eq!(series.len(), len, "{}", tf);
            assert!(series.iter().all(|v| *v >= low && *v < 100.0), "{}", tf);
        }
    }

    #[test]
    fn test_time_frame_cycle() {
        let mut tf = TimeFrame::default();
        let mut seen = vec![tf.to_string()];
        for _ in 0..5 {
            tf = tf.next();
            seen.push(tf.to_string());
        }
        assert_eq!(seen, vec!["1D", "1W", "1M", "3M", "ALL", "1D"]);
        assert_eq!(TimeFrame::All.labels()[2], "2023");
    }
}
