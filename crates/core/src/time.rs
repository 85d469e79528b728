use isound_transport::Millis;

const RULER_DIVISIONS: usize = 30;
const RULER_LABEL_EVERY: usize = 5;

/// Clock label for a timeline position: `MM:SS:FF`, where `FF` counts
/// 20ms frames within the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDisplay {
    pub minutes: u64,
    pub seconds: u64,
    pub frames: u64,
}

impl TimeDisplay {
    pub fn new(time: Millis) -> Self {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        Self {
            minutes: (time / 60_000.0).floor() as u64,
            seconds: (time / 1000.0).floor() as u64 % 60,
            frames: ((time % 1000.0) / 20.0).round() as u64,
        }
    }
}

impl From<Millis> for TimeDisplay {
    fn from(time: Millis) -> Self {
        Self::new(time)
    }
}

impl std::fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.frames)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RulerMarkKind {
    Origin,
    Major { label: String },
    Minor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulerMark {
    /// Left edge as a percentage of the timeline width.
    pub position: f64,
    pub kind: RulerMarkKind,
}

/// Thirty equal divisions; the origin reads `0s` and every fifth division
/// carries a seconds label.
pub fn ruler_marks(timeline_duration: Millis) -> Vec<RulerMark> {
    let seconds = timeline_duration / 1000.0;

    (0..RULER_DIVISIONS)
        .map(|i| {
            let kind = if i == 0 {
                RulerMarkKind::Origin
            } else if i % RULER_LABEL_EVERY == 0 {
                RulerMarkKind::Major {
                    label: format!("{:.0}s", i as f64 * (seconds / RULER_DIVISIONS as f64)),
                }
            } else {
                RulerMarkKind::Minor
            };
            RulerMark {
                position: i as f64 * 100.0 / RULER_DIVISIONS as f64,
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_display() {
        assert_eq!(TimeDisplay::new(0.0).to_string(), "00:00:00");
        assert_eq!(TimeDisplay::new(1500.0).to_string(), "00:01:25");
        assert_eq!(TimeDisplay::new(61_040.0).to_string(), "01:01:02");
        assert_eq!(TimeDisplay::new(30_000.0).to_string(), "00:30:00");
    }

    #[test]
    fn test_time_display_clamps_garbage() {
        assert_eq!(TimeDisplay::new(-5.0), TimeDisplay::new(0.0));
        assert_eq!(TimeDisplay::from(f64::NAN).to_string(), "00:00:00");
    }

    #[test]
    fn test_ruler_marks() {
        let marks = ruler_marks(60_000.0);
        assert_eq!(marks.len(), 30);
        assert_eq!(marks[0].kind, RulerMarkKind::Origin);
        assert_eq!(marks[1].kind, RulerMarkKind::Minor);
        assert_eq!(marks[5].kind, RulerMarkKind::Major { label: "10s".to_string() });
        assert_eq!(marks[25].kind, RulerMarkKind::Major { label: "50s".to_string() });
        assert_eq!(marks[15].position, 50.0);

        let majors = marks
            .iter()
            .filter(|m| matches!(m.kind, RulerMarkKind::Major { .. }))
            .count();
        assert_eq!(majors, 5);
    }
}
