use std::time::{Duration, Instant};

/// Cubic ease-in-out, the default easing for d3 transitions
#[inline]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// A scalar animated from one value to another over a fixed duration.
///
/// A tween is driven by [`Tween::advance`]; retargeting mid-flight starts a
/// new segment from the current value, so a superseded animation never
/// jumps.
#[derive(Clone, Debug)]
pub struct Tween {
    from: f64,
    to: f64,
    value: f64,
    start: Option<Instant>,
    duration: Duration,
}

impl Tween {
    /// A tween resting at `value`
    pub fn still(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            value,
            start: None,
            duration: Duration::ZERO,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    /// Animate from the current value towards `to`
    pub fn retarget(&mut self, to: f64, now: Instant, duration: Duration) {
        self.from = self.value;
        self.to = to;
        if duration.is_zero() {
            self.value = to;
            self.start = None;
        } else {
            self.start = Some(now);
            self.duration = duration;
        }
    }

    /// Step the animation to `now`. Returns true on the step that finishes it.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(start) = self.start else {
            return false;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.duration {
            self.value = self.to;
            self.start = None;
            return true;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.value = self.from + (self.to - self.from) * ease_cubic_in_out(t);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_tween_runs_to_completion() {
        let t0 = Instant::now();
        let mut tween = Tween::still(1.0);
        tween.retarget(0.08, t0, MS_300);
        assert!(tween.is_running());
        assert_eq!(tween.value(), 1.0);

        assert!(!tween.advance(t0 + Duration::from_millis(150)));
        assert!((tween.value() - 0.54).abs() < 1e-9);

        assert!(tween.advance(t0 + MS_300));
        assert_eq!(tween.value(), 0.08);
        assert!(!tween.is_running());
        // Completion fires once
        assert!(!tween.advance(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_retarget_mid_flight_starts_from_current() {
        let t0 = Instant::now();
        let mut tween = Tween::still(1.0);
        tween.retarget(0.0, t0, MS_300);
        tween.advance(t0 + Duration::from_millis(150));
        let midway = tween.value();

        let t1 = t0 + Duration::from_millis(150);
        tween.retarget(1.0, t1, MS_300);
        assert_eq!(tween.value(), midway);
        assert!(!tween.advance(t1 + Duration::from_millis(100)));
        assert!(tween.advance(t1 + MS_300));
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut tween = Tween::still(1.0);
        tween.retarget(1.45, Instant::now(), Duration::ZERO);
        assert_eq!(tween.value(), 1.45);
        assert!(!tween.is_running());
    }
}
