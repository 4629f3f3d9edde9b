use super::renderer::LineString;

/// Spacing between graticule lines, degrees
const STEP: f64 = 10.0;
/// Sampling interval along each line, degrees
const PRECISION: f64 = 2.5;
/// Extent of minor meridians and of the parallels
const MINOR_EXTENT: f64 = 80.0;
/// Extent of the major meridians (every 90°)
const MAJOR_EXTENT: f64 = 90.0;

/// Graticule lines with the same layout as d3's default `geoGraticule`:
/// meridians every 10° reaching ±80° (±90° for multiples of 90°) and
/// parallels every 10° between ±80°.
pub fn graticule() -> Vec<LineString> {
    let mut lines = Vec::new();

    let meridian_count = (360.0 / STEP) as i32;
    for i in 0..=meridian_count {
        let lon = -180.0 + i as f64 * STEP;
        let extent = if lon % 90.0 == 0.0 { MAJOR_EXTENT } else { MINOR_EXTENT };
        lines.push(sample(-extent, extent).map(|lat| (lon, lat)).collect());
    }

    let parallel_count = (2.0 * MINOR_EXTENT / STEP) as i32;
    for i in 0..=parallel_count {
        let lat = -MINOR_EXTENT + i as f64 * STEP;
        lines.push(sample(-180.0, 180.0).map(|lon| (lon, lat)).collect());
    }

    lines
}

/// Evenly spaced samples from `from` to `to` inclusive
fn sample(from: f64, to: f64) -> impl Iterator<Item = f64> {
    let steps = ((to - from) / PRECISION).ceil() as usize;
    (0..=steps).map(move |i| (from + i as f64 * PRECISION).min(to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counts() {
        let lines = graticule();
        // 37 meridians (-180..=180) + 17 parallels (-80..=80)
        assert_eq!(lines.len(), 37 + 17);
    }

    #[test]
    fn test_major_meridians_reach_poles() {
        let lines = graticule();
        let prime = lines.iter().find(|l| l[0].0 == 0.0).unwrap();
        assert_eq!(prime.first().unwrap().1, -90.0);
        assert_eq!(prime.last().unwrap().1, 90.0);

        let minor = lines.iter().find(|l| l[0].0 == 10.0).unwrap();
        assert_eq!(minor.first().unwrap().1, -80.0);
        assert_eq!(minor.last().unwrap().1, 80.0);
    }

    #[test]
    fn test_parallels_span_the_globe() {
        let lines = graticule();
        let equator = lines
            .iter()
            .find(|l| l.iter().all(|&(_, lat)| lat == 0.0))
            .unwrap();
        assert_eq!(equator.first().unwrap().0, -180.0);
        assert_eq!(equator.last().unwrap().0, 180.0);
    }
}
