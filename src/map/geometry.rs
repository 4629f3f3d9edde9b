use crate::braille::Plot;

/// Draw a line using Bresenham's algorithm
pub fn draw_line<P: Plot>(canvas: &mut P, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.plot(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Fill a circle centred on a sub-pixel position
pub fn fill_circle<P: Plot>(canvas: &mut P, cx: f64, cy: f64, radius: f64) {
    if !(radius.is_finite() && radius > 0.0) {
        return;
    }
    let r2 = radius * radius;
    let (min_y, max_y) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
    let (min_x, max_x) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
    for y in min_y..=max_y {
        let dy = y as f64 + 0.5 - cy;
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - cx;
            if dx * dx + dy * dy <= r2 {
                canvas.plot(x, y);
            }
        }
    }
    // Keep tiny glyphs visible
    canvas.plot(cx.floor() as i32, cy.floor() as i32);
}

/// Fill an axis-aligned square of half-side `half` with rounded corners
pub fn fill_rounded_square<P: Plot>(canvas: &mut P, cx: f64, cy: f64, half: f64, corner: f64) {
    if !(half.is_finite() && half > 0.0) {
        return;
    }
    let corner = corner.clamp(0.0, half);
    let inner = half - corner;
    let (min_y, max_y) = ((cy - half).floor() as i32, (cy + half).ceil() as i32);
    let (min_x, max_x) = ((cx - half).floor() as i32, (cx + half).ceil() as i32);
    for y in min_y..=max_y {
        let dy = (y as f64 + 0.5 - cy).abs();
        for x in min_x..=max_x {
            let dx = (x as f64 + 0.5 - cx).abs();
            if rounded_square_contains(dx, dy, half, inner, corner) {
                canvas.plot(x, y);
            }
        }
    }
    canvas.plot(cx.floor() as i32, cy.floor() as i32);
}

/// Containment test for a rounded square, in absolute offsets from its centre
#[inline]
pub fn rounded_square_contains(dx: f64, dy: f64, half: f64, inner: f64, corner: f64) -> bool {
    if dx > half || dy > half {
        return false;
    }
    if dx <= inner || dy <= inner {
        return true;
    }
    let (ex, ey) = (dx - inner, dy - inner);
    ex * ex + ey * ey <= corner * corner
}

/// Fill the triangle `(0,-t) (t,t) (-t,t)` translated to `(cx, cy)`
pub fn fill_triangle<P: Plot>(canvas: &mut P, cx: f64, cy: f64, t: f64) {
    if !(t.is_finite() && t > 0.0) {
        return;
    }
    let (min_y, max_y) = ((cy - t).floor() as i32, (cy + t).ceil() as i32);
    let (min_x, max_x) = ((cx - t).floor() as i32, (cx + t).ceil() as i32);
    for y in min_y..=max_y {
        let dy = y as f64 + 0.5 - cy;
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - cx;
            if triangle_contains(dx, dy, t) {
                canvas.plot(x, y);
            }
        }
    }
    canvas.plot(cx.floor() as i32, cy.floor() as i32);
}

/// Containment test for the upward triangle with apex `(0,-t)` and base at `y = t`
#[inline]
pub fn triangle_contains(dx: f64, dy: f64, t: f64) -> bool {
    if dy < -t || dy > t {
        return false;
    }
    // Half-width grows linearly from 0 at the apex to t at the base
    let half_width = (dy + t) / 2.0;
    dx.abs() <= half_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braille::BrailleCanvas;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        // Top dots of every cell are lit
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let mut canvas = BrailleCanvas::new(10, 5);
        fill_circle(&mut canvas, 10.0, 10.0, 4.0);
        assert_ne!(canvas.cell_bits(5, 2), 0);
        // Nothing drawn far outside the radius
        assert_eq!(canvas.cell_bits(0, 0), 0);
        assert_eq!(canvas.cell_bits(9, 4), 0);
    }

    #[test]
    fn test_degenerate_sizes_draw_nothing() {
        let mut canvas = BrailleCanvas::new(4, 4);
        fill_circle(&mut canvas, 2.0, 2.0, f64::NAN);
        fill_rounded_square(&mut canvas, 2.0, 2.0, 0.0, 6.0);
        fill_triangle(&mut canvas, 2.0, 2.0, -1.0);
        assert!(canvas.rows().all(|row| row.chars().all(|c| c == '\u{2800}')));
    }

    #[test]
    fn test_triangle_containment() {
        assert!(triangle_contains(0.0, -9.9, 10.0));
        assert!(!triangle_contains(5.0, -9.0, 10.0));
        assert!(triangle_contains(9.9, 9.9, 10.0));
        assert!(!triangle_contains(0.0, 10.5, 10.0));
    }

    #[test]
    fn test_rounded_square_corners() {
        // Centre and edges are inside, the extreme corner is cut off
        assert!(rounded_square_contains(0.0, 0.0, 10.0, 4.0, 6.0));
        assert!(rounded_square_contains(10.0, 0.0, 10.0, 4.0, 6.0));
        assert!(!rounded_square_contains(10.0, 10.0, 10.0, 4.0, 6.0));
    }
}
