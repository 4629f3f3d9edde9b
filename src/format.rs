/// Shortest round-trip rendering: `70` not `70.0`, `12.3` stays `12.3`
pub fn number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        // Drop the sign of negative zero
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// One decimal place, rounding exact ties away from zero (`5.25` -> `5.3`).
/// Values whose binary form only approximates a tie round by their exact
/// value (`1.45` is slightly below 1.45 and gives `1.4`).
pub fn fixed1(value: f64) -> String {
    if !value.is_finite() {
        return number(value);
    }
    let scaled = value * 10.0;
    let exact = value.mul_add(10.0, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        let away = scaled.trunc() + scaled.signum();
        return format!("{:.1}", away / 10.0);
    }
    format!("{:.1}", value)
}
