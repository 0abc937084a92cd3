// Innings-pitched notation conversion.
//
// Baseball displays partial innings as .1/.2 (outs recorded past the last
// complete inning), which is not decimal: 6.1 innings means 6 1/3. All
// pipeline arithmetic runs on an internal decimal-thirds representation;
// conversion happens exactly twice, at aggregation input and at final
// formatting, never mid-pipeline.

/// Tolerance for recognizing a fractional part as one third or two thirds
/// after floating-point arithmetic.
const THIRD_TOLERANCE: f64 = 0.01;

/// A fractional part at or above this value that is not a recognizable third
/// is an invalid state (floating rounding artifacts like .29999) and carries
/// into the integer part.
const CARRY_THRESHOLD: f64 = 0.29;

/// Convert innings pitched from baseball display notation to the internal
/// decimal-thirds representation: a `.1`/`.2` remainder becomes one/two
/// thirds; any other remainder is already decimal and passes through.
pub fn to_internal(ip: f64) -> f64 {
    if !ip.is_finite() {
        return ip;
    }
    let whole = ip.trunc();
    let frac = ip - whole;
    if (frac - 0.1).abs() < 1e-6 {
        whole + 1.0 / 3.0
    } else if (frac - 0.2).abs() < 1e-6 {
        whole + 2.0 / 3.0
    } else {
        ip
    }
}

/// Convert internal decimal-thirds innings back to display notation.
///
/// A remainder within tolerance of one/two thirds maps to `.1`/`.2`. A
/// remainder at or above [`CARRY_THRESHOLD`] that is not a recognizable
/// third rounds up, carrying 1 into the integer part and zeroing the
/// remainder; anything below the threshold is retained as computed.
pub fn to_display(ip: f64) -> f64 {
    if !ip.is_finite() {
        return ip;
    }
    let whole = ip.trunc();
    let frac = ip - whole;
    if (frac - 1.0 / 3.0).abs() < THIRD_TOLERANCE {
        whole + 0.1
    } else if (frac - 2.0 / 3.0).abs() < THIRD_TOLERANCE {
        whole + 0.2
    } else if frac >= CARRY_THRESHOLD {
        whole + 1.0
    } else {
        ip
    }
}

/// Render an internal innings value for publication. Whole innings and the
/// `.1`/`.2` notation print with one decimal; a retained non-third remainder
/// keeps two decimals so it is not mistaken for notation.
pub fn format_ip(internal: f64) -> String {
    let shown = to_display(internal);
    if !shown.is_finite() {
        return String::new();
    }
    let frac = shown - shown.trunc();
    let is_notation = frac.abs() < 1e-9
        || (frac - 0.1).abs() < 1e-9
        || (frac - 0.2).abs() < 1e-9;
    if is_notation {
        format!("{shown:.1}")
    } else {
        format!("{shown:.2}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
