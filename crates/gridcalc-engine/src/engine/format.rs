/// Format a number for display.
///
/// Integral values print without a fractional part; everything else uses
/// the shortest text that round-trips.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Format a number as a float literal the arithmetic evaluator accepts.
///
/// Always has a decimal point and never an exponent. Negative values are
/// parenthesized so they can follow a binary operator.
pub fn float_literal(n: f64) -> String {
    let mut s = n.abs().to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    if n.is_sign_negative() && n != 0.0 {
        format!("(-{})", s)
    } else {
        s
    }
}
