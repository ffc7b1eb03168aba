/// Round to two decimal places, halves away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a measurement with `,` as decimal separator, keeping at least one
/// decimal digit: `20.0` -> `20,0`, `1013.24` -> `1013,24`
pub(crate) fn decimal_comma(value: f64) -> String {
    let text = if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    };
    text.replace('.', ",")
}
