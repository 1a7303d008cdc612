//! Rupee Formatting

/// Currency symbol used for every displayed amount
pub const RUPEE: &str = "₹";

/// Format an amount as whole rupees with comma thousands separators,
/// e.g. `₹1,234,567`.
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    // Saturating float-to-int cast; amounts are far below i64::MAX
    let digits = (rounded.abs() as u64).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("{RUPEE}-{grouped}")
    } else {
        format!("{RUPEE}{grouped}")
    }
}
