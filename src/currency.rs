//! Naira display formatting: `₦` plus thousand-grouped whole units, no
//! fractional digits (the en-NG rendering the storefront uses everywhere).

pub fn format_naira(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-₦{grouped}")
    } else {
        format!("₦{grouped}")
    }
}
