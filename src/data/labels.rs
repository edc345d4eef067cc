/// Display label for a payment type code. Unknown codes pass through.
pub fn payment_label(code: &str) -> &str {
    match code {
        "boleto" => "Boleto",
        "credit_card" => "Crédito",
        "debit_card" => "Débito",
        "voucher" => "Voucher",
        other => other,
    }
}

pub fn review_label(score: u8) -> String {
    format!("Score {score}")
}

/// Integer with `,` thousands separators.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
