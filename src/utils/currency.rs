//! Formato de moneda (R$) y redondeo

/// Redondear a centavos
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Redondear a una casa decimal
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Formatear un valor en reales: 84990.5 -> "R$ 84.990,50"
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{:02}", if negative { "-" } else { "" }, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(84990.0), "R$ 84.990,00");
        assert_eq!(format_brl(1512.444), "R$ 1.512,44");
        assert_eq!(format_brl(999.5), "R$ 999,50");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(-50.0), "-R$ 50,00");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(433.3333), 433.33);
        assert_eq!(round1(83.3333), 83.3);
    }
}
