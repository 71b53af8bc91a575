// src/services/amount_words.rs

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

const UNITS: [&str; 20] = [
    "CERO", "UNO", "DOS", "TRES", "CUATRO", "CINCO", "SEIS", "SIETE", "OCHO", "NUEVE", "DIEZ",
    "ONCE", "DOCE", "TRECE", "CATORCE", "QUINCE", "DIECISÉIS", "DIECISIETE", "DIECIOCHO",
    "DIECINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "VEINTE", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA",
    "NOVENTA",
];

// Só cobre 0..=199; o resto sai como número
fn integer_words(n: u64) -> String {
    match n {
        0..=19 => UNITS[n as usize].to_string(),
        20..=99 => {
            let (tens, ones) = (n / 10, n % 10);
            if ones == 0 {
                TENS[tens as usize].to_string()
            } else {
                format!("{} Y {}", TENS[tens as usize], UNITS[ones as usize])
            }
        }
        100 => "CIEN".to_string(),
        101..=199 => format!("CIENTO {}", integer_words(n - 100)),
        _ => n.to_string(),
    }
}

/// Valor por extenso para a fatura: "CIENTO VEINTE Y CINCO LEMPIRAS CON 50/100".
///
/// Zero sai como "CERO LEMPIRAS CON 00/100", nunca com a parte inteira vazia:
/// a fatura de valor zero (venda 100% isenta ou com desconto total) precisa
/// do valor por extenso legível.
pub fn amount_in_words(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let integer = rounded.trunc();
    let cents = ((rounded - integer) * Decimal::ONE_HUNDRED)
        .to_u64()
        .unwrap_or(0);

    let words = match integer.to_u64() {
        Some(n) if amount.is_sign_negative() && !amount.is_zero() => format!("-{}", n),
        Some(n) => integer_words(n),
        None => integer.to_string(),
    };

    format!("{} LEMPIRAS CON {:02}/100", words, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn words(raw: &str) -> String {
        amount_in_words(Decimal::from_str(raw).unwrap())
    }

    #[test]
    fn literal_cases() {
        assert_eq!(words("125.5"), "CIENTO VEINTE Y CINCO LEMPIRAS CON 50/100");
        assert_eq!(words("19"), "DIECINUEVE LEMPIRAS CON 00/100");
        assert_eq!(words("250"), "250 LEMPIRAS CON 00/100");
    }

    #[test]
    fn irregular_and_round_forms() {
        assert_eq!(words("16"), "DIECISÉIS LEMPIRAS CON 00/100");
        assert_eq!(words("40"), "CUARENTA LEMPIRAS CON 00/100");
        assert_eq!(words("100"), "CIEN LEMPIRAS CON 00/100");
        assert_eq!(words("101"), "CIENTO UNO LEMPIRAS CON 00/100");
        assert_eq!(words("199.99"), "CIENTO NOVENTA Y NUEVE LEMPIRAS CON 99/100");
    }

    #[test]
    fn zero_and_rounding_carry() {
        assert_eq!(words("0"), "CERO LEMPIRAS CON 00/100");
        assert_eq!(words("0.07"), "CERO LEMPIRAS CON 07/100");
        assert_eq!(words("99.999"), "CIEN LEMPIRAS CON 00/100");
        assert_eq!(words("10.005"), "DIEZ LEMPIRAS CON 01/100");
    }

    #[test]
    fn negatives_fall_back_to_number() {
        assert_eq!(words("-5.5"), "-5 LEMPIRAS CON 50/100");
    }
}
