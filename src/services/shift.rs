// src/services/shift.rs

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike, Utc, Weekday};
use serde::Serialize;

/// Turno de trabalho gravado no corte de caja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i16)]
pub enum Shift {
    Day = 1,
    Night = 2,
}

impl Shift {
    pub fn code(self) -> i16 {
        self as i16
    }
}

/// Classifica um horário local da loja.
///
/// Segunda a quinta: 08:00–15:59 dia, 16:00–21:00 noite.
/// Sexta e sábado: sempre dia.
/// Domingo: 08:00–14:59 noite, 15:00–21:00 dia.
/// Fora das faixas cai no turno de dia.
pub fn classify(local: NaiveDateTime) -> Shift {
    let minutes = local.hour() * 60 + local.minute();

    match local.weekday() {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => match minutes {
            480..=959 => Shift::Day,
            960..=1260 => Shift::Night,
            _ => Shift::Day,
        },
        Weekday::Fri | Weekday::Sat => Shift::Day,
        Weekday::Sun => match minutes {
            480..=899 => Shift::Night,
            900..=1260 => Shift::Day,
            _ => Shift::Day,
        },
    }
}

pub fn classify_at(now: DateTime<Utc>, offset: FixedOffset) -> Shift {
    classify(now.with_timezone(&offset).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BOUNDARIES: [u32; 11] = [479, 480, 899, 900, 959, 960, 1199, 1200, 1259, 1260, 1261];

    fn at(date: NaiveDate, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(minute / 60, minute % 60, 0).unwrap()
    }

    // 2025-03-03 é segunda-feira
    fn day_of_week(offset_from_monday: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap() + chrono::Days::new(offset_from_monday)
    }

    #[test]
    fn weekday_boundaries() {
        let expected = [
            Shift::Day,   // 479 fora da faixa
            Shift::Day,   // 480
            Shift::Day,   // 899
            Shift::Day,   // 900
            Shift::Day,   // 959
            Shift::Night, // 960
            Shift::Night, // 1199
            Shift::Night, // 1200
            Shift::Night, // 1259
            Shift::Night, // 1260
            Shift::Day,   // 1261 fora da faixa
        ];
        for d in 0..4 {
            let date = day_of_week(d);
            for (minute, shift) in BOUNDARIES.iter().zip(expected) {
                assert_eq!(classify(at(date, *minute)), shift, "{} minuto {}", date, minute);
            }
        }
    }

    #[test]
    fn friday_and_saturday_are_always_day() {
        for d in [4, 5] {
            let date = day_of_week(d);
            for minute in BOUNDARIES.iter().chain([0, 1439].iter()) {
                assert_eq!(classify(at(date, *minute)), Shift::Day);
            }
        }
    }

    #[test]
    fn sunday_boundaries() {
        let sunday = day_of_week(6);
        assert_eq!(sunday.weekday(), Weekday::Sun);

        let expected = [
            Shift::Day,   // 479
            Shift::Night, // 480
            Shift::Night, // 899
            Shift::Day,   // 900
            Shift::Day,   // 959
            Shift::Day,   // 960
            Shift::Day,   // 1199
            Shift::Day,   // 1200
            Shift::Day,   // 1259
            Shift::Day,   // 1260
            Shift::Day,   // 1261
        ];
        for (minute, shift) in BOUNDARIES.iter().zip(expected) {
            assert_eq!(classify(at(sunday, *minute)), shift, "minuto {}", minute);
        }
    }

    #[test]
    fn every_minute_maps_to_one_or_two_deterministically() {
        for d in 0..7 {
            let date = day_of_week(d);
            for minute in 0..1440 {
                let first = classify(at(date, minute));
                assert_eq!(first, classify(at(date, minute)));
                assert!(matches!(first.code(), 1 | 2));
            }
        }
    }

    #[test]
    fn uses_business_offset() {
        // 2025-03-03 23:00 UTC = 17:00 em Honduras (segunda) -> noite
        let utc = NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap()
            .and_utc();
        let honduras = FixedOffset::west_opt(6 * 3600).unwrap();
        assert_eq!(classify_at(utc, honduras), Shift::Night);
        assert_eq!(classify_at(utc, FixedOffset::east_opt(0).unwrap()), Shift::Day);
    }
}
