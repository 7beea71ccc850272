//! Human-readable formatting for amounts, distances and durations

/// US dollar formatting, rounded half away from zero to cents.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{remainder:02}")
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}min");
    }
    format!("{}h {}min", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::calculate_fare;

    #[test]
    fn reference_fare_displays_as_dollars() {
        assert_eq!(format_currency(calculate_fare(5000.0, 900.0, 0.15)), "$14.09");
    }

    #[test]
    fn currency_groups_thousands_and_signs_negatives() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-2.5), "-$2.50");
        assert_eq!(format_currency(999.995), "$1,000.00");
    }

    #[test]
    fn distance_switches_to_km() {
        assert_eq!(format_distance(640.4), "640m");
        assert_eq!(format_distance(5000.0), "5.0km");
        assert_eq!(format_distance(12_345.0), "12.3km");
    }

    #[test]
    fn duration_switches_to_hours() {
        assert_eq!(format_duration(900), "15min");
        assert_eq!(format_duration(3600), "1h 0min");
        assert_eq!(format_duration(5430), "1h 30min");
    }
}
