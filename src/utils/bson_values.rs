//! Lenient readers for loosely typed BSON fields.

use chrono::{DateTime, Utc};
use mongodb::bson::Bson;

/// Read any BSON number as `f64`.
pub fn bson_to_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

/// Read any BSON number as `i64`, truncating doubles.
pub fn bson_to_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.is_finite() => Some(v.trunc() as i64),
        _ => None,
    }
}

/// Read a BSON date, or a string holding one, as a UTC timestamp.
pub fn bson_to_datetime(value: &Bson) -> Option<DateTime<Utc>> {
    match value {
        Bson::DateTime(dt) => DateTime::from_timestamp_millis(dt.timestamp_millis()),
        Bson::String(text) => crate::utils::dates::parse_instant(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(bson_to_f64(&Bson::Int32(3)), Some(3.0));
        assert_eq!(bson_to_f64(&Bson::Int64(4)), Some(4.0));
        assert_eq!(bson_to_f64(&Bson::Double(1.5)), Some(1.5));
        assert_eq!(bson_to_f64(&Bson::String("1".into())), None);

        assert_eq!(bson_to_i64(&Bson::Double(2.9)), Some(2));
        assert_eq!(bson_to_i64(&Bson::Double(f64::NAN)), None);
        assert_eq!(bson_to_i64(&Bson::Boolean(true)), None);
    }

    #[test]
    fn test_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let native = Bson::DateTime(mongodb::bson::DateTime::from_millis(
            expected.timestamp_millis(),
        ));

        assert_eq!(bson_to_datetime(&native), Some(expected));
        assert_eq!(
            bson_to_datetime(&Bson::String("2024-01-10T00:00:00.000Z".into())),
            Some(expected)
        );
        assert_eq!(bson_to_datetime(&Bson::Int32(0)), None);
    }
}
