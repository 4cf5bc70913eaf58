use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Converts ordinate values into text.
pub trait CoordinateFormatter {
    /// Writes a finite ordinate value into the output.
    fn write_ordinate(&self, out: &mut dyn Write, value: f64) -> std::fmt::Result;
}

/// Writes ordinates as decimal numbers without exponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalCoordinateFormatter {
    decimal_places: Option<usize>,
}

impl DecimalCoordinateFormatter {
    /// Shortest representation that is parsed back into the same value. Integers are written without the
    /// fractional part.
    pub fn shortest() -> Self {
        Self {
            decimal_places: None,
        }
    }

    /// Fixed number of digits after the decimal point.
    pub fn with_decimal_places(decimal_places: usize) -> Self {
        Self {
            decimal_places: Some(decimal_places),
        }
    }
}

impl CoordinateFormatter for DecimalCoordinateFormatter {
    fn write_ordinate(&self, out: &mut dyn Write, value: f64) -> std::fmt::Result {
        match self.decimal_places {
            Some(places) => write!(out, "{value:.places$}"),
            None => write!(out, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(formatter: DecimalCoordinateFormatter, value: f64) -> String {
        let mut out = String::new();
        formatter
            .write_ordinate(&mut out, value)
            .expect("write to string");
        out
    }

    #[test]
    fn shortest() {
        let formatter = DecimalCoordinateFormatter::shortest();
        assert_eq!(format(formatter, 1.0), "1");
        assert_eq!(format(formatter, -0.5), "-0.5");
        assert_eq!(format(formatter, 220268.439465645), "220268.439465645");
        assert_eq!(format(formatter, 0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn decimal_places() {
        let formatter = DecimalCoordinateFormatter::with_decimal_places(3);
        assert_eq!(format(formatter, 1.0), "1.000");
        assert_eq!(format(formatter, 2.34567), "2.346");
    }
}
