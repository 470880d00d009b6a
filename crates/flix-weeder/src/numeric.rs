//! Bounds-checked parsing of sized numeric literals.

use flix_base::Span;
use flix_ir::{FloatWidth, IntWidth};

use crate::error::WeederError;

pub fn parse_int(text: &str, width: IntWidth, span: Span) -> Result<i64, WeederError> {
    let parsed: i128 = text
        .parse()
        .map_err(|_| WeederError::IllegalInt { text: text.to_string(), span })?;
    let (min, max): (i128, i128) = match width {
        IntWidth::W8 => (i8::MIN as i128, i8::MAX as i128),
        IntWidth::W16 => (i16::MIN as i128, i16::MAX as i128),
        IntWidth::W32 => (i32::MIN as i128, i32::MAX as i128),
        IntWidth::W64 => (i64::MIN as i128, i64::MAX as i128),
    };
    if parsed < min || parsed > max {
        return Err(WeederError::IllegalInt { text: text.to_string(), span });
    }
    Ok(parsed as i64)
}

pub fn parse_float(text: &str, width: FloatWidth, span: Span) -> Result<f64, WeederError> {
    let parsed: f64 = text
        .parse()
        .map_err(|_| WeederError::IllegalFloat { text: text.to_string(), span })?;
    if !parsed.is_finite() {
        return Err(WeederError::IllegalFloat { text: text.to_string(), span });
    }
    if width == FloatWidth::W32 && (parsed as f32) as f64 != parsed && parsed.abs() > f32::MAX as f64 {
        return Err(WeederError::IllegalFloat { text: text.to_string(), span });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int8_out_of_range_is_illegal() {
        let span = Span::new(0, 1);
        assert!(parse_int("200", IntWidth::W8, span).is_err());
        assert!(parse_int("100", IntWidth::W8, span).is_ok());
    }

    #[test]
    fn float64_accepts_ordinary_values() {
        let span = Span::new(0, 1);
        assert_eq!(parse_float("3.5", FloatWidth::W64, span), Ok(3.5));
    }

    #[test]
    fn float_rejects_non_finite() {
        let span = Span::new(0, 1);
        assert!(parse_float("inf", FloatWidth::W64, span).is_err());
    }
}
