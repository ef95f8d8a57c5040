//! Input validation for port numbers and process identifiers.
//!
//! Both validators accept integers directly and coerce numeric strings
//! (`"3000"`, `" 42 "`). Anything else fails with [`Error::Validation`].

use crate::error::{Error, Result};

/// Lowest valid port number.
pub const MIN_PORT: i64 = 1;
/// Highest valid port number.
pub const MAX_PORT: i64 = 65535;

/// A raw numeric value as handed over by a caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

macro_rules! integer_input {
    ($($t:ty),*) => {
        $(impl From<$t> for NumericInput {
            fn from(value: $t) -> Self {
                NumericInput::Integer(i64::from(value))
            }
        })*
    };
}

integer_input!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for NumericInput {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(NumericInput::Float(value as f64), NumericInput::Integer)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Float(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        NumericInput::Text(value)
    }
}

impl From<&String> for NumericInput {
    fn from(value: &String) -> Self {
        NumericInput::Text(value.clone())
    }
}

impl NumericInput {
    /// Resolve to an integer, or describe why that is impossible.
    fn to_integer(&self) -> std::result::Result<i64, String> {
        match self {
            NumericInput::Integer(n) => Ok(*n),
            NumericInput::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Ok(*f as i64)
                } else {
                    Err(format!("{} is not an integer", f))
                }
            }
            NumericInput::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err("value is empty".to_string());
                }
                trimmed
                    .parse::<i64>()
                    .map_err(|_| format!("'{}' is not an integer", trimmed))
            }
        }
    }
}

/// Validate a port number, returning it unchanged when it is in 1..=65535.
pub fn validate_port(value: impl Into<NumericInput>) -> Result<u16> {
    let n = value
        .into()
        .to_integer()
        .map_err(|reason| Error::validation("port", reason))?;

    if !(MIN_PORT..=MAX_PORT).contains(&n) {
        return Err(Error::validation(
            "port",
            format!("{} is out of range ({}-{})", n, MIN_PORT, MAX_PORT),
        ));
    }

    u16::try_from(n).map_err(|_| Error::validation("port", format!("{} is out of range", n)))
}

/// Validate a process identifier, returning it unchanged when positive.
pub fn validate_pid(value: impl Into<NumericInput>) -> Result<u32> {
    let n = value
        .into()
        .to_integer()
        .map_err(|reason| Error::validation("pid", reason))?;

    if n <= 0 {
        return Err(Error::validation(
            "pid",
            format!("{} must be a positive integer", n),
        ));
    }

    u32::try_from(n).map_err(|_| Error::validation("pid", format!("{} is too large", n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_port_accepts_range() {
        assert_eq!(validate_port(1).unwrap(), 1);
        assert_eq!(validate_port(3000).unwrap(), 3000);
        assert_eq!(validate_port(65535).unwrap(), 65535);
        assert_eq!(validate_port(8080u16).unwrap(), 8080);
    }

    #[test]
    fn test_validate_port_every_valid_value_is_identity() {
        for p in MIN_PORT..=MAX_PORT {
            assert_eq!(i64::from(validate_port(p).unwrap()), p);
        }
    }

    #[test]
    fn test_validate_port_rejects_out_of_range() {
        for bad in [0i64, -1, 65536, 100_000, i64::MIN] {
            let err = validate_port(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_validate_port_numeric_strings() {
        assert_eq!(validate_port("3000").unwrap(), 3000);
        assert_eq!(validate_port(" 443 ").unwrap(), 443);
        assert!(validate_port("abc").is_err());
        assert!(validate_port("").is_err());
        assert!(validate_port("30.5").is_err());
        assert!(validate_port("0").is_err());
    }

    #[test]
    fn test_validate_port_floats() {
        assert_eq!(validate_port(3000.0).unwrap(), 3000);
        assert!(validate_port(3000.5).is_err());
        assert!(validate_port(f64::NAN).is_err());
        assert!(validate_port(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_pid() {
        assert_eq!(validate_pid(1).unwrap(), 1);
        assert_eq!(validate_pid(1234u32).unwrap(), 1234);
        assert_eq!(validate_pid("42").unwrap(), 42);
        assert_eq!(validate_pid(i64::from(u32::MAX)).unwrap(), u32::MAX);

        for bad in [0i64, -1, -9999] {
            assert_eq!(validate_pid(bad).unwrap_err().kind(), ErrorKind::Validation);
        }
        assert!(validate_pid("nope").is_err());
        assert!(validate_pid(1.5).is_err());
        assert!(validate_pid(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = validate_pid(-3).unwrap_err();
        assert!(err.to_string().starts_with("Invalid pid"));
        let err = validate_port("x").unwrap_err();
        assert!(err.to_string().starts_with("Invalid port"));
    }
}
