//! Attribute validators

use serde_json::{Map, Value};
use std::net::IpAddr;

/// Validation attached to an [`Attribute`](super::Attribute).
#[derive(Debug, Clone)]
pub enum Validation {
    IntBetween(i64, i64),
    IntInSlice(&'static [i64]),
    StringInSlice(&'static [&'static str]),
    StringNotEmpty,
    StringLenBetween(usize, usize),
    /// A JSON document.
    Json,
    /// An IPv4 or IPv6 CIDR block.
    Cidr,
    /// A single address or a CIDR block.
    IpOrCidr,
    String(fn(&str) -> Result<(), String>),
    Int(fn(i64) -> Result<(), String>),
    Map(fn(&Map<String, Value>) -> Result<(), String>),
}

impl Validation {
    /// Check `value`; type mismatches are reported by the schema, not here.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::IntBetween(min, max), Value::Number(n)) => {
                let v = n.as_i64().unwrap_or(i64::MIN);
                if v < *min || v > *max {
                    return Err(format!("expected an integer between {} and {}, got {}", min, max, n));
                }
                Ok(())
            },
            (Self::IntInSlice(allowed), Value::Number(n)) => {
                let v = n.as_i64().unwrap_or(i64::MIN);
                if !allowed.contains(&v) {
                    return Err(format!("expected one of {:?}, got {}", allowed, n));
                }
                Ok(())
            },
            (Self::Int(f), Value::Number(n)) => f(n.as_i64().unwrap_or(i64::MIN)),
            (Self::StringInSlice(allowed), Value::String(s)) => {
                if !allowed.contains(&s.as_str()) {
                    return Err(format!("expected one of {:?}, got {:?}", allowed, s));
                }
                Ok(())
            },
            (Self::StringNotEmpty, Value::String(s)) => {
                if s.trim().is_empty() {
                    return Err("must not be empty".to_string());
                }
                Ok(())
            },
            (Self::StringLenBetween(min, max), Value::String(s)) => {
                let len = s.chars().count();
                if len < *min || len > *max {
                    return Err(format!(
                        "expected length between {} and {}, got {}",
                        min, max, len
                    ));
                }
                Ok(())
            },
            (Self::Json, Value::String(s)) => validate_json(s),
            (Self::Cidr, Value::String(s)) => validate_cidr(s),
            (Self::IpOrCidr, Value::String(s)) => {
                if s.contains('/') {
                    validate_cidr(s)
                } else {
                    s.parse::<IpAddr>()
                        .map(|_| ())
                        .map_err(|_| format!("{:?} is not a valid IP address or CIDR block", s))
                }
            },
            (Self::String(f), Value::String(s)) => f(s),
            (Self::Map(f), Value::Object(map)) => f(map),
            _ => Ok(()),
        }
    }
}

/// Accepts any syntactically valid JSON document.
pub fn validate_json(s: &str) -> Result<(), String> {
    serde_json::from_str::<Value>(s)
        .map(|_| ())
        .map_err(|e| format!("invalid JSON: {}", e))
}

/// Accepts `a.b.c.d/n` (n <= 32) and IPv6 `addr/n` (n <= 128).
pub fn validate_cidr(s: &str) -> Result<(), String> {
    let invalid = || format!("{:?} is not a valid CIDR block", s);

    let (addr, prefix) = s.split_once('/').ok_or_else(invalid)?;
    let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_between() {
        let v = Validation::IntBetween(3, 16);
        assert!(v.check(&json!(3)).is_ok());
        assert!(v.check(&json!(16)).is_ok());
        assert!(v.check(&json!(2)).is_err());
        assert!(v.check(&json!(17)).is_err());
    }

    #[test]
    fn test_string_in_slice_is_case_sensitive() {
        let v = Validation::StringInSlice(&["av20", "av36"]);
        assert!(v.check(&json!("av36")).is_ok());
        assert!(v.check(&json!("AV36")).is_err());
    }

    #[test]
    fn test_cidr() {
        assert!(validate_cidr("192.168.48.0/22").is_ok());
        assert!(validate_cidr("fd00::/8").is_ok());
        assert!(validate_cidr("192.168.48.0/33").is_err());
        assert!(validate_cidr("192.168.48.0").is_err());
        assert!(validate_cidr("foo/22").is_err());
    }

    #[test]
    fn test_ip_or_cidr() {
        let v = Validation::IpOrCidr;
        assert!(v.check(&json!("10.0.0.1")).is_ok());
        assert!(v.check(&json!("10.0.0.0/24")).is_ok());
        assert!(v.check(&json!("10.0.0")).is_err());
    }

    #[test]
    fn test_json() {
        assert!(Validation::Json.check(&json!("{\"lenses\": {}}")).is_ok());
        assert!(Validation::Json.check(&json!("{lenses")).is_err());
    }

    #[test]
    fn test_custom_function() {
        fn lowercase(s: &str) -> Result<(), String> {
            if s.chars().all(|c| c.is_ascii_lowercase()) {
                Ok(())
            } else {
                Err("lowercase only".to_string())
            }
        }
        let v = Validation::String(lowercase);
        assert!(v.check(&json!("abc")).is_ok());
        assert_eq!(v.check(&json!("aBc")), Err("lowercase only".to_string()));
    }
}
