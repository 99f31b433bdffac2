use once_cell::sync::Lazy;
use regex::Regex;

static CONFIG_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_.-]{1,100}$").expect("Invalid config key regex"));

static PINCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("Invalid pincode regex"));

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("Invalid time regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 -]{6,20}$").expect("Invalid phone regex"));

/// 名称类字段：去除首尾空白后 1-100 个字符
pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(format!("{field} is required"));
    }
    if len > 100 {
        return Err(format!("{field} must be at most 100 characters"));
    }
    Ok(())
}

/// 可选的短文本字段
pub fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(format!("{field} must be at most {max} characters"))
        }
        _ => Ok(()),
    }
}

pub fn validate_config_key(key: &str) -> Result<(), &'static str> {
    if !CONFIG_KEY_RE.is_match(key) {
        return Err(
            "Configuration key must be 1-100 characters of lowercase letters, digits, '.', '_' or '-'",
        );
    }
    Ok(())
}

pub fn validate_pincode(pincode: &str) -> Result<(), &'static str> {
    if !PINCODE_RE.is_match(pincode) {
        return Err("Pincode must be exactly 6 digits");
    }
    Ok(())
}

pub fn validate_time_of_day(time: &str) -> Result<(), &'static str> {
    if !TIME_RE.is_match(time) {
        return Err("Time must be in HH:MM format");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} must be zero or greater"));
    }
    Ok(())
}

pub fn validate_positive(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{field} must be greater than zero"));
    }
    Ok(())
}

/// 空白字符串视为未填写
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert!(validate_name("Class name", "Grade 1").is_ok());
        assert!(validate_name("Class name", "   ").is_err());
        assert!(validate_name("Class name", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_config_key() {
        assert!(validate_config_key("session.start_month").is_ok());
        assert!(validate_config_key("grade.formula.defaults").is_ok());
        assert!(validate_config_key("Session.Start").is_err());
        assert!(validate_config_key("").is_err());
        assert!(validate_config_key("with space").is_err());
        assert!(validate_config_key(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_pincode() {
        assert!(validate_pincode("560001").is_ok());
        assert!(validate_pincode("56000").is_err());
        assert!(validate_pincode("56000a").is_err());
    }

    #[test]
    fn test_time_of_day() {
        assert!(validate_time_of_day("07:30").is_ok());
        assert!(validate_time_of_day("23:59").is_ok());
        assert!(validate_time_of_day("24:00").is_err());
        assert!(validate_time_of_day("7:30").is_err());
    }

    #[test]
    fn test_numbers() {
        assert!(validate_non_negative("Capacity", 0.0).is_ok());
        assert!(validate_non_negative("Capacity", -1.0).is_err());
        assert!(validate_positive("Amount", 0.0).is_err());
        assert!(validate_positive("Amount", f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" ab ".into())), Some("ab".into()));
        assert_eq!(normalize_optional(None), None);
    }
}
