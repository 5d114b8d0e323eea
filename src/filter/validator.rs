use serde::Serialize;

/// 允许的最小滤波器阶数
pub const MIN_ORDER: u32 = 1;
/// 允许的最大滤波器阶数
pub const MAX_ORDER: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    NotANumber,
    OutOfRange,
    NotInteger,
}

impl ValidationError {
    pub fn message(&self) -> String {
        match self {
            ValidationError::NotANumber => "Please enter a valid number".to_string(),
            ValidationError::OutOfRange => format!(
                "Filter order must be between {} and {}",
                MIN_ORDER, MAX_ORDER
            ),
            ValidationError::NotInteger => "Filter order must be a whole number".to_string(),
        }
    }
}

/// 单次校验结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    fn ok(value: u32) -> Self {
        Self {
            valid: true,
            message: "Valid filter order".to_string(),
            value: Some(value),
            error: None,
        }
    }

    fn fail(error: ValidationError) -> Self {
        Self {
            valid: false,
            message: error.message(),
            value: None,
            error: Some(error),
        }
    }
}

/// 按顺序检查：是否为数字、是否在范围内、是否为整数
pub fn validate(raw: &str) -> ValidationResult {
    let trimmed = raw.trim();
    let Some(parsed) = parse_number(trimmed) else {
        return ValidationResult::fail(ValidationError::NotANumber);
    };

    let truncated = parsed.trunc();
    if truncated < MIN_ORDER as f64 || truncated > MAX_ORDER as f64 {
        return ValidationResult::fail(ValidationError::OutOfRange);
    }

    if raw.contains('.') || raw.contains(',') {
        return ValidationResult::fail(ValidationError::NotInteger);
    }

    ValidationResult::ok(truncated as u32)
}

// [+-]?(\d+([.,]\d*)?|[.,]\d+)，逗号按小数点处理
fn parse_number(text: &str) -> Option<f64> {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (int_part, frac_part) = match body.find(['.', ',']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) {
        return None;
    }
    match frac_part {
        Some(frac) if !all_digits(frac) => return None,
        Some(frac) if int_part.is_empty() && frac.is_empty() => return None,
        None if int_part.is_empty() => return None,
        _ => {}
    }

    text.replacen(',', ".", 1).parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_order_in_range() {
        for n in MIN_ORDER..=MAX_ORDER {
            let result = validate(&n.to_string());
            assert!(result.valid, "order {} should be valid", n);
            assert_eq!(result.value, Some(n));
            assert_eq!(result.error, None);
        }
    }

    #[test]
    fn rejects_documented_inputs() {
        let cases = [
            ("", ValidationError::NotANumber),
            ("abc", ValidationError::NotANumber),
            ("0", ValidationError::OutOfRange),
            ("21", ValidationError::OutOfRange),
            ("3.5", ValidationError::NotInteger),
            ("1,5", ValidationError::NotInteger),
        ];
        for (input, expected) in cases {
            let result = validate(input);
            assert!(!result.valid, "{:?} should be rejected", input);
            assert_eq!(result.error, Some(expected), "input {:?}", input);
            assert_eq!(result.value, None);
            assert_eq!(result.message, expected.message());
        }
    }

    #[test]
    fn range_is_checked_before_fraction() {
        assert_eq!(validate("25.5").error, Some(ValidationError::OutOfRange));
        assert_eq!(validate("0.5").error, Some(ValidationError::OutOfRange));
        assert_eq!(validate("4.").error, Some(ValidationError::NotInteger));
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(validate("  7 ").value, Some(7));
        assert_eq!(validate("   ").error, Some(ValidationError::NotANumber));
    }

    #[test]
    fn rejects_non_decimal_notations() {
        for input in ["1e1", "inf", "NaN", "0x10", "12abc", "+", ".", "1.2.3", "--3"] {
            assert_eq!(
                validate(input).error,
                Some(ValidationError::NotANumber),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn huge_and_negative_numbers_are_out_of_range() {
        assert_eq!(
            validate("99999999999999999999999").error,
            Some(ValidationError::OutOfRange)
        );
        assert_eq!(validate("-3").error, Some(ValidationError::OutOfRange));
        assert_eq!(validate("+3").value, Some(3));
    }
}
