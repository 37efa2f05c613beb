use crate::config::FieldError;
use regex::Regex;
use serde_yaml::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.as_f64().is_some_and(|n| !n.is_nan()),
            FieldType::Boolean => value.is_bool(),
            FieldType::Array => value.is_sequence(),
            FieldType::Object => value.is_mapping(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Url,
    Regex,
    Ip,
}

/// Declarative constraint on a single configuration field.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub ty: Option<FieldType>,
    pub one_of: Option<Vec<&'static str>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub format: Option<FieldFormat>,
    pub item_type: Option<FieldType>,
    /// Replaces the generic type mismatch text.
    pub message: Option<&'static str>,
}

impl FieldRule {
    pub fn of(ty: FieldType) -> Self {
        Self {
            ty: Some(ty),
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        self.one_of = Some(values.to_vec());
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_len = min;
        self.max_len = max;
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn items(mut self, ty: FieldType) -> Self {
        self.item_type = Some(ty);
        self
    }

    pub fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// Check one field value against its rule. Checks run in a fixed order and the
/// first failure is reported.
pub fn validate_field(name: &str, value: Option<&Value>, rule: &FieldRule) -> Result<(), FieldError> {
    if is_empty(value) {
        return if rule.required {
            Err(FieldError::Required(name.to_string()))
        } else {
            Ok(())
        };
    }
    let Some(value) = value else {
        return Ok(());
    };

    if let Some(ty) = rule.ty {
        if !ty.matches(value) {
            return Err(FieldError::Type(
                name.to_string(),
                rule.message.unwrap_or("wrong type").to_string(),
            ));
        }
    }

    if let Some(allowed) = &rule.one_of {
        if !value.as_str().is_some_and(|s| allowed.contains(&s)) {
            return Err(FieldError::NotInEnum {
                field: name.to_string(),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    if rule.ty == Some(FieldType::Number) {
        if let Some(n) = value.as_f64() {
            if let Some(min) = rule.min.filter(|min| n < *min) {
                return Err(FieldError::BelowMin(name.to_string(), min));
            }
            if let Some(max) = rule.max.filter(|max| n > *max) {
                return Err(FieldError::AboveMax(name.to_string(), max));
            }
        }
    }

    if rule.ty == Some(FieldType::String) {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if let Some(min) = rule.min_len.filter(|min| len < *min) {
                return Err(FieldError::TooShort(name.to_string(), min));
            }
            if let Some(max) = rule.max_len.filter(|max| len > *max) {
                return Err(FieldError::TooLong(name.to_string(), max));
            }
        }
    }

    if let Some(format) = rule.format {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        };
        if let Err(reason) = check_format(&text, format) {
            return Err(FieldError::Format(name.to_string(), reason));
        }
    }

    if let (Some(FieldType::Array), Some(item_type)) = (rule.ty, rule.item_type) {
        if let Some(seq) = value.as_sequence() {
            if let Some(idx) = seq.iter().position(|v| !item_type.matches(v)) {
                return Err(FieldError::ItemType(name.to_string(), idx));
            }
        }
    }
    Ok(())
}

/// Check a string against a format; the error is the human-readable reason.
pub fn check_format(value: &str, format: FieldFormat) -> Result<(), &'static str> {
    match format {
        FieldFormat::Url => url::Url::parse(value)
            .map(|_| ())
            .map_err(|_| "URL format incorrect"),
        FieldFormat::Regex => Regex::new(value)
            .map(|_| ())
            .map_err(|_| "regular expression format incorrect"),
        FieldFormat::Ip => {
            if is_dotted_quad(value) {
                Ok(())
            } else {
                Err("IP address format incorrect")
            }
        }
    }
}

pub fn is_absolute_url(value: &str) -> bool {
    check_format(value, FieldFormat::Url).is_ok()
}

fn is_dotted_quad(value: &str) -> bool {
    let octets: Vec<&str> = value.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|o| {
            (1..=3).contains(&o.len())
                && o.bytes().all(|b| b.is_ascii_digit())
                && o.parse::<u16>().is_ok_and(|n| n <= 255)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_required_and_empty() {
        let rule = FieldRule::of(FieldType::String).required();
        assert_eq!(
            validate_field("mode", None, &rule),
            Err(FieldError::Required("mode".to_string()))
        );
        assert!(validate_field("mode", Some(&v("''")), &rule).is_err());
        let optional = FieldRule::of(FieldType::Number).range(Some(1.0), None);
        assert_eq!(validate_field("port", None, &optional), Ok(()));
        assert_eq!(validate_field("port", Some(&Value::Null), &optional), Ok(()));
    }

    #[test]
    fn test_type_and_enum() {
        let rule = FieldRule::of(FieldType::String)
            .one_of(&["rule", "global", "direct"])
            .message("mode must be rule, global or direct");
        assert_eq!(
            validate_field("mode", Some(&v("3")), &rule)
                .unwrap_err()
                .to_string(),
            "mode: mode must be rule, global or direct"
        );
        assert_eq!(
            validate_field("mode", Some(&v("script")), &rule)
                .unwrap_err()
                .to_string(),
            "mode: value must be one of rule, global, direct"
        );
        assert_eq!(validate_field("mode", Some(&v("global")), &rule), Ok(()));
        assert!(!FieldType::Number.matches(&v(".nan")));
        assert!(FieldType::Object.matches(&v("{a: 1}")));
        assert!(!FieldType::Object.matches(&v("[1]")));
    }

    #[test]
    fn test_bounds() {
        let port = FieldRule::of(FieldType::Number).range(Some(1.0), Some(65535.0));
        assert!(matches!(
            validate_field("port", Some(&v("0")), &port),
            Err(FieldError::BelowMin(_, _))
        ));
        assert!(matches!(
            validate_field("port", Some(&v("70000")), &port),
            Err(FieldError::AboveMax(_, _))
        ));
        assert_eq!(validate_field("port", Some(&v("7890")), &port), Ok(()));

        let name = FieldRule::of(FieldType::String).length(Some(2), Some(4));
        assert!(matches!(
            validate_field("name", Some(&v("a")), &name),
            Err(FieldError::TooShort(_, 2))
        ));
        assert!(matches!(
            validate_field("name", Some(&v("abcde")), &name),
            Err(FieldError::TooLong(_, 4))
        ));
    }

    #[test]
    fn test_formats() {
        assert!(check_format("https://example.com/a.yaml", FieldFormat::Url).is_ok());
        assert!(check_format("not-a-url", FieldFormat::Url).is_err());
        assert!(check_format("(?i)hk|hong", FieldFormat::Regex).is_ok());
        assert!(check_format("(unclosed", FieldFormat::Regex).is_err());
        assert!(check_format("192.168.1.1", FieldFormat::Ip).is_ok());
        assert!(check_format("256.1.1.1", FieldFormat::Ip).is_err());
        assert!(check_format("1.1.1", FieldFormat::Ip).is_err());
        assert!(check_format("1.1.1.a", FieldFormat::Ip).is_err());

        let rule = FieldRule::of(FieldType::String).format(FieldFormat::Url);
        assert_eq!(
            validate_field("url", Some(&v("nope")), &rule)
                .unwrap_err()
                .to_string(),
            "url: URL format incorrect"
        );
    }

    #[test]
    fn test_item_type() {
        let rule = FieldRule::of(FieldType::Array).items(FieldType::String);
        assert_eq!(
            validate_field("nameserver", Some(&v("[a, 1, 2]")), &rule),
            Err(FieldError::ItemType("nameserver".to_string(), 1))
        );
        assert_eq!(validate_field("nameserver", Some(&v("[a, b]")), &rule), Ok(()));
    }
}
