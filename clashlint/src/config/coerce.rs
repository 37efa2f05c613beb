use serde_yaml::{Mapping, Number, Value};

/// Strings as-is, numbers by their text.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn as_text_list(value: &Value) -> Option<Vec<String>> {
    value.as_sequence()?.iter().map(as_text).collect()
}

/// Integral numbers and numeric strings; fractions are rejected.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn text_value(s: String) -> Value {
    Value::String(s)
}

pub(crate) fn text_list_value(list: Vec<String>) -> Value {
    Value::Sequence(list.into_iter().map(Value::String).collect())
}

pub(crate) fn number_value(n: impl Into<Number>) -> Value {
    Value::Number(n.into())
}

/// Reads known keys out of a YAML mapping. A value its field cannot hold is
/// left in the remainder, so it survives a save untouched.
pub(crate) struct Fields {
    rest: Mapping,
}

impl Fields {
    pub fn new(map: Mapping) -> Self {
        Self { rest: map }
    }

    pub fn take<T>(&mut self, key: &str, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let converted = convert(self.rest.get(key)?)?;
        self.rest.remove(key);
        Some(converted)
    }

    pub fn into_rest(self) -> Mapping {
        self.rest
    }
}

/// Builds a mapping from typed fields followed by leftovers. A typed field
/// wins over a leftover of the same key.
pub(crate) struct MappingBuilder {
    map: Mapping,
}

impl MappingBuilder {
    pub fn new() -> Self {
        Self {
            map: Mapping::new(),
        }
    }

    pub fn put(mut self, key: &str, value: Option<Value>) -> Self {
        if let Some(value) = value {
            self.map.insert(Value::String(key.to_string()), value);
        }
        self
    }

    pub fn finish(mut self, rest: Mapping) -> Value {
        for (k, v) in rest {
            if !self.map.contains_key(&k) {
                self.map.insert(k, v);
            }
        }
        Value::Mapping(self.map)
    }
}

/// Known keys still present in a remainder, i.e. fields whose value was unusable.
pub(crate) fn unreadable<'a>(rest: &Mapping, known: &[&'a str]) -> Vec<&'a str> {
    known
        .iter()
        .copied()
        .filter(|k| rest.contains_key(*k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_coercion() {
        assert_eq!(as_text(&value("123")).as_deref(), Some("123"));
        assert_eq!(as_text(&value("[a]")), None);
        assert_eq!(
            as_text_list(&value("[a, 1]")),
            Some(vec!["a".to_string(), "1".to_string()])
        );
        assert_eq!(as_text_list(&value("[a, {b: 1}]")), None);
        assert_eq!(as_integer(&value("'300'")), Some(300));
        assert_eq!(as_integer(&value("-5")), Some(-5));
        assert_eq!(as_integer(&value("3600.5")), None);

        let mut fields = Fields::new(value("{name: 1, interval: x, keep: true}").as_mapping().unwrap().clone());
        assert_eq!(fields.take("name", as_text).as_deref(), Some("1"));
        assert_eq!(fields.take("interval", as_integer), None);
        assert_eq!(fields.take("missing", as_text), None);
        let rest = fields.into_rest();
        assert_eq!(unreadable(&rest, &["name", "interval"]), vec!["interval"]);

        let out = MappingBuilder::new()
            .put("interval", Some(number_value(300u64)))
            .put("name", None)
            .finish(rest);
        assert_eq!(out, value("{interval: 300, keep: true}"));
    }
}
