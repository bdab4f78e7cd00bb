//! The collection adapter: an ordered sequence of elements of any type that
//! has an adapter of its own, written on the command line as one
//! comma-separated, double-quote aware line (`a,"b, c",""""`).

use std::fmt;

use crate::error::FlagbindError;
use crate::types::Dynamic;
use crate::value::FlagValue;

pub struct ListValue {
    /// Parses and formats single elements; its own stored value is scratch.
    element: Box<dyn FlagValue>,
    texts: Vec<String>,
    values: Vec<Dynamic>,
}

impl ListValue {
    /// An empty list whose elements are parsed by `element`.
    pub fn new(element: Box<dyn FlagValue>) -> Self {
        Self {
            element,
            texts: Vec::new(),
            values: Vec::new(),
        }
    }

    /// A list holding the current value of each seed adapter. The last seed
    /// parses later input. `None` if there are no seeds.
    pub fn seeded(mut seeds: Vec<Box<dyn FlagValue>>) -> Option<Self> {
        let texts = seeds.iter().map(ToString::to_string).collect();
        let values = seeds.iter().map(|seed| seed.get()).collect();
        let element = seeds.pop()?;
        Some(Self {
            element,
            texts,
            values,
        })
    }

    pub fn values(&self) -> &[Dynamic] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_quoted(&self.texts))
    }
}

impl FlagValue for ListValue {
    /// Replaces the whole list. If any element fails to parse, the previous
    /// contents stay in place.
    fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
        let mut texts = Vec::new();
        let mut values = Vec::new();
        for token in split_quoted(text)? {
            self.element.set(&token)?;
            texts.push(self.element.to_string());
            values.push(self.element.get());
        }
        self.texts = texts;
        self.values = values;
        Ok(())
    }

    fn get(&self) -> Dynamic {
        Dynamic::Sequence(self.element.get().shape(), self.values.clone())
    }

    fn as_list(&self) -> Option<&ListValue> {
        Some(self)
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
        || field.starts_with([' ', '\t'])
        || field.ends_with([' ', '\t'])
}

/// Join fields into one comma-separated line, quoting where a field could
/// not otherwise be read back.
pub fn join_quoted<S: AsRef<str>>(fields: &[S]) -> String {
    // A lone empty field would print as the empty line, which is no fields.
    let lone = fields.len() == 1;
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let field = field.as_ref();
        if needs_quotes(field) || (lone && field.is_empty()) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out
}

/// Split one comma-separated line into fields. Empty input is no fields.
pub fn split_quoted(text: &str) -> Result<Vec<String>, FlagbindError> {
    let invalid = || FlagbindError::InvalidSyntax {
        text: text.to_string(),
        expected: "comma-separated list",
    };

    let mut fields = Vec::new();
    if text.is_empty() {
        return Ok(fields);
    }

    let mut chars = text.chars().peekable();
    loop {
        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err(invalid()),
                }
            }
            match chars.next() {
                Some(',') => fields.push(field),
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(_) => return Err(invalid()),
            }
        } else {
            loop {
                match chars.next() {
                    Some(',') => break,
                    Some('"' | '\r' | '\n') => return Err(invalid()),
                    Some(c) => field.push(c),
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                }
            }
            fields.push(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DurationValue, IntValue, StringValue};
    use std::time::Duration;

    fn ints(list: &ListValue) -> Vec<i32> {
        list.values()
            .iter()
            .cloned()
            .map(|value| value.downcast::<i32>().unwrap())
            .collect()
    }

    #[test]
    fn split_plain_fields() {
        assert_eq!(split_quoted("100,15,20").unwrap(), ["100", "15", "20"]);
        assert_eq!(split_quoted("a,,b").unwrap(), ["a", "", "b"]);
        assert_eq!(split_quoted("a,").unwrap(), ["a", ""]);
        assert!(split_quoted("").unwrap().is_empty());
    }

    #[test]
    fn split_quoted_fields() {
        assert_eq!(
            split_quoted(r#""a,b",c,"say ""hi""""#).unwrap(),
            ["a,b", "c", r#"say "hi""#]
        );
        assert_eq!(split_quoted(r#""""#).unwrap(), [""]);
        assert_eq!(split_quoted("\"line\nbreak\"").unwrap(), ["line\nbreak"]);
    }

    #[test]
    fn split_rejects_stray_quotes() {
        for text in [r#"a"b"#, r#""open"#, r#""closed"x"#, "a\nb"] {
            assert!(
                matches!(split_quoted(text).unwrap_err(), FlagbindError::InvalidSyntax { .. }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn join_quotes_only_when_needed() {
        let fields = ["plain", "with,comma", " padded", "say \"hi\"", ""];
        assert_eq!(
            join_quoted(&fields),
            r#"plain,"with,comma"," padded","say ""hi""","#
        );
        assert_eq!(split_quoted(&join_quoted(&fields)).unwrap(), fields);
    }

    #[test]
    fn single_empty_field_survives_a_round_trip() {
        assert_eq!(join_quoted(&[""]), r#""""#);
        assert_eq!(join_quoted::<&str>(&[]), "");
        assert_eq!(split_quoted(&join_quoted(&[""])).unwrap(), [""]);

        let mut list = ListValue::new(Box::new(StringValue(String::new())));
        list.set(r#""""#).unwrap();
        assert_eq!(list.len(), 1);
        let mut again = ListValue::new(Box::new(StringValue(String::new())));
        again.set(&list.to_string()).unwrap();
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn set_replaces_contents() {
        let mut list = ListValue::new(Box::new(IntValue(0i32)));
        list.set("100,15,20").unwrap();
        assert_eq!(ints(&list), [100, 15, 20]);
        list.set("7").unwrap();
        assert_eq!(ints(&list), [7]);
        list.set("").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn failed_set_is_atomic() {
        let mut list = ListValue::new(Box::new(IntValue(0i32)));
        list.set("1,2").unwrap();
        let err = list.set("3,x,4").unwrap_err();
        assert!(matches!(err, FlagbindError::InvalidSyntax { .. }));
        assert_eq!(ints(&list), [1, 2]);
        assert_eq!(list.to_string(), "1,2");
    }

    #[test]
    fn seeded_list_formats_existing_elements() {
        let seeds: Vec<Box<dyn FlagValue>> = vec![
            Box::new(StringValue("a, b".into())),
            Box::new(StringValue("c".into())),
        ];
        let list = ListValue::seeded(seeds).unwrap();
        assert!(ListValue::seeded(Vec::new()).is_none());
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_string(), r#""a, b",c"#);
    }

    #[test]
    fn format_normalizes_element_text() {
        let mut list = ListValue::new(Box::new(DurationValue(Duration::ZERO)));
        list.set("90s,1h15m").unwrap();
        assert_eq!(list.to_string(), "1m30s,1h15m0s");
        let mut again = ListValue::new(Box::new(DurationValue(Duration::ZERO)));
        again.set(&list.to_string()).unwrap();
        let durations: Vec<Duration> = again
            .values()
            .iter()
            .cloned()
            .filter_map(|value| value.downcast())
            .collect();
        assert_eq!(durations, [Duration::from_secs(90), Duration::from_secs(4500)]);
    }

    #[test]
    fn get_reports_element_shape() {
        let mut list = ListValue::new(Box::new(IntValue(0i32)));
        list.set("1").unwrap();
        assert_eq!(list.get().downcast::<Vec<i32>>(), Some(vec![1]));
    }
}
