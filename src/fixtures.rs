#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::fmt;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::{Dynamic, FlagValue, FlagbindError, Flags, Slot};

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct MyOptions {
        #[tag(flag = "msg")]
        pub msg: Option<String>,
        #[tag(flag = "elapsed")]
        pub elapsed: Duration,
        #[tag(flag = "values")]
        pub values: Vec<i64>,
    }

    /// Same flags as [`MyOptions`], one optional layer deeper.
    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct MyOptionsDeep {
        #[tag(flag = "msg")]
        pub msg: Option<Option<String>>,
        #[tag(flag = "elapsed")]
        pub elapsed: Option<Duration>,
        #[tag(flag = "values")]
        pub values: Vec<Option<i64>>,
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct AllTypes {
        #[tag(flag = "bool")]
        pub flag_bool: bool,
        #[tag(flag = "int8")]
        pub int8: i8,
        #[tag(flag = "int16")]
        pub int16: i16,
        #[tag(flag = "int32")]
        pub int32: i32,
        #[tag(flag = "int64")]
        pub int64: i64,
        #[tag(flag = "isize")]
        pub isize: isize,
        #[tag(flag = "uint8")]
        pub uint8: u8,
        #[tag(flag = "uint16")]
        pub uint16: u16,
        #[tag(flag = "uint32")]
        pub uint32: u32,
        #[tag(flag = "uint64")]
        pub uint64: u64,
        #[tag(flag = "usize")]
        pub usize: usize,
        #[tag(flag = "float32")]
        pub float32: f32,
        #[tag(flag = "float64")]
        pub float64: f64,
        #[tag(flag = "string")]
        pub string: String,
        #[tag(flag = "duration")]
        pub duration: Duration,
        #[tag(flag = "strings")]
        pub strings: Vec<String>,
        #[tag(flag = "deep")]
        pub deep: Option<Option<i64>>,
    }

    // -- Nesting ---------------------------------------------------------------

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Nested {
        #[tag(flag = "top")]
        pub top: String,
        pub middle: Option<Middle>,
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Middle {
        pub leaf: Leaf,
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Leaf {
        #[tag(flag = "nested_flag")]
        pub value: i32,
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Outer {
        pub name: String,
        pub inner: Inner,
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Inner {
        #[tag(flag = "count")]
        pub count: u32,
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Tagged {
        #[tag(flag = "plain", flagname = "other")]
        pub value: i32,
        #[tag(flag = "only_flag")]
        pub second: bool,
    }

    #[derive(Flags, Default, Debug)]
    pub struct Empty {
        #[allow(dead_code)]
        secret: i32,
    }

    #[derive(Flags, Default, Debug)]
    pub struct Skipping {
        #[tag(flag = "name")]
        pub name: String,
        #[tag(skip)]
        pub path: PathBuf,
        #[tag(skip)]
        pub cache: HashMap<String, u32>,
    }

    #[derive(Flags, Default, Debug)]
    pub struct Duplicate {
        #[tag(flag = "x")]
        pub a: i32,
        #[tag(flag = "x")]
        pub b: i32,
    }

    #[derive(Flags, Default, Debug)]
    pub struct Matrix {
        #[tag(flag = "rows")]
        pub rows: Vec<Vec<i32>>,
    }

    #[derive(Flags, Default, Debug)]
    pub struct OptionalList {
        #[tag(flag = "ports")]
        pub ports: Option<Vec<u16>>,
    }

    #[derive(Flags, Default, Debug)]
    pub struct Mismatch {
        #[tag(flag = "values")]
        pub values: i64,
    }

    #[derive(Flags, Default, Debug)]
    pub struct WrongBase {
        #[tag(flag = "msg")]
        pub msg: i64,
    }

    // -- Custom base types -----------------------------------------------------

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub enum Choice {
        Red,
        #[default]
        Green,
        Blue,
    }

    crate::base_type!(Choice, default);

    /// Adapter spelling [`Choice`] as lowercase labels.
    pub struct ChoiceValue(pub Choice);

    impl fmt::Display for ChoiceValue {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self.0 {
                Choice::Red => "red",
                Choice::Green => "green",
                Choice::Blue => "blue",
            })
        }
    }

    impl FlagValue for ChoiceValue {
        fn set(&mut self, text: &str) -> Result<(), FlagbindError> {
            self.0 = match text {
                "red" => Choice::Red,
                "green" => Choice::Green,
                "blue" => Choice::Blue,
                _ => {
                    return Err(FlagbindError::InvalidSyntax {
                        text: text.to_string(),
                        expected: "color",
                    });
                }
            };
            Ok(())
        }

        fn get(&self) -> Dynamic {
            self.0.to_dynamic()
        }
    }

    #[derive(Flags, Default, Debug, PartialEq)]
    pub struct Holder {
        #[tag(flag = "choice")]
        pub choice: Choice,
        #[tag(flag = "choices")]
        pub choices: Vec<Choice>,
        #[tag(flag = "maybe")]
        pub maybe: Option<Choice>,
    }

    /// A base type without a zero value.
    #[derive(Clone, Debug, PartialEq)]
    pub struct NoZero(pub u8);

    crate::base_type!(NoZero);

    #[derive(Flags, Default, Debug)]
    pub struct NoZeroHolder {
        #[tag(flag = "nz")]
        pub value: Option<NoZero>,
    }

    #[test]
    fn derived_field_tables() {
        let options = MyOptions::default();
        let names: Vec<&str> = options.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["msg", "elapsed", "values"]);
        assert_eq!(options.type_name(), "MyOptions");
        assert!(Empty::default().fields().is_empty());
        let names: Vec<&str> = Skipping::default().fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["name"]);
    }

    #[test]
    fn fixture_zero_values() {
        assert!(NoZeroHolder::zero().is_some());
        assert!(NoZero::zero().is_none());
        assert_eq!(Choice::zero(), Some(Choice::Green));
    }
}
