//! Input forms: the datapoint sub-form inside the detail view and the
//! goal creation form.
//!
//! Every field has an [`InputClass`] that decides which characters it
//! accepts. Rejected characters are dropped silently.

use jiff::civil::Date;

use crate::types::DEFAULT_COMMENT;

/// Placeholder meaning "not provided" in the goal creation form
pub const NOT_PROVIDED: &str = "null";

/// Character acceptance rule for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    /// ASCII digits only
    Digits,
    /// Digits, `.`, a sign, and `:` for clock durations
    Decimal,
    /// ASCII letters only
    Letters,
    /// ASCII letters, digits, `-` and `_`
    AlphanumericDash,
    /// Any non-control character
    Printable,
}

impl InputClass {
    pub fn accepts(self, c: char) -> bool {
        match self {
            InputClass::Digits => c.is_ascii_digit(),
            InputClass::Decimal => c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ':'),
            InputClass::Letters => c.is_ascii_alphabetic(),
            InputClass::AlphanumericDash => c.is_ascii_alphanumeric() || matches!(c, '-' | '_'),
            InputClass::Printable => !c.is_control(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub class: InputClass,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, class: InputClass, value: impl Into<String>) -> Self {
        Self {
            label,
            class,
            value: value.into(),
        }
    }
}

/// Ordered fields with a focus index
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    fields: Vec<Field>,
    focus: usize,
}

impl Fields {
    fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Append `c` to the focused field if its class accepts it.
    /// Returns whether the character was taken.
    pub fn insert_char(&mut self, c: char) -> bool {
        match self.fields.get_mut(self.focus) {
            Some(field) if field.class.accepts(c) => {
                field.value.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Replace a field's value without input filtering
    pub fn set(&mut self, index: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.to_string();
        }
    }
}

/// Datapoint entry sub-form
#[derive(Debug, Clone, PartialEq)]
pub struct DatapointForm {
    pub fields: Fields,
    pub error: Option<String>,
}

impl DatapointForm {
    pub const DATE: usize = 0;
    pub const VALUE: usize = 1;
    pub const COMMENT: usize = 2;

    /// New form for `today`, prefilled with the last known value. Focus
    /// starts on the value.
    pub fn new(today: Date, last_value: String) -> Self {
        let mut fields = Fields::new(vec![
            Field::new("Date", InputClass::AlphanumericDash, today.to_string()),
            Field::new("Value", InputClass::Decimal, last_value),
            Field::new("Comment", InputClass::Printable, DEFAULT_COMMENT),
        ]);
        fields.focus = Self::VALUE;
        Self {
            fields,
            error: None,
        }
    }

    pub fn date(&self) -> &str {
        self.fields.value(Self::DATE)
    }

    pub fn value(&self) -> &str {
        self.fields.value(Self::VALUE)
    }

    pub fn comment(&self) -> &str {
        self.fields.value(Self::COMMENT)
    }
}

/// Goal creation form
#[derive(Debug, Clone, PartialEq)]
pub struct CreateGoalForm {
    pub fields: Fields,
    pub error: Option<String>,
}

impl Default for CreateGoalForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateGoalForm {
    pub const SLUG: usize = 0;
    pub const TITLE: usize = 1;
    pub const GOAL_TYPE: usize = 2;
    pub const UNITS: usize = 3;
    pub const TARGET_DATE: usize = 4;
    pub const TARGET_VALUE: usize = 5;
    pub const RATE: usize = 6;
    pub const RATE_UNITS: usize = 7;

    pub fn new() -> Self {
        Self {
            fields: Fields::new(vec![
                Field::new("Slug", InputClass::AlphanumericDash, ""),
                Field::new("Title", InputClass::Printable, ""),
                Field::new("Goal type", InputClass::Letters, "hustler"),
                Field::new("Units", InputClass::Printable, ""),
                Field::new("Goal date", InputClass::AlphanumericDash, NOT_PROVIDED),
                Field::new("Goal value", InputClass::Decimal, NOT_PROVIDED),
                Field::new("Rate", InputClass::Decimal, NOT_PROVIDED),
                Field::new("Rate units", InputClass::Letters, "d"),
            ]),
            error: None,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.value(index)
    }
}
