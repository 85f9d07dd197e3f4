// Field Validators - Reusable validation components

use once_cell::sync::Lazy;
use regex::Regex;

/// 24-hour `HH:MM` clock time.
static TIME_OF_DAY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").ok());

/// Deliberately loose: one `@`, no whitespace, a dot in the domain.
static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// String validator with various constraints
#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    max_length: Option<usize>,
    pattern: Option<Regex>,
    not_empty: bool,
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self::default()
    }

    /// `HH:MM`, 24-hour clock
    pub fn time_of_day() -> Self {
        Self { pattern: TIME_OF_DAY.clone(), not_empty: true, ..Self::default() }
    }

    /// Plausible e-mail address
    pub fn email() -> Self {
        Self { pattern: EMAIL.clone(), not_empty: true, ..Self::default() }
    }

    /// Require non-empty string
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Set maximum length (in characters)
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set pattern to match
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let trimmed = value.trim();

        if self.not_empty && trimmed.is_empty() {
            return Err("cannot be empty".to_string());
        }

        if let Some(max) = self.max_length {
            if trimmed.chars().count() > max {
                return Err(format!("must not be longer than {max} characters"));
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(trimmed) {
                return Err("has an invalid format".to_string());
            }
        }

        Ok(())
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}
