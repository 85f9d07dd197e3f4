// Validation Module - field-level validation that accumulates every failure
use std::cmp::Ordering;
use std::fmt;

mod validators;

pub use validators::{FieldValidator, StringValidator};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Merge another validation error into this one
    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [only] => write!(f, "{} {}", only.field, only.message),
            many => {
                write!(f, "Validation failed with {} errors: ", many.len())?;
                for (i, error) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Main validator struct for orchestrating validations
///
/// Checks never short-circuit: every failing field is reported so a form can
/// highlight all of them at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
    path: Vec<String>,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error, prefixed with the current nesting path
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = if self.path.is_empty() {
            field.into()
        } else {
            format!("{}.{}", self.path.join("."), field.into())
        };
        self.errors.add_field_error(field, message);
    }

    /// Validate a field with a specific validator
    pub fn validate_field<T, V>(&mut self, field: &str, value: &T, validator: &V)
    where
        T: ?Sized,
        V: FieldValidator<T> + ?Sized,
    {
        if let Err(msg) = validator.validate(value) {
            self.add_error(field, msg);
        }
    }

    /// Validate a numeric range (inclusive)
    pub fn validate_range<T>(&mut self, field: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + fmt::Display,
    {
        if value < min || value > max {
            self.add_error(field, format!("must be between {min} and {max}"));
        }
    }

    /// Validate minimum value
    pub fn validate_min<T>(&mut self, field: &str, value: T, min: T)
    where
        T: PartialOrd + fmt::Display,
    {
        // NaN is unordered and must fail too.
        if matches!(value.partial_cmp(&min), Some(Ordering::Less) | None) {
            self.add_error(field, format!("must be at least {min}"));
        }
    }

    /// Validate an optional value against a minimum, skipping `None`
    pub fn validate_optional_min<T>(&mut self, field: &str, value: Option<T>, min: T)
    where
        T: PartialOrd + fmt::Display,
    {
        if let Some(value) = value {
            self.validate_min(field, value, min);
        }
    }

    /// Validate string is not empty
    pub fn validate_not_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_error(field, "cannot be empty");
        }
    }

    /// Validate string matches pattern
    pub fn validate_pattern(&mut self, field: &str, value: &str, pattern: &regex::Regex) {
        if !pattern.is_match(value) {
            self.add_error(field, "has an invalid format");
        }
    }

    /// Validate with nested context, e.g. `rates.0.hourlyRate`
    pub fn validate_nested<F>(&mut self, field: &str, f: F)
    where
        F: FnOnce(&mut Validator),
    {
        self.path.push(field.to_string());
        f(self);
        self.path.pop();
    }

    /// Check if validation has errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.error_count()
    }

    /// Finish validation, returning every collected error
    pub fn finalize(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure() {
        let mut v = Validator::new();
        v.validate_not_empty("name", "  ");
        v.validate_range("lastReportDay", 40, 0, 31);
        v.validate_min("duration", -1.0, 0.0);

        let err = v.finalize().unwrap_err();
        assert_eq!(err.error_count(), 3);
        assert_eq!(err.field_errors("lastReportDay")[0].message, "must be between 0 and 31");
    }

    #[test]
    fn nan_is_rejected_by_min() {
        let mut v = Validator::new();
        v.validate_min("duration", f64::NAN, 0.0);
        assert!(v.has_errors());
    }

    #[test]
    fn nested_paths_prefix_field_names() {
        let mut v = Validator::new();
        v.validate_nested("rates", |v| {
            v.validate_nested("0", |v| v.validate_optional_min("hourlyRate", Some(-5.0), 0.0));
        });

        let err = v.finalize().unwrap_err();
        assert_eq!(err.errors[0].field, "rates.0.hourlyRate");
    }

    #[test]
    fn single_error_display_reads_as_sentence() {
        let err = ValidationError::field("startTime", "has an invalid format");
        assert_eq!(err.to_string(), "startTime has an invalid format");
    }

    #[test]
    fn empty_validator_finalizes_ok() {
        let mut v = Validator::new();
        v.validate_optional_min("hourlyRate", None, 0.0);
        assert!(v.finalize().is_ok());
    }
}
