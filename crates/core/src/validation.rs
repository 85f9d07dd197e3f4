//! Bridge from the shared field validator to the domain error type

use std::collections::BTreeMap;

use timebook_common::ValidationError;
use timebook_domain::TimebookError;

/// Convert collected field errors into a user error.
///
/// The first message recorded for a field wins.
pub fn into_domain_error(err: ValidationError) -> TimebookError {
    let message = err.to_string();
    let mut fields = BTreeMap::new();
    for field_error in err.errors {
        fields.entry(field_error.field).or_insert(field_error.message);
    }
    TimebookError::Validation { message, fields }
}

#[cfg(test)]
mod tests {
    use timebook_common::Validator;

    use super::*;

    #[test]
    fn keeps_first_message_per_field() {
        let mut v = Validator::new();
        v.add_error("startTime", "has an invalid format");
        v.add_error("startTime", "cannot be empty");
        v.add_error("duration", "must be at least 0");

        let err = into_domain_error(v.finalize().unwrap_err());
        let fields = err.fields().unwrap();
        assert_eq!(fields["startTime"], "has an invalid format");
        assert_eq!(fields.len(), 2);
        assert!(err.is_user_error());
    }

    #[test]
    fn single_failure_reads_as_sentence() {
        let err = into_domain_error(ValidationError::field("email", "has an invalid format"));
        assert_eq!(err.to_string(), "email has an invalid format");
    }
}
