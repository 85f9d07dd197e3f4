//! Edit-window guard for non-admin report changes

use chrono::NaiveDate;
use timebook_domain::{edit_cutoff, Result, TimebookError, User};

/// Reject a change to a report dated `date` when `user` may no longer edit it.
///
/// Administrators are never restricted.
pub fn ensure_editable(user: &User, date: NaiveDate, today: NaiveDate) -> Result<()> {
    if user.is_admin {
        return Ok(());
    }

    let cutoff = edit_cutoff(today, user.last_report_day);
    if date < cutoff {
        return Err(TimebookError::Validation {
            message: format!(
                "Reports dated before {} can no longer be changed",
                cutoff.format("%Y-%m-%d")
            ),
            fields: [("date".to_string(), "is outside the edit window".to_string())].into(),
        });
    }
    Ok(())
}
