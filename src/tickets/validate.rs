use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::error::FieldErrors;
use crate::store::TicketFields;
use crate::tickets::dto::TicketPayload;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 30;
pub const PRIORITY_MAX: usize = 30;
pub const ASSIGNED_TO_MAX: usize = 30;

fn push(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> String {
    match value {
        None => {
            push(errors, field, "This field is required.".into());
            String::new()
        }
        Some("") => {
            push(errors, field, "This field may not be blank.".into());
            String::new()
        }
        Some(v) => {
            if v.chars().count() > max {
                push(
                    errors,
                    field,
                    format!("Ensure this field has no more than {max} characters."),
                );
            }
            v.to_string()
        }
    }
}

fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let v = value.filter(|v| !v.is_empty())?;
    if v.chars().count() > max {
        push(
            errors,
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
    }
    Some(v.to_string())
}

/// Checks the payload against the field rules and assembles the store-facing
/// field set. All violations are collected into one map; a payload is only
/// accepted when the map stays empty.
pub fn validate(payload: &TicketPayload) -> Result<TicketFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = required_text(&mut errors, "title", payload.title.as_deref(), TITLE_MAX);
    let description = required_text(
        &mut errors,
        "description",
        payload.description.as_deref(),
        DESCRIPTION_MAX,
    );

    let due_date = match payload.due_date.as_deref() {
        None | Some("") => {
            push(&mut errors, "due_date", "This field is required.".into());
            None
        }
        Some(raw) => match Date::parse(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                push(
                    &mut errors,
                    "due_date",
                    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".into(),
                );
                None
            }
        },
    };

    let column_id = match payload.column_id.as_ref() {
        None => {
            push(&mut errors, "column_id", "This field is required.".into());
            None
        }
        Some(value) => match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                push(&mut errors, "column_id", "A valid integer is required.".into());
                None
            }
        },
    };

    let priority = optional_text(
        &mut errors,
        "priority",
        payload.priority.as_deref(),
        PRIORITY_MAX,
    );
    let assigned_to = optional_text(
        &mut errors,
        "assigned_to",
        payload.assigned_to.as_deref(),
        ASSIGNED_TO_MAX,
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    // Unwraps cannot fire: a missing date or column id put an entry in the map.
    Ok(TicketFields {
        title,
        description,
        due_date: due_date.expect("due_date validated"),
        priority,
        column_id: column_id.expect("column_id validated"),
        assigned_to,
    })
}
