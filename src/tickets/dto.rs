use serde::Deserialize;

/// Client-supplied ticket fields, for both create and full-replacement
/// update. Everything is optional at the parse stage; requiredness and
/// limits are enforced by `validate`, which reports per-field messages
/// instead of a single deserialization error.
///
/// `column_id` stays a JSON value until validation so a non-integer shows up
/// as a field error rather than a rejected body. Owner fields
/// (`created_by`, `created_by_username`) are absent on purpose: whatever the
/// client sends for them is dropped here and the server's view of the
/// authenticated caller is used instead.
#[derive(Debug, Default, Deserialize)]
pub struct TicketPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub column_id: Option<serde_json::Value>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}
