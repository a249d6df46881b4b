use chrono::{NaiveDate, Utc};

/// Current calendar day (UTC), the day boundary used for "closed today"
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
