//! Helper functions for formatting response fields

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp as RFC 3339 with nanosecond precision
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
