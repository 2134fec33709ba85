//! Listed resource domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::JobStatus;

/// One entry of the remote image collection
///
/// Records are replaced wholesale on every page fetch; only `id` carries
/// identity across fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: Uuid,
    pub filename: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
}

impl ResourceRecord {
    /// Whether `needle` occurs in the filename
    pub fn filename_contains(&self, needle: &str, case_insensitive: bool) -> bool {
        if case_insensitive {
            self.filename
                .to_lowercase()
                .contains(&needle.to_lowercase())
        } else {
            self.filename.contains(needle)
        }
    }
}

/// Window of the collection covered by one list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub total_count: u64,
}

impl PageWindow {
    /// Window for a response of `returned` records fetched at `offset`
    ///
    /// Some services report only the page length as the total. The total is
    /// raised so it always covers the records actually returned.
    pub fn observed(offset: u64, limit: u64, reported_total: u64, returned: u64) -> Self {
        let seen = if returned == 0 {
            0
        } else {
            offset.saturating_add(returned)
        };
        Self {
            offset,
            limit,
            total_count: reported_total.max(seen),
        }
    }

    /// Number of pages of `limit` records needed for `total_count`
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(filename: &str) -> ResourceRecord {
        ResourceRecord {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            size_bytes: 1024,
            mime_type: Some("image/png".to_string()),
            created_at: Utc::now(),
            status: JobStatus::Completed,
        }
    }

    #[test]
    fn test_filename_contains() {
        let r = record("Black_Cat.PNG");
        assert!(r.filename_contains("cat", true));
        assert!(!r.filename_contains("cat", false));
        assert!(r.filename_contains("Cat", false));
    }

    #[test]
    fn test_total_pages() {
        let window = |offset, total_count| PageWindow {
            offset,
            limit: 12,
            total_count,
        };
        assert_eq!(window(0, 0).total_pages(), 0);
        assert_eq!(window(0, 12).total_pages(), 1);
        assert_eq!(window(0, 13).total_pages(), 2);
    }

    #[test]
    fn test_observed_total_covers_returned_records() {
        // Total reported as the page length
        let window = PageWindow::observed(12, 12, 8, 8);
        assert_eq!(window.total_count, 20);
        assert_eq!(window.total_pages(), 2);

        // A real total wins when it is larger
        assert_eq!(PageWindow::observed(0, 12, 30, 12).total_count, 30);

        // An empty page past the end keeps the reported total
        assert_eq!(PageWindow::observed(60, 12, 13, 0).total_count, 13);
    }
}
