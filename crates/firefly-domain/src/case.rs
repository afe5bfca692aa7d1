//! Case module - the unit of work in Firefly Bridge

use crate::status::CaseStatus;
use crate::urgency::UrgencyLevel;
use std::fmt;

/// Unique identifier for a case based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so id order matches intake order
/// - 128-bit uniqueness with no coordination between intake workers
/// - RFC 9562-standard string format for URLs and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(u128);

impl CaseId {
    /// Generate a new UUIDv7-based CaseId
    ///
    /// # Examples
    ///
    /// ```
    /// use firefly_domain::CaseId;
    ///
    /// let id = CaseId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a CaseId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a CaseId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use firefly_domain::CaseId;
    ///
    /// let id = CaseId::new();
    /// let parsed = CaseId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid case id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for CaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A case - one reported rescue/help request
///
/// `raw_content` is immutable once stored. The four derived fields
/// (`extracted_phones`, `extracted_location`, `description`, `urgency`) are
/// pure functions of `raw_content` computed at intake; they are never
/// recomputed or user-edited afterward. Only `status`, `assigned_to` and
/// `notes` change during the case lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// Unique identifier
    pub id: CaseId,

    /// Origin channel ("facebook", "twitter", "line", "manual", ...)
    pub source: String,

    /// Link to the original post, when known
    pub source_url: Option<String>,

    /// The untouched input text
    pub raw_content: String,

    /// Distinct phone numbers found in the text, in first-match order
    pub extracted_phones: Vec<String>,

    /// First gazetteer place name found in the text, if any
    pub extracted_location: Option<String>,

    /// Matched descriptive fragments, or a truncated prefix of the text
    pub description: String,

    /// Severity bucket assigned by keyword match
    pub urgency: UrgencyLevel,

    /// Caller-supplied latitude, not derived
    pub latitude: Option<f64>,

    /// Caller-supplied longitude, not derived
    pub longitude: Option<f64>,

    /// Operator-driven lifecycle state
    pub status: CaseStatus,

    /// Operator or team the case is assigned to
    pub assigned_to: Option<String>,

    /// Free-form operator notes
    pub notes: Option<String>,

    /// When this case was created (milliseconds since Unix epoch)
    pub created_at: u64,

    /// When this case was last modified (milliseconds since Unix epoch)
    pub updated_at: u64,
}

impl Case {
    /// Create a new case in the `pending` state
    ///
    /// `assigned_to` and `notes` start empty and `updated_at` starts equal
    /// to `created_at`; all three change only through the update path.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CaseId,
        source: String,
        source_url: Option<String>,
        raw_content: String,
        extracted_phones: Vec<String>,
        extracted_location: Option<String>,
        description: String,
        urgency: UrgencyLevel,
        latitude: Option<f64>,
        longitude: Option<f64>,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            source,
            source_url,
            raw_content,
            extracted_phones,
            extracted_location,
            description,
            urgency,
            latitude,
            longitude,
            status: CaseStatus::Pending,
            assigned_to: None,
            notes: None,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case(id: CaseId) -> Case {
        Case::new(
            id,
            "manual".to_string(),
            None,
            "ขอความช่วยเหลือ".to_string(),
            vec![],
            None,
            "ขอความช่วยเหลือ".to_string(),
            UrgencyLevel::Low,
            None,
            None,
            1_700_000_000_000,
        )
    }

    #[test]
    fn test_case_id_ordering() {
        let id1 = CaseId::from_value(1000);
        let id2 = CaseId::from_value(2000);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_case_id_chronological() {
        // UUIDv7s generated in sequence should be chronologically ordered
        let id1 = CaseId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = CaseId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp() <= id2.timestamp(), "Timestamps should be ordered");
    }

    #[test]
    fn test_case_id_display_and_parse() {
        let id = CaseId::new();
        let id_str = id.to_string();

        // UUIDv7 strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id_str.len(), 36);

        let parsed = CaseId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_case_id_invalid_string() {
        assert!(CaseId::from_string("not-a-valid-uuid").is_err());
        assert!(CaseId::from_string("").is_err());
    }

    #[test]
    fn test_new_case_starts_pending() {
        let case = sample_case(CaseId::new());

        assert_eq!(case.status, CaseStatus::Pending);
        assert!(case.assigned_to.is_none());
        assert!(case.notes.is_none());
        assert_eq!(case.updated_at, case.created_at);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: UUIDv7 ordering matches u128 ordering
        #[test]
        fn test_case_id_ordering_property(a: u128, b: u128) {
            let id_a = CaseId::from_value(a);
            let id_b = CaseId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
            prop_assert_eq!(id_a > id_b, a > b);
        }

        /// Property: Round-trip through string representation preserves ID
        #[test]
        fn test_case_id_string_roundtrip(value: u128) {
            let id = CaseId::from_value(value);
            let id_str = id.to_string();

            match CaseId::from_string(&id_str) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }

        /// Property: Generated UUIDv7s have valid timestamps
        #[test]
        fn test_case_id_timestamp_validity(_n in 0..10) {
            let id = CaseId::new();
            let timestamp = id.timestamp();

            // Timestamp should be reasonable (after 2020, before 2100)
            let min_timestamp = 1577836800000u64; // 2020-01-01
            let max_timestamp = 4102444800000u64; // 2100-01-01

            prop_assert!(timestamp >= min_timestamp && timestamp <= max_timestamp,
                "Timestamp {} out of reasonable range", timestamp);
        }
    }
}
