//! Urgency module - severity buckets for triage

/// Severity bucket assigned to a case at intake
///
/// Urgency is derived from the raw post text by keyword match. The tiers are
/// evaluated strictly top-down (critical first), so a post containing both a
/// critical-tier and a lower-tier keyword always lands in the higher bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrgencyLevel {
    /// Life-threatening, needs immediate response
    Critical,

    /// Urgent, explicit call for help
    High,

    /// Time-sensitive but not an emergency
    Medium,

    /// Default when no urgency keyword matches
    Low,
}

impl UrgencyLevel {
    /// Get the urgency level as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::High => "high",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Low => "low",
        }
    }

    /// Parse an urgency level from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(UrgencyLevel::Critical),
            "high" => Some(UrgencyLevel::High),
            "medium" => Some(UrgencyLevel::Medium),
            "low" => Some(UrgencyLevel::Low),
            _ => None,
        }
    }
}

impl std::str::FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid urgency level: {}", s))
    }
}
