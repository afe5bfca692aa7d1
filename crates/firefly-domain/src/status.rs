//! Status module - operator-driven case lifecycle

/// Lifecycle state of a case
///
/// Cases start in `Pending` and are moved forward by operators through the
/// update endpoint; the intake path never sets anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    /// Newly ingested, nobody has looked at it yet
    Pending,

    /// An operator or team has taken the case
    Assigned,

    /// Rescue/response work is underway
    InProgress,

    /// The case is resolved
    Completed,
}

impl CaseStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::Assigned => "assigned",
            CaseStatus::InProgress => "in_progress",
            CaseStatus::Completed => "completed",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(CaseStatus::Pending),
            "assigned" => Some(CaseStatus::Assigned),
            "in_progress" => Some(CaseStatus::InProgress),
            "completed" => Some(CaseStatus::Completed),
            _ => None,
        }
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid case status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            CaseStatus::Pending,
            CaseStatus::Assigned,
            CaseStatus::InProgress,
            CaseStatus::Completed,
        ] {
            assert_eq!(CaseStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_invalid() {
        assert_eq!(CaseStatus::parse("inprogress"), None);
        assert_eq!(CaseStatus::parse("done"), None);
        assert_eq!(CaseStatus::parse(""), None);
    }
}
