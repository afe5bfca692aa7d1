//! Trait definitions for external interactions
//!
//! These traits define the boundary between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Case, CaseId, CaseStatus, UrgencyLevel};

/// Trait for storing and retrieving cases
///
/// Implemented by the infrastructure layer (firefly-store)
pub trait CaseStore {
    /// Error type for store operations
    type Error;

    /// Insert a newly ingested case
    fn insert_case(&mut self, case: Case) -> Result<CaseId, Self::Error>;

    /// Get a case by ID
    fn get_case(&self, id: CaseId) -> Result<Option<Case>, Self::Error>;

    /// Query cases matching criteria, newest first
    fn query_cases(&self, query: &CaseQuery) -> Result<Vec<Case>, Self::Error>;

    /// Apply a partial update to a case
    ///
    /// Only the operator-mutable fields (`status`, `assigned_to`, `notes`)
    /// can change. Returns `None` when no case has the given id.
    fn update_case(&mut self, id: CaseId, update: &CaseUpdate) -> Result<Option<Case>, Self::Error>;

    /// Delete a case, returning whether a row was removed
    fn delete_case(&mut self, id: CaseId) -> Result<bool, Self::Error>;

    /// Count all stored cases
    fn count_cases(&self) -> Result<u64, Self::Error>;
}

/// Query criteria for retrieving cases
///
/// Filters are exact-match and AND-combined; an empty query returns
/// everything, newest `created_at` first.
#[derive(Debug, Clone, Default)]
pub struct CaseQuery {
    /// Filter by lifecycle status
    pub status: Option<CaseStatus>,

    /// Filter by urgency level
    pub urgency: Option<UrgencyLevel>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Partial update applied by the downstream operator UI
///
/// Fields left as `None` are untouched. Derived fields and `raw_content`
/// are deliberately absent; they are immutable after intake.
#[derive(Debug, Clone, Default)]
pub struct CaseUpdate {
    /// New lifecycle status
    pub status: Option<CaseStatus>,

    /// New assignee
    pub assigned_to: Option<String>,

    /// New operator notes
    pub notes: Option<String>,
}

impl CaseUpdate {
    /// True when the update touches no fields
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to.is_none() && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_unfiltered() {
        let query = CaseQuery::default();
        assert!(query.status.is_none());
        assert!(query.urgency.is_none());
        assert!(query.limit.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(CaseUpdate::default().is_empty());

        let update = CaseUpdate {
            status: Some(CaseStatus::Assigned),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
