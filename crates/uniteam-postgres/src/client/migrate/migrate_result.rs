use std::time::Duration;

/// Applied and pending migration versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Applied versions, oldest first.
    pub applied_versions: Vec<String>,
    /// Embedded versions not yet applied, oldest first.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    pub fn new(
        applied_versions: impl Into<Vec<String>>,
        pending_versions: impl Into<Vec<String>>,
    ) -> Self {
        Self {
            applied_versions: applied_versions.into(),
            pending_versions: pending_versions.into(),
        }
    }

    /// Splits the embedded versions into applied and pending.
    pub fn from_versions(embedded: &[String], applied: Vec<String>) -> Self {
        let pending = embedded
            .iter()
            .filter(|version| !applied.contains(version))
            .cloned()
            .collect::<Vec<_>>();

        Self::new(applied, pending)
    }

    #[inline]
    pub fn applied_migrations(&self) -> usize {
        self.applied_versions.len()
    }

    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }

    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall-clock duration of the run.
    pub duration: Duration,
    /// Versions applied by this run.
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    pub fn success(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
        }
    }

    /// Returns whether the schema was already current.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.processed_versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn splits_pending_from_applied() {
        let embedded = versions(&["00000000000000", "20250101000001", "20250101000002"]);
        let status =
            MigrationStatus::from_versions(&embedded, versions(&["00000000000000"]));

        assert_eq!(status.applied_migrations(), 1);
        assert_eq!(
            status.pending_versions,
            versions(&["20250101000001", "20250101000002"])
        );
        assert!(!status.is_up_to_date());
        assert_eq!(status.last_applied_version(), Some("00000000000000"));
    }

    #[test]
    fn up_to_date_when_everything_applied() {
        let embedded = versions(&["00000000000000", "20250101000001"]);
        let status = MigrationStatus::from_versions(&embedded, embedded.clone());
        assert!(status.is_up_to_date());
    }

    #[test]
    fn empty_run_is_no_op() {
        let result = MigrationResult::success(Duration::from_millis(3), vec![]);
        assert!(result.is_no_op());
    }
}
