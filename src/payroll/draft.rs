use chrono::{DateTime, Duration, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::types::{DraftId, PayPeriod, PayrollId, StaffId};

use super::record::PayrollRecord;
use super::salary::SalaryBreakdown;

/// Editable payroll draft held by the server.
///
/// Operators review a computed breakdown before committing it. Drafts carry
/// their own expiry so an abandoned edit never turns into a payroll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollDraft {
    pub id: DraftId,
    pub staff_id: StaffId,
    pub period: PayPeriod,
    pub breakdown: SalaryBreakdown,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PayrollDraft {
    pub fn new(
        id: DraftId,
        staff_id: StaffId,
        period: PayPeriod,
        breakdown: SalaryBreakdown,
        ttl: Duration,
        time_provider: &SafeTimeProvider,
    ) -> Self {
        let created_at = time_provider.now();
        Self {
            id,
            staff_id,
            period,
            breakdown,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired(&self, time_provider: &SafeTimeProvider) -> bool {
        time_provider.now() >= self.expires_at
    }

    /// turn the draft into a pending payroll record
    pub fn into_record(self, payroll_id: PayrollId, time_provider: &SafeTimeProvider) -> Result<PayrollRecord> {
        if self.is_expired(time_provider) {
            return Err(LedgerError::DraftExpired { draft_id: self.id });
        }
        Ok(PayrollRecord::from_breakdown(
            payroll_id,
            self.staff_id,
            self.period,
            self.breakdown,
            time_provider,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayrollPolicy;
    use crate::decimal::Money;
    use crate::payroll::salary::{AttendanceBasis, AttendanceToSalaryCalculator};
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn draft(time: &SafeTimeProvider) -> PayrollDraft {
        let breakdown = AttendanceToSalaryCalculator::new(PayrollPolicy::default())
            .calculate(Some(Money::from_major(45_000)), AttendanceBasis::Manual(20));
        PayrollDraft::new(
            Uuid::new_v4(),
            "EMP-3".to_string(),
            PayPeriod::new(6, 2024).unwrap(),
            breakdown,
            Duration::hours(24),
            time,
        )
    }

    #[test]
    fn test_draft_commits_before_expiry() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 28, 9, 0, 0).unwrap(),
        ));
        let controller = time.test_control().unwrap();
        let draft = draft(&time);
        assert_eq!(draft.expires_at - draft.created_at, Duration::hours(24));

        controller.advance(Duration::hours(23));
        assert!(!draft.is_expired(&time));

        let record = draft.into_record(Uuid::new_v4(), &time).unwrap();
        assert_eq!(record.net_salary, Money::from_major(30_000));
        assert_eq!(record.staff_id, "EMP-3");
    }

    #[test]
    fn test_expired_draft_cannot_commit() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 28, 9, 0, 0).unwrap(),
        ));
        let controller = time.test_control().unwrap();
        let draft = draft(&time);
        let draft_id = draft.id;

        controller.advance(Duration::hours(24));
        assert!(draft.is_expired(&time));

        let err = draft.into_record(Uuid::new_v4(), &time).unwrap_err();
        assert_eq!(err, LedgerError::DraftExpired { draft_id });
    }
}
