use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollPolicy;
use crate::types::{AttendanceStatus, PayPeriod, StaffId};

/// one day of check-in data for a staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub hours_worked: Decimal,
}

/// per-status counts for one staff member in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    pub half_day: u32,
    pub late: u32,
    pub total_hours: Decimal,
}

impl AttendanceSummary {
    /// summarize the records belonging to `staff_id` within `period`;
    /// anything else in the slice is ignored
    pub fn summarize(staff_id: &str, period: PayPeriod, records: &[AttendanceRecord]) -> Self {
        records
            .iter()
            .filter(|r| r.staff_id == staff_id && period.contains(r.date))
            .fold(Self::default(), |mut summary, record| {
                match record.status {
                    AttendanceStatus::Present => summary.present += 1,
                    AttendanceStatus::Absent => summary.absent += 1,
                    AttendanceStatus::HalfDay => summary.half_day += 1,
                    AttendanceStatus::Late => summary.late += 1,
                }
                summary.total_hours += record.hours_worked;
                summary
            })
    }

    /// number of records summarized
    pub fn total_records(&self) -> u32 {
        self.present + self.absent + self.half_day + self.late
    }

    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// days that count toward salary under `policy`
    pub fn counted_days(&self, policy: &PayrollPolicy) -> u32 {
        [
            (AttendanceStatus::Present, self.present),
            (AttendanceStatus::Absent, self.absent),
            (AttendanceStatus::HalfDay, self.half_day),
            (AttendanceStatus::Late, self.late),
        ]
        .iter()
        .filter(|(status, _)| policy.counts(*status))
        .map(|(_, count)| count)
        .sum()
    }
}
