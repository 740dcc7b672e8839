use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};

/// employee code, e.g. "EMP-0042"
pub type StaffId = String;

/// student or enrolled lead id
pub type StudentId = String;

pub type PayrollId = Uuid;
pub type DraftId = Uuid;
pub type PlanId = Uuid;
pub type PaymentId = Uuid;
pub type MandateId = Uuid;

/// payroll month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    pub year: i32,
    pub month: u32,
}

impl PayPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidDate {
                message: format!("month {} out of range", month),
            });
        }
        Ok(Self { year, month })
    }

    /// period a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// daily attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Late,
}

/// payroll record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// generated, still editable
    Pending,
    /// paid out; immutable until reverted
    Processed,
}

/// installment frequency of an emi plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmiFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl EmiFrequency {
    /// calendar months between installments
    pub fn months(&self) -> u32 {
        match self {
            EmiFrequency::Monthly => 1,
            EmiFrequency::Quarterly => 3,
            EmiFrequency::Yearly => 12,
        }
    }
}

/// emi plan status; `Active -> Completed` only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmiStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Cheque,
    EMandate,
    Online,
}

/// how often a class fee line is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeFrequency {
    OneTime,
    Monthly,
    Quarterly,
    Yearly,
}

/// staff member as held by the administration subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    /// monthly base salary; missing values are treated as zero
    pub base_salary: Option<Money>,
    pub join_date: NaiveDate,
    pub active: bool,
}

/// student, or an enrolled lead treated as one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub name: String,
    pub class_name: String,
    /// e.g. "2024-25"
    pub academic_year: String,
    pub is_lead: bool,
}

/// fee payment, either lump sum or attributed to an emi installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePayment {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub emi_plan_id: Option<PlanId>,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_mode: PaymentMode,
    pub installment_number: Option<u32>,
    pub status: PaymentStatus,
}

impl FeePayment {
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// completed payment claiming an installment of `plan_id`;
    /// untagged-plan installment payments count toward the student's plan
    pub fn is_installment_of(&self, plan_id: PlanId) -> bool {
        self.is_completed()
            && self.installment_number.is_some()
            && self.emi_plan_id.map_or(true, |id| id == plan_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pay_period_bounds() {
        assert!(PayPeriod::new(0, 2024).is_err());
        assert!(PayPeriod::new(13, 2024).is_err());

        let period = PayPeriod::new(3, 2024).unwrap();
        assert_eq!(period.to_string(), "2024-03");
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()));
    }

    #[test]
    fn test_attendance_status_wire_format() {
        let json = serde_json::to_string(&AttendanceStatus::HalfDay).unwrap();
        assert_eq!(json, "\"half-day\"");
    }

    #[test]
    fn test_installment_attribution() {
        let plan = Uuid::new_v4();
        let mut payment = FeePayment {
            id: Uuid::new_v4(),
            student_id: "STU-1".to_string(),
            emi_plan_id: None,
            amount: Money::from_major(1_000),
            payment_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            payment_mode: PaymentMode::Upi,
            installment_number: Some(1),
            status: PaymentStatus::Completed,
        };
        assert!(payment.is_installment_of(plan));

        payment.emi_plan_id = Some(Uuid::new_v4());
        assert!(!payment.is_installment_of(plan));

        payment.emi_plan_id = Some(plan);
        payment.status = PaymentStatus::Failed;
        assert!(!payment.is_installment_of(plan));
    }
}
