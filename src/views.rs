//! Request and response payloads for the http layer.
//!
//! Field names are camelCase for the single-page app. Monetary request fields
//! are parsed leniently: missing or non-numeric values become zero.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::decimal::{Money, Percentage};
use crate::emi::{EmiPlan, EmiTerms, PaymentProgress, PendingInstallment};
use crate::fees::{EffectiveFee, FeeSource, FeeSummary};
use crate::payroll::{AttendanceSource, PayrollAdjustments, PayrollRecord};
use crate::types::{
    EmiFrequency, EmiStatus, PayPeriod, PaymentMode, PaymentStatus, PayrollId, PayrollStatus,
    PlanId, StaffId, StudentId,
};

fn lenient_money<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Money::from_json(&value))
}

fn lenient_money_opt<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        other => Some(Money::from_json(&other)),
    })
}

/// generate payroll / create draft
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRequest {
    pub staff_id: StaffId,
    pub month: u32,
    pub year: i32,
    /// manual days-worked override
    #[serde(default)]
    pub days_worked: Option<i64>,
    /// overrides the staff member's stored base salary
    #[serde(default, deserialize_with = "lenient_money_opt")]
    pub base_salary: Option<Money>,
    #[serde(default, deserialize_with = "lenient_money")]
    pub allowances: Money,
    #[serde(default, deserialize_with = "lenient_money")]
    pub other_deductions: Money,
}

impl PayrollRequest {
    pub fn period(&self) -> crate::errors::Result<PayPeriod> {
        PayPeriod::new(self.month, self.year)
    }

    pub fn adjustments(&self) -> PayrollAdjustments {
        PayrollAdjustments {
            allowances: self.allowances,
            other_deductions: self.other_deductions,
        }
    }
}

/// create emi plan
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlanRequest {
    pub student_id: StudentId,
    #[serde(deserialize_with = "lenient_money")]
    pub total_amount: Money,
    #[serde(default, deserialize_with = "lenient_money")]
    pub down_payment: Money,
    #[serde(default, deserialize_with = "lenient_money")]
    pub discount: Money,
    pub number_of_installments: u32,
    pub start_date: NaiveDate,
    pub frequency: EmiFrequency,
}

impl EmiPlanRequest {
    pub fn terms(&self) -> EmiTerms {
        EmiTerms {
            total_amount: self.total_amount,
            down_payment: self.down_payment,
            discount: self.discount,
            number_of_installments: self.number_of_installments,
            start_date: self.start_date,
            frequency: self.frequency,
        }
    }
}

fn completed() -> PaymentStatus {
    PaymentStatus::Completed
}

/// record fee payment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePaymentRequest {
    pub student_id: StudentId,
    #[serde(default)]
    pub emi_plan_id: Option<PlanId>,
    #[serde(deserialize_with = "lenient_money")]
    pub amount: Money,
    /// defaults to today
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub installment_number: Option<u32>,
    #[serde(default = "completed")]
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollView {
    pub id: PayrollId,
    pub staff_id: StaffId,
    pub month: u32,
    pub year: i32,
    pub base_salary: Money,
    pub daily_rate: Money,
    pub attended_days: u32,
    pub absent_days: u32,
    pub attendance_source: AttendanceSource,
    pub basic_salary: Money,
    pub allowances: Money,
    pub deductions: Money,
    pub net_salary: Money,
    pub status: PayrollStatus,
    pub generated_at: DateTime<Utc>,
}

impl From<&PayrollRecord> for PayrollView {
    fn from(record: &PayrollRecord) -> Self {
        Self {
            id: record.id,
            staff_id: record.staff_id.clone(),
            month: record.period.month,
            year: record.period.year,
            base_salary: record.breakdown.base_salary,
            daily_rate: record.breakdown.daily_rate,
            attended_days: record.attended_days,
            absent_days: record.breakdown.absent_days,
            attendance_source: record.breakdown.attendance_source,
            basic_salary: record.basic_salary,
            allowances: record.allowances,
            deductions: record.deductions,
            net_salary: record.net_salary,
            status: record.status,
            generated_at: record.generated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlanView {
    pub id: PlanId,
    pub student_id: StudentId,
    pub total_amount: Money,
    pub financed_amount: Money,
    pub number_of_installments: u32,
    pub installment_amount: Money,
    pub start_date: NaiveDate,
    pub frequency: EmiFrequency,
    pub status: EmiStatus,
}

impl From<&EmiPlan> for EmiPlanView {
    fn from(plan: &EmiPlan) -> Self {
        Self {
            id: plan.id,
            student_id: plan.student_id.clone(),
            total_amount: plan.total_amount,
            financed_amount: plan.financed_amount(),
            number_of_installments: plan.number_of_installments,
            installment_amount: plan.installment_amount,
            start_date: plan.start_date,
            frequency: plan.frequency,
            status: plan.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInstallmentView {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub overdue: bool,
}

impl From<&PendingInstallment> for PendingInstallmentView {
    fn from(pending: &PendingInstallment) -> Self {
        Self {
            installment_number: pending.installment,
            due_date: pending.due_date,
            amount: pending.amount_due,
            overdue: pending.overdue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiProgressView {
    pub plan_id: PlanId,
    pub total_amount: Money,
    pub total_paid: Money,
    pub remaining_amount: Money,
    pub paid_installments: u32,
    pub number_of_installments: u32,
    pub next_installment: Option<u32>,
    pub next_due_date: Option<NaiveDate>,
    pub completion_percentage: Percentage,
    pub is_completed: bool,
}

impl From<&PaymentProgress> for EmiProgressView {
    fn from(progress: &PaymentProgress) -> Self {
        Self {
            plan_id: progress.plan_id,
            total_amount: progress.total_amount,
            total_paid: progress.total_paid,
            remaining_amount: progress.remaining_amount,
            paid_installments: progress.paid_installments,
            number_of_installments: progress.number_of_installments,
            next_installment: progress.next_installment,
            next_due_date: progress.next_due_date,
            completion_percentage: progress.completion_percentage,
            is_completed: progress.is_completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeLineView {
    pub fee_type: String,
    pub amount: Money,
    pub overridden: bool,
}

impl From<&EffectiveFee> for FeeLineView {
    fn from(fee: &EffectiveFee) -> Self {
        Self {
            fee_type: fee.fee_type.clone(),
            amount: fee.amount,
            overridden: fee.source == FeeSource::Override,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummaryView {
    pub student_id: StudentId,
    pub class_name: String,
    pub academic_year: String,
    pub fees: Vec<FeeLineView>,
    pub total_fees: Money,
    pub total_paid: Money,
    pub outstanding: Money,
}

impl From<&FeeSummary> for FeeSummaryView {
    fn from(summary: &FeeSummary) -> Self {
        Self {
            student_id: summary.student_id.clone(),
            class_name: summary.class_name.clone(),
            academic_year: summary.academic_year.clone(),
            fees: summary.line_items.iter().map(FeeLineView::from).collect(),
            total_fees: summary.total_fees,
            total_paid: summary.total_paid,
            outstanding: summary.outstanding,
        }
    }
}

/// tagged response envelope, one variant per endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum LedgerResponse {
    Payroll(PayrollView),
    EmiPlan(EmiPlanView),
    PendingInstallments(Vec<PendingInstallmentView>),
    EmiProgress(EmiProgressView),
    FeeSummary(FeeSummaryView),
}

impl LedgerResponse {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
