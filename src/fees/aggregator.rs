use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{FeePayment, StudentId, StudentProfile};

use super::resolution::{
    applicable_class_fees, resolve_effective_fees, EffectiveFee, FeeStructure, GlobalClassFee,
};

/// what a student owes for an academic year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSummary {
    pub student_id: StudentId,
    pub class_name: String,
    pub academic_year: String,
    pub line_items: Vec<EffectiveFee>,
    pub total_fees: Money,
    pub total_paid: Money,
    /// never negative; overpayment is absorbed
    pub outstanding: Money,
}

/// sums effective fees against a student's payments
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeOutstandingAggregator;

impl FeeOutstandingAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Compute totals for `student` in `academic_year`.
    ///
    /// Payments are pooled: every completed payment by the student counts
    /// toward `total_paid` whatever it was for.
    pub fn summarize(
        &self,
        student: &StudentProfile,
        academic_year: &str,
        overrides: &[FeeStructure],
        globals: &[GlobalClassFee],
        payments: &[FeePayment],
    ) -> FeeSummary {
        let overrides: Vec<FeeStructure> = overrides
            .iter()
            .filter(|o| o.student_id == student.id && o.academic_year.trim() == academic_year.trim())
            .cloned()
            .collect();

        let class_fees = applicable_class_fees(&student.class_name, academic_year, globals);
        let line_items = resolve_effective_fees(&overrides, &class_fees);

        let total_fees: Money = line_items.iter().map(|item| item.amount).sum();
        let total_paid: Money = payments
            .iter()
            .filter(|p| p.student_id == student.id && p.is_completed())
            .map(|p| p.amount)
            .sum();

        let outstanding = total_fees.saturating_sub(total_paid);
        if total_paid > total_fees {
            tracing::debug!(
                student_id = %student.id,
                total_fees = %total_fees,
                total_paid = %total_paid,
                "payments exceed fees, outstanding floored at zero"
            );
        }

        FeeSummary {
            student_id: student.id.clone(),
            class_name: student.class_name.clone(),
            academic_year: academic_year.trim().to_string(),
            line_items,
            total_fees,
            total_paid,
            outstanding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeeFrequency, PaymentMode, PaymentStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn student() -> StudentProfile {
        StudentProfile {
            id: "STU-10".to_string(),
            name: "Asha".to_string(),
            class_name: "Class 10".to_string(),
            academic_year: "2024-25".to_string(),
            is_lead: false,
        }
    }

    fn tuition(amount: i64) -> GlobalClassFee {
        GlobalClassFee {
            id: Uuid::new_v4(),
            class_name: "Class 10".to_string(),
            fee_type: "tuition".to_string(),
            amount: Money::from_major(amount),
            frequency: FeeFrequency::Yearly,
            academic_year: "2024-25".to_string(),
            is_active: true,
        }
    }

    fn paid(student_id: &str, amount: i64, status: PaymentStatus) -> FeePayment {
        FeePayment {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            emi_plan_id: None,
            amount: Money::from_major(amount),
            payment_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            payment_mode: PaymentMode::Cash,
            installment_number: None,
            status,
        }
    }

    #[test]
    fn test_template_fee_without_payments() {
        let summary = FeeOutstandingAggregator::new().summarize(&student(), "2024-25", &[], &[tuition(5_000)], &[]);

        assert_eq!(summary.total_fees, Money::from_major(5_000));
        assert_eq!(summary.total_paid, Money::ZERO);
        assert_eq!(summary.outstanding, Money::from_major(5_000));
    }

    #[test]
    fn test_overpayment_floors_outstanding() {
        let payments = vec![paid("STU-10", 6_000, PaymentStatus::Completed)];
        let summary = FeeOutstandingAggregator::new().summarize(&student(), "2024-25", &[], &[tuition(5_000)], &payments);

        assert_eq!(summary.total_paid, Money::from_major(6_000));
        assert_eq!(summary.outstanding, Money::ZERO);
    }

    #[test]
    fn test_override_wins() {
        let overrides = vec![FeeStructure {
            student_id: "STU-10".to_string(),
            fee_type: "tuition".to_string(),
            amount: Money::from_major(4_000),
            academic_year: "2024-25".to_string(),
        }];
        let summary = FeeOutstandingAggregator::new().summarize(&student(), "2024-25", &overrides, &[tuition(5_000)], &[]);

        assert_eq!(summary.line_items.len(), 1);
        assert_eq!(summary.total_fees, Money::from_major(4_000));
    }

    #[test]
    fn test_overrides_for_other_students_ignored() {
        let overrides = vec![FeeStructure {
            student_id: "STU-11".to_string(),
            fee_type: "tuition".to_string(),
            amount: Money::from_major(1),
            academic_year: "2024-25".to_string(),
        }];
        let summary = FeeOutstandingAggregator::new().summarize(&student(), "2024-25", &overrides, &[tuition(5_000)], &[]);
        assert_eq!(summary.total_fees, Money::from_major(5_000));
    }

    #[test]
    fn test_no_fees_means_nothing_outstanding() {
        let payments = vec![paid("STU-10", 2_000, PaymentStatus::Completed)];
        let summary = FeeOutstandingAggregator::new().summarize(&student(), "2024-25", &[], &[], &payments);

        assert_eq!(summary.total_fees, Money::ZERO);
        assert_eq!(summary.outstanding, Money::ZERO);
        assert!(summary.line_items.is_empty());
    }

    #[test]
    fn test_only_own_completed_payments_count() {
        let payments = vec![
            paid("STU-10", 1_000, PaymentStatus::Completed),
            paid("STU-10", 1_500, PaymentStatus::Failed),
            paid("STU-10", 700, PaymentStatus::Pending),
            paid("STU-99", 3_000, PaymentStatus::Completed),
        ];
        let summary = FeeOutstandingAggregator::new().summarize(&student(), "2024-25", &[], &[tuition(5_000)], &payments);

        assert_eq!(summary.total_paid, Money::from_major(1_000));
        assert_eq!(summary.outstanding, Money::from_major(4_000));
    }
}
