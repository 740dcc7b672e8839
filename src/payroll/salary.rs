use serde::{Deserialize, Serialize};

use crate::config::PayrollPolicy;
use crate::decimal::Money;
use crate::types::PayPeriod;

use super::attendance::{AttendanceRecord, AttendanceSummary};

/// where the attended-day count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceSource {
    /// operator typed the days worked
    Manual,
    /// counted from attendance records
    Recorded,
    /// no records for the month, full month assumed
    Fallback,
}

/// attendance input for one staff member and month
#[derive(Debug, Clone, Copy)]
pub enum AttendanceBasis<'a> {
    /// manual "days worked" override, clamped to the working month
    Manual(i64),
    /// derive from attendance records
    Recorded {
        staff_id: &'a str,
        period: PayPeriod,
        records: &'a [AttendanceRecord],
    },
}

/// manual additions and deductions on top of attendance pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PayrollAdjustments {
    pub allowances: Money,
    pub other_deductions: Money,
}

/// result of a salary computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub base_salary: Money,
    pub working_days: u32,
    pub attended_days: u32,
    pub absent_days: u32,
    pub attendance_source: AttendanceSource,
    pub daily_rate: Money,
    pub basic_salary: Money,
    /// attendance deduction only
    pub deduction: Money,
    pub allowances: Money,
    pub other_deductions: Money,
    pub net_salary: Money,
}

impl SalaryBreakdown {
    /// attendance deduction plus manual deductions
    pub fn total_deductions(&self) -> Money {
        self.deduction + self.other_deductions
    }
}

/// converts a month of attendance into salary figures
#[derive(Debug, Clone, Default)]
pub struct AttendanceToSalaryCalculator {
    policy: PayrollPolicy,
}

impl AttendanceToSalaryCalculator {
    pub fn new(policy: PayrollPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Resolve the attended-day count.
    ///
    /// Manual overrides win. Otherwise days are counted from the records of
    /// the staff member for the period; a month with no records at all pays
    /// the full working month when the policy's fallback is on.
    pub fn attended_days(&self, basis: AttendanceBasis<'_>) -> (u32, AttendanceSource) {
        let working_days = self.policy.working_days_per_month;

        match basis {
            AttendanceBasis::Manual(days) => {
                let clamped = days.clamp(0, working_days as i64) as u32;
                (clamped, AttendanceSource::Manual)
            }
            AttendanceBasis::Recorded { staff_id, period, records } => {
                let summary = AttendanceSummary::summarize(staff_id, period, records);

                if summary.is_empty() && self.policy.full_attendance_fallback {
                    tracing::debug!(
                        staff_id,
                        period = %period,
                        "no attendance records, assuming full month"
                    );
                    return (working_days, AttendanceSource::Fallback);
                }

                let days = summary.counted_days(&self.policy).min(working_days);
                (days, AttendanceSource::Recorded)
            }
        }
    }

    /// compute salary from attendance only
    pub fn calculate(&self, base_salary: Option<Money>, basis: AttendanceBasis<'_>) -> SalaryBreakdown {
        self.calculate_with_adjustments(base_salary, basis, PayrollAdjustments::default())
    }

    /// Compute salary from attendance plus manual adjustments.
    ///
    /// `basic = base * attended / working_days`, `deduction = base - basic`,
    /// and the net equals `basic` when there are no adjustments. A missing,
    /// negative or absurdly large base salary computes as zero.
    pub fn calculate_with_adjustments(
        &self,
        base_salary: Option<Money>,
        basis: AttendanceBasis<'_>,
        adjustments: PayrollAdjustments,
    ) -> SalaryBreakdown {
        let working_days = self.policy.working_days_per_month;

        let base_salary = match base_salary {
            Some(amount) if !amount.is_negative() && amount.is_within_bounds() => amount,
            Some(amount) => {
                tracing::debug!(base_salary = %amount, "negative or out-of-range base salary treated as zero");
                Money::ZERO
            }
            None => {
                tracing::debug!("missing base salary treated as zero");
                Money::ZERO
            }
        };

        let (attended_days, attendance_source) = self.attended_days(basis);
        let absent_days = working_days - attended_days;

        let daily_rate = base_salary.prorate(1, working_days);
        let basic_salary = base_salary.prorate(attended_days, working_days);
        let deduction = base_salary - basic_salary;

        let allowances = adjustments.allowances.max(Money::ZERO);
        let other_deductions = adjustments.other_deductions.max(Money::ZERO);
        let net_salary = (basic_salary + allowances).saturating_sub(other_deductions);

        SalaryBreakdown {
            base_salary,
            working_days,
            attended_days,
            absent_days,
            attendance_source,
            daily_rate,
            basic_salary,
            deduction,
            allowances,
            other_deductions,
            net_salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttendanceStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn calculator() -> AttendanceToSalaryCalculator {
        AttendanceToSalaryCalculator::new(PayrollPolicy::default())
    }

    fn march() -> PayPeriod {
        PayPeriod::new(3, 2024).unwrap()
    }

    fn present_days(staff: &str, days: u32) -> Vec<AttendanceRecord> {
        (1..=days)
            .map(|d| AttendanceRecord {
                staff_id: staff.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
                status: AttendanceStatus::Present,
                hours_worked: dec!(8),
            })
            .collect()
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculator().calculate(Some(Money::from_major(30_000)), AttendanceBasis::Manual(25));

        assert_eq!(result.daily_rate, Money::from_major(1_000));
        assert_eq!(result.basic_salary, Money::from_major(25_000));
        assert_eq!(result.absent_days, 5);
        assert_eq!(result.deduction, Money::from_major(5_000));
        assert_eq!(result.net_salary, Money::from_major(25_000));
        assert_eq!(result.attendance_source, AttendanceSource::Manual);
    }

    #[test]
    fn test_full_and_zero_attendance() {
        let base = Some(Money::from_str_exact("31337.77").unwrap());

        let full = calculator().calculate(base, AttendanceBasis::Manual(30));
        assert_eq!(full.net_salary, base.unwrap());
        assert_eq!(full.deduction, Money::ZERO);

        let none = calculator().calculate(base, AttendanceBasis::Manual(0));
        assert_eq!(none.net_salary, Money::ZERO);
        assert_eq!(none.deduction, base.unwrap());
    }

    #[test]
    fn test_net_matches_prorated_base_for_every_day_count() {
        for base in ["0", "1000", "12345.67", "99999.99", "1"] {
            let base_money = Money::from_str_exact(base).unwrap();
            for days in 0..=30u32 {
                let result = calculator().calculate(Some(base_money), AttendanceBasis::Manual(days as i64));
                let expected = Money::from_decimal(
                    base_money.as_decimal() * rust_decimal::Decimal::from(days) / dec!(30),
                );
                assert_eq!(result.net_salary, expected, "base {} days {}", base, days);
                assert_eq!(result.basic_salary + result.deduction, base_money);
            }
        }
    }

    #[test]
    fn test_manual_days_are_clamped() {
        let base = Some(Money::from_major(30_000));

        let over = calculator().calculate(base, AttendanceBasis::Manual(45));
        assert_eq!(over.attended_days, 30);
        assert_eq!(over.net_salary, Money::from_major(30_000));

        let negative = calculator().calculate(base, AttendanceBasis::Manual(-3));
        assert_eq!(negative.attended_days, 0);
        assert_eq!(negative.absent_days, 30);
    }

    #[test]
    fn test_missing_base_salary_computes_zero() {
        let result = calculator().calculate(None, AttendanceBasis::Manual(20));
        assert_eq!(result.base_salary, Money::ZERO);
        assert_eq!(result.net_salary, Money::ZERO);

        let negative = calculator().calculate(Some(Money::from_major(-500)), AttendanceBasis::Manual(20));
        assert_eq!(negative.net_salary, Money::ZERO);
    }

    #[test]
    fn test_oversized_base_salary_computes_zero() {
        let parsed = calculator().calculate(Some(Money::parse_lenient("9e27")), AttendanceBasis::Manual(25));
        assert_eq!(parsed.net_salary, Money::ZERO);

        let stored = Money::from_decimal(rust_decimal::Decimal::from_str_exact("9000000000000000000000000000").unwrap());
        let result = calculator().calculate_with_adjustments(
            Some(stored),
            AttendanceBasis::Manual(25),
            PayrollAdjustments {
                allowances: Money::from_major(1_000),
                other_deductions: Money::ZERO,
            },
        );
        assert_eq!(result.base_salary, Money::ZERO);
        assert_eq!(result.net_salary, Money::from_major(1_000));
    }

    #[test]
    fn test_counts_present_records() {
        let records = present_days("EMP-7", 22);
        let result = calculator().calculate(
            Some(Money::from_major(30_000)),
            AttendanceBasis::Recorded { staff_id: "EMP-7", period: march(), records: &records },
        );

        assert_eq!(result.attended_days, 22);
        assert_eq!(result.attendance_source, AttendanceSource::Recorded);
        assert_eq!(result.net_salary, Money::from_major(22_000));
    }

    #[test]
    fn test_no_records_falls_back_to_full_month() {
        let records = present_days("EMP-OTHER", 10);
        let result = calculator().calculate(
            Some(Money::from_major(30_000)),
            AttendanceBasis::Recorded { staff_id: "EMP-7", period: march(), records: &records },
        );

        assert_eq!(result.attended_days, 30);
        assert_eq!(result.attendance_source, AttendanceSource::Fallback);
        assert_eq!(result.net_salary, Money::from_major(30_000));
    }

    #[test]
    fn test_records_without_present_days_pay_nothing() {
        let records = vec![AttendanceRecord {
            staff_id: "EMP-7".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            status: AttendanceStatus::Absent,
            hours_worked: dec!(0),
        }];
        let result = calculator().calculate(
            Some(Money::from_major(30_000)),
            AttendanceBasis::Recorded { staff_id: "EMP-7", period: march(), records: &records },
        );

        assert_eq!(result.attended_days, 0);
        assert_eq!(result.net_salary, Money::ZERO);
    }

    #[test]
    fn test_fallback_disabled() {
        let calc = AttendanceToSalaryCalculator::new(PayrollPolicy {
            full_attendance_fallback: false,
            ..PayrollPolicy::default()
        });
        let result = calc.calculate(
            Some(Money::from_major(30_000)),
            AttendanceBasis::Recorded { staff_id: "EMP-7", period: march(), records: &[] },
        );
        assert_eq!(result.attended_days, 0);
        assert_eq!(result.attendance_source, AttendanceSource::Recorded);
    }

    #[test]
    fn test_adjustments_apply_after_basic() {
        let result = calculator().calculate_with_adjustments(
            Some(Money::from_major(30_000)),
            AttendanceBasis::Manual(25),
            PayrollAdjustments {
                allowances: Money::from_major(2_000),
                other_deductions: Money::from_major(500),
            },
        );

        assert_eq!(result.basic_salary, Money::from_major(25_000));
        assert_eq!(result.net_salary, Money::from_major(26_500));
        assert_eq!(result.total_deductions(), Money::from_major(5_500));
    }

    #[test]
    fn test_recompute_is_identical() {
        let records = present_days("EMP-7", 17);
        let basis = AttendanceBasis::Recorded { staff_id: "EMP-7", period: march(), records: &records };

        let first = calculator().calculate(Some(Money::from_str_exact("27450.10").unwrap()), basis);
        let second = calculator().calculate(Some(Money::from_str_exact("27450.10").unwrap()), basis);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
