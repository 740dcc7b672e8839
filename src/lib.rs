pub mod config;
pub mod decimal;
pub mod emi;
pub mod errors;
pub mod events;
pub mod fees;
pub mod ledger;
pub mod payroll;
pub mod repository;
pub mod types;
pub mod views;

// re-export key types
pub use config::{DraftPolicy, EmiPolicy, LedgerConfig, PayrollPolicy};
pub use decimal::{Money, Percentage};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use emi::{
    EMandate, EmiPlan, EmiProgressTracker, EmiTerms, InstallmentStatus, MandateStatus,
    PaymentProgress, PendingInstallment,
};
pub use fees::{
    EffectiveFee, FeeOutstandingAggregator, FeeSource, FeeStructure, FeeSummary, GlobalClassFee,
};
pub use ledger::Ledger;
pub use payroll::{
    AttendanceBasis, AttendanceRecord, AttendanceSource, AttendanceSummary,
    AttendanceToSalaryCalculator, PayrollAdjustments, PayrollDraft, PayrollRecord,
    SalaryBreakdown,
};
pub use repository::{
    EmiRepository, FeeRepository, InMemoryStore, PayrollRepository, StaffRepository, Store,
};
pub use types::{
    AttendanceStatus, EmiFrequency, EmiStatus, FeeFrequency, FeePayment, PayPeriod,
    PaymentMode, PaymentStatus, PayrollStatus, StaffMember, StudentProfile,
};
pub use views::{EmiPlanRequest, FeePaymentRequest, LedgerResponse, PayrollRequest};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
