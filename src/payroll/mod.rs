pub mod attendance;
pub mod draft;
pub mod record;
pub mod salary;

pub use attendance::{AttendanceRecord, AttendanceSummary};
pub use draft::PayrollDraft;
pub use record::PayrollRecord;
pub use salary::{
    AttendanceBasis, AttendanceSource, AttendanceToSalaryCalculator, PayrollAdjustments,
    SalaryBreakdown,
};
