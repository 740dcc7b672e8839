//! Effective fee resolution.
//!
//! Precedence: a per-student [`FeeStructure`] override for a fee type
//! replaces every class-wide [`GlobalClassFee`] line of that fee type. Fee
//! types the student has not overridden come from the class template.
//! Resolution runs in two explicit steps: [`applicable_class_fees`] selects
//! the template lines for the class and year, then [`resolve_effective_fees`]
//! layers the overrides on top. Each fee type yields exactly one line; when
//! a student has several overrides for the same fee type the last one wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{FeeFrequency, StudentId};

/// class-wide fee template line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalClassFee {
    pub id: Uuid,
    pub class_name: String,
    pub fee_type: String,
    pub amount: Money,
    pub frequency: FeeFrequency,
    pub academic_year: String,
    pub is_active: bool,
}

/// explicit per-student fee for one fee type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub student_id: StudentId,
    pub fee_type: String,
    pub amount: Money,
    pub academic_year: String,
}

/// where an effective fee line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeSource {
    Override,
    ClassTemplate,
}

/// fee line that applies to a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveFee {
    pub fee_type: String,
    pub amount: Money,
    pub source: FeeSource,
}

/// fee types and class names compare trimmed and case-insensitively
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// step one: active template lines for the class and academic year
pub fn applicable_class_fees<'a>(
    class_name: &str,
    academic_year: &str,
    globals: &'a [GlobalClassFee],
) -> Vec<&'a GlobalClassFee> {
    let class_key = normalize_key(class_name);
    let year_key = academic_year.trim();

    globals
        .iter()
        .filter(|fee| {
            fee.is_active
                && normalize_key(&fee.class_name) == class_key
                && fee.academic_year.trim() == year_key
        })
        .collect()
}

/// Step two: overrides first, then every template line whose fee type was
/// not overridden. Overrides keep the position of their fee type's first
/// occurrence; order within each group is preserved.
pub fn resolve_effective_fees(
    overrides: &[FeeStructure],
    class_fees: &[&GlobalClassFee],
) -> Vec<EffectiveFee> {
    let mut overridden: HashMap<String, usize> = HashMap::new();
    let mut explicit: Vec<EffectiveFee> = Vec::new();

    for o in overrides {
        let line = EffectiveFee {
            fee_type: o.fee_type.trim().to_string(),
            amount: o.amount,
            source: FeeSource::Override,
        };
        match overridden.get(&normalize_key(&o.fee_type)) {
            Some(&index) => {
                tracing::debug!(
                    student_id = %o.student_id,
                    fee_type = %line.fee_type,
                    "repeated fee override, last one wins"
                );
                explicit[index] = line;
            }
            None => {
                overridden.insert(normalize_key(&o.fee_type), explicit.len());
                explicit.push(line);
            }
        }
    }

    let inherited = class_fees
        .iter()
        .filter(|fee| !overridden.contains_key(&normalize_key(&fee.fee_type)))
        .map(|fee| EffectiveFee {
            fee_type: fee.fee_type.trim().to_string(),
            amount: fee.amount,
            source: FeeSource::ClassTemplate,
        });

    explicit.into_iter().chain(inherited).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(class: &str, fee_type: &str, amount: i64, year: &str, active: bool) -> GlobalClassFee {
        GlobalClassFee {
            id: Uuid::new_v4(),
            class_name: class.to_string(),
            fee_type: fee_type.to_string(),
            amount: Money::from_major(amount),
            frequency: FeeFrequency::Yearly,
            academic_year: year.to_string(),
            is_active: active,
        }
    }

    fn structure(fee_type: &str, amount: i64) -> FeeStructure {
        FeeStructure {
            student_id: "STU-1".to_string(),
            fee_type: fee_type.to_string(),
            amount: Money::from_major(amount),
            academic_year: "2024-25".to_string(),
        }
    }

    #[test]
    fn test_applicable_class_fees_filter() {
        let globals = vec![
            global("Class 10", "tuition", 5_000, "2024-25", true),
            global("class 10 ", "transport", 1_200, "2024-25", true),
            global("Class 10", "lab", 800, "2024-25", false),
            global("Class 10", "tuition", 4_500, "2023-24", true),
            global("Class 9", "tuition", 4_000, "2024-25", true),
        ];

        let fees = applicable_class_fees("Class 10", "2024-25", &globals);
        let types: Vec<&str> = fees.iter().map(|f| f.fee_type.as_str()).collect();
        assert_eq!(types, vec!["tuition", "transport"]);
    }

    #[test]
    fn test_override_shadows_same_fee_type() {
        let globals = vec![
            global("Class 10", "Tuition", 5_000, "2024-25", true),
            global("Class 10", "transport", 1_200, "2024-25", true),
        ];
        let class_fees = applicable_class_fees("Class 10", "2024-25", &globals);

        let effective = resolve_effective_fees(&[structure("tuition", 4_000)], &class_fees);

        assert_eq!(
            effective,
            vec![
                EffectiveFee {
                    fee_type: "tuition".to_string(),
                    amount: Money::from_major(4_000),
                    source: FeeSource::Override,
                },
                EffectiveFee {
                    fee_type: "transport".to_string(),
                    amount: Money::from_major(1_200),
                    source: FeeSource::ClassTemplate,
                },
            ]
        );
    }

    #[test]
    fn test_repeated_override_keeps_last() {
        let globals = vec![
            global("Class 10", "tuition", 5_000, "2024-25", true),
            global("Class 10", "lab", 800, "2024-25", true),
        ];
        let class_fees = applicable_class_fees("Class 10", "2024-25", &globals);
        let overrides = vec![
            structure("tuition", 4_000),
            structure("hostel", 9_000),
            structure(" Tuition ", 3_500),
        ];

        let effective = resolve_effective_fees(&overrides, &class_fees);

        let lines: Vec<(&str, Money)> = effective.iter().map(|f| (f.fee_type.as_str(), f.amount)).collect();
        assert_eq!(
            lines,
            vec![
                ("Tuition", Money::from_major(3_500)),
                ("hostel", Money::from_major(9_000)),
                ("lab", Money::from_major(800)),
            ]
        );
    }

    #[test]
    fn test_override_without_template_line_is_kept() {
        let effective = resolve_effective_fees(&[structure("hostel", 9_000)], &[]);
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].source, FeeSource::Override);
    }
}
