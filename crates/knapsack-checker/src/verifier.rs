//! Independent check of a claimed knapsack solution.
//!
//! The verifier never runs the optimizer. It sums the weight and value of the
//! candidate's items and compares them with the capacity and the claim.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::RejectReason;
use crate::instance::{Candidate, ProblemInstance};

/// Configuration for the verifier
#[derive(Debug, Clone, Default)]
pub struct VerifierConfig {
    /// Accept candidates that pick the same item more than once
    pub allow_duplicates: bool,
}

/// Totals of an accepted candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accept {
    pub total_weight: u64,
    pub total_value: u64,
    pub items: usize,
}

/// Verify a candidate with the default (strict) configuration.
pub fn verify(instance: &ProblemInstance, candidate: &Candidate) -> Result<Accept, RejectReason> {
    verify_with_config(instance, candidate, &VerifierConfig::default())
}

/// Verify a candidate against an instance.
///
/// Index problems are reported first, then weight, then value.
pub fn verify_with_config(
    instance: &ProblemInstance,
    candidate: &Candidate,
    config: &VerifierConfig,
) -> Result<Accept, RejectReason> {
    let len = instance.len();
    let mut seen = HashSet::with_capacity(candidate.indices.len());
    let mut total_weight: u64 = 0;
    let mut total_value: u64 = 0;

    for &index in &candidate.indices {
        let item = instance
            .items
            .get(index)
            .ok_or(RejectReason::IndexOutOfRange { index, len })?;

        if !config.allow_duplicates && !seen.insert(index) {
            return Err(RejectReason::DuplicateIndex(index));
        }

        total_weight = total_weight
            .checked_add(u64::from(item.weight))
            .ok_or(RejectReason::ArithmeticOverflow)?;
        total_value = total_value
            .checked_add(u64::from(item.value))
            .ok_or(RejectReason::ArithmeticOverflow)?;
    }

    if total_weight > instance.capacity {
        return Err(RejectReason::WeightLimitExceeded(total_weight));
    }

    if total_value != candidate.claimed_value {
        return Err(RejectReason::ValueMismatch {
            claimed: candidate.claimed_value,
            actual: total_value,
        });
    }

    Ok(Accept {
        total_weight,
        total_value,
        items: candidate.indices.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Item;
    use rstest::rstest;

    fn create_classic_instance() -> ProblemInstance {
        ProblemInstance::new(
            50,
            vec![Item::new(60, 10), Item::new(100, 20), Item::new(120, 30)],
        )
    }

    #[test]
    fn test_accepts_optimal_candidate() {
        let instance = create_classic_instance();
        let accept = verify(&instance, &Candidate::new(220, [1, 2])).unwrap();
        assert_eq!(
            accept,
            Accept {
                total_weight: 50,
                total_value: 220,
                items: 2
            }
        );
    }

    #[test]
    fn test_accepts_non_optimal_but_honest_candidate() {
        // Certifies the claim, not optimality
        let instance = create_classic_instance();
        assert!(verify(&instance, &Candidate::new(60, [0])).is_ok());
        assert!(verify(&instance, &Candidate::new(0, std::iter::empty())).is_ok());
    }

    #[test]
    fn test_rejects_overweight_candidate() {
        let instance = create_classic_instance();
        assert_eq!(
            verify(&instance, &Candidate::new(220, [0, 1, 2])),
            Err(RejectReason::WeightLimitExceeded(60))
        );
    }

    #[test]
    fn test_rejects_wrong_claim() {
        let instance = create_classic_instance();
        assert_eq!(
            verify(&instance, &Candidate::new(200, [1, 2])),
            Err(RejectReason::ValueMismatch {
                claimed: 200,
                actual: 220
            })
        );
    }

    #[test]
    fn test_weight_checked_before_value() {
        let instance = create_classic_instance();
        assert_eq!(
            verify(&instance, &Candidate::new(1, [0, 1, 2])),
            Err(RejectReason::WeightLimitExceeded(60))
        );
    }

    #[rstest]
    #[case(3)]
    #[case(usize::MAX)]
    fn test_rejects_out_of_range_index(#[case] index: usize) {
        let instance = create_classic_instance();
        assert_eq!(
            verify(&instance, &Candidate::new(60, [0, index])),
            Err(RejectReason::IndexOutOfRange { index, len: 3 })
        );
    }

    #[test]
    fn test_out_of_range_with_empty_instance() {
        let instance = ProblemInstance::new(10, vec![]);
        assert_eq!(
            verify(&instance, &Candidate::new(0, [0])),
            Err(RejectReason::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_duplicates_rejected_by_default() {
        let instance = create_classic_instance();
        assert_eq!(
            verify(&instance, &Candidate::new(120, [0, 0])),
            Err(RejectReason::DuplicateIndex(0))
        );
    }

    #[test]
    fn test_duplicates_allowed_when_configured() {
        let instance = create_classic_instance();
        let config = VerifierConfig {
            allow_duplicates: true,
        };
        let accept = verify_with_config(&instance, &Candidate::new(120, [0, 0]), &config).unwrap();
        assert_eq!(accept.total_weight, 20);

        assert_eq!(
            verify_with_config(&instance, &Candidate::new(180, [0, 0, 0, 0, 0, 0]), &config),
            Err(RejectReason::WeightLimitExceeded(60))
        );
    }

    #[test]
    fn test_zero_capacity_accepts_only_weightless_picks() {
        let instance = ProblemInstance::new(0, vec![Item::new(5, 0), Item::new(5, 1)]);
        assert!(verify(&instance, &Candidate::new(5, [0])).is_ok());
        assert_eq!(
            verify(&instance, &Candidate::new(5, [1])),
            Err(RejectReason::WeightLimitExceeded(1))
        );
    }

    #[test]
    fn test_verify_is_repeatable() {
        let instance = create_classic_instance();
        let candidate = Candidate::new(200, [1, 2]);
        assert_eq!(verify(&instance, &candidate), verify(&instance, &candidate));
    }

    #[test]
    fn test_reject_messages() {
        assert_eq!(
            RejectReason::WeightLimitExceeded(60).to_string(),
            "Weight limit exceeded: 60"
        );
        assert_eq!(
            RejectReason::ValueMismatch {
                claimed: 1,
                actual: 2
            }
            .to_string(),
            "Incorrect value"
        );
    }
}
