//! Outcome classification
//!
//! Classification reads exactly one field: the store error's numeric code.
//! Messages and labels are ignored because neither is a stable contract.

use contend_core::{ErrorCode, Outcome, OutcomeClass, StoreError, StoreResult};

/// Maps store results to outcome classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeClassifier {
    conflict_code: ErrorCode,
}

impl OutcomeClassifier {
    /// Classifier for the default write-conflict code (112)
    pub fn new() -> Self {
        Self::with_conflict_code(ErrorCode::WRITE_CONFLICT)
    }

    /// Classifier for a store that signals conflicts with another code
    pub fn with_conflict_code(conflict_code: ErrorCode) -> Self {
        Self { conflict_code }
    }

    /// Code treated as a conflict
    pub fn conflict_code(&self) -> ErrorCode {
        self.conflict_code
    }

    /// Classify an optional error
    ///
    /// - no error → success
    /// - conflict code → conflict
    /// - anything else → fatal
    pub fn classify(&self, error: Option<&StoreError>) -> OutcomeClass {
        match error {
            None => OutcomeClass::Success,
            Some(err) if err.code == self.conflict_code => OutcomeClass::Conflict,
            Some(_) => OutcomeClass::Fatal,
        }
    }

    /// Turn a store result into an outcome carrying the error description
    pub fn outcome(&self, result: &StoreResult<()>) -> Outcome {
        let error = result.as_ref().err();
        match (self.classify(error), error) {
            (OutcomeClass::Conflict, Some(err)) => Outcome::Conflict(err.to_string()),
            (OutcomeClass::Fatal, Some(err)) => Outcome::Fatal(err.to_string()),
            _ => Outcome::Success,
        }
    }
}

impl Default for OutcomeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default conflict code
pub fn classify(error: Option<&StoreError>) -> OutcomeClass {
    OutcomeClassifier::default().classify(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contend_core::TRANSIENT_TRANSACTION_ERROR;
    use proptest::prelude::*;

    #[test]
    fn test_no_error_is_success() {
        assert_eq!(classify(None), OutcomeClass::Success);
        assert_eq!(OutcomeClassifier::new().outcome(&Ok(())), Outcome::Success);
    }

    #[test]
    fn test_write_conflict_is_conflict() {
        let err = StoreError::write_conflict("task1");
        assert_eq!(classify(Some(&err)), OutcomeClass::Conflict);

        let outcome = OutcomeClassifier::new().outcome(&Err(err));
        assert_eq!(outcome.class(), OutcomeClass::Conflict);
        assert!(outcome.detail().unwrap().contains("WriteConflict"));
    }

    #[test]
    fn test_other_codes_are_fatal() {
        for err in [
            StoreError::host_unreachable("memory://localhost"),
            StoreError::no_matching_document("task1"),
            StoreError::max_time_expired(7, 0),
            StoreError::duplicate_key("task1"),
            StoreError::internal("boom"),
        ] {
            assert_eq!(classify(Some(&err)), OutcomeClass::Fatal, "{}", err);
        }
    }

    #[test]
    fn test_message_text_is_ignored() {
        let err = StoreError::new(ErrorCode::NETWORK_TIMEOUT, "WriteConflict (112)")
            .with_label(TRANSIENT_TRANSACTION_ERROR);
        assert_eq!(classify(Some(&err)), OutcomeClass::Fatal);
    }

    #[test]
    fn test_custom_conflict_code() {
        let classifier = OutcomeClassifier::with_conflict_code(ErrorCode(40001));

        let serialization_failure = StoreError::new(ErrorCode(40001), "could not serialize");
        assert_eq!(
            classifier.classify(Some(&serialization_failure)),
            OutcomeClass::Conflict
        );
        assert_eq!(
            classifier.classify(Some(&StoreError::write_conflict("k"))),
            OutcomeClass::Fatal
        );
    }

    proptest! {
        #[test]
        fn prop_conflict_code_always_conflict(message in ".*", transient in any::<bool>()) {
            let mut err = StoreError::new(ErrorCode::WRITE_CONFLICT, message);
            if transient {
                err = err.with_label(TRANSIENT_TRANSACTION_ERROR);
            }
            prop_assert_eq!(classify(Some(&err)), OutcomeClass::Conflict);
        }

        #[test]
        fn prop_other_codes_never_conflict(code in any::<i32>(), message in ".*") {
            prop_assume!(code != ErrorCode::WRITE_CONFLICT.as_i32());
            let err = StoreError::new(ErrorCode(code), message)
                .with_label(TRANSIENT_TRANSACTION_ERROR);
            prop_assert_eq!(classify(Some(&err)), OutcomeClass::Fatal);
        }
    }
}
