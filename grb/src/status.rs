//! Status translation with logging
//!
//! Every engine call in this crate goes through one of these helpers, so
//! the three-tier split (sentinel, API error, execution error) is applied
//! and logged in one place.

use grb_core::{EngineResult, ExecutionError, GrbError, Info, Outcome, Result, Status};
use tracing::{debug, error};

#[cold]
fn abort(call: &'static str, err: ExecutionError) -> ! {
    error!(call, %err, "engine execution error");
    panic!("GraphBLAS execution error: {err}")
}

/// Translate a status into an outcome or an API error
///
/// Panics on execution errors.
pub(crate) fn check(info: Info, call: &'static str) -> Result<Outcome> {
    match info.classify() {
        Status::Outcome(outcome) => Ok(outcome),
        Status::Api(err) => {
            debug!(call, %err, "engine call rejected");
            Err(err)
        }
        Status::Execution(err) => abort(call, err),
    }
}

/// Like [`check`], for calls where any sentinel means success
pub(crate) fn ok(info: Info, call: &'static str) -> Result<()> {
    check(info, call).map(drop)
}

/// Unwrap a creating call
pub(crate) fn value<T>(result: EngineResult<T>, call: &'static str) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        // a creating call that reports a sentinel produced nothing
        Err(info) => {
            check(info, call)?;
            Err(GrbError::NullPointer)
        }
    }
}

/// Translate a cursor movement; only sentinels are expected
pub(crate) fn movement(info: Info, call: &'static str) -> Outcome {
    match info.classify() {
        Status::Outcome(outcome) => outcome,
        Status::Api(err) => {
            error!(call, %err, "cursor movement rejected");
            panic!("unexpected API error from cursor movement: {err}")
        }
        Status::Execution(err) => abort(call, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_pass_through() {
        assert_eq!(check(Info::NoValue, "test"), Ok(Outcome::NoValue));
        assert_eq!(check(Info::Exhausted, "test"), Ok(Outcome::Exhausted));
        assert_eq!(ok(Info::Success, "test"), Ok(()));
    }

    #[test]
    fn test_api_errors_are_returned() {
        assert_eq!(check(Info::DomainMismatch, "test"), Err(GrbError::DomainMismatch));
        assert_eq!(value::<u8>(Err(Info::InvalidIndex), "test"), Err(GrbError::InvalidIndex));
        assert_eq!(value(Ok(3u8), "test"), Ok(3));
    }

    #[test]
    #[should_panic(expected = "GraphBLAS execution error: Out of memory")]
    fn test_execution_errors_abort() {
        let _ = check(Info::OutOfMemory, "test");
    }

    #[test]
    #[should_panic(expected = "unexpected API error")]
    fn test_movement_rejects_api_errors() {
        movement(Info::InvalidValue, "test");
    }
}
