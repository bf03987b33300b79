use std::sync::PoisonError;

use crate::SortError;

use super::context::{FirstError, PipelineContext};

/// Record a stage failure and abort the run. The first error is kept; later ones are only logged,
/// since they are usually knock-on effects of the abort.
pub fn fail_pipeline(ctx: &PipelineContext, err: SortError) {
    {
        let mut slot = ctx
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            None => {
                log::debug!("pipeline aborting: {}", err);
                *slot = Some(err);
            }
            Some(_) => log::debug!("suppressed error after abort: {}", err),
        }
    }
    ctx.stop.abort.cancel();
}

/// Take the recorded error, if any. Call after joining every stage thread.
pub fn take_first_error(first_error: &FirstError) -> Option<SortError> {
    first_error
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::SortDirective;

    #[test]
    fn test_first_error_wins_and_aborts() {
        let ctx = PipelineContext::new(
            "/tmp".into(),
            SortDirective::default(),
            CancelToken::new(),
        );
        fail_pipeline(&ctx, SortError::Usage("first".to_string()));
        fail_pipeline(&ctx, SortError::Usage("second".to_string()));
        assert!(ctx.stop.abort.is_cancelled());
        assert!(!ctx.stop.cancel.is_cancelled());
        match take_first_error(&ctx.first_error) {
            Some(SortError::Usage(msg)) => assert_eq!(msg, "first"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(take_first_error(&ctx.first_error).is_none());
    }
}
