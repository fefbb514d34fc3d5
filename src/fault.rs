//! The fault taxonomy for filter and handler failures.
//!
//! Every failure a filter or handler can produce is a [`Fault`] value —
//! including panics, which dispatch catches and converts. Exception routing
//! looks handlers up by [`FaultKind`], falling back to a default that is
//! total: no fault ever escapes dispatch toward the transport.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::body::BodyError;
use crate::params::ParamError;

/// A contained filter/handler failure.
#[derive(Debug, Error)]
pub enum Fault {
    /// Missing or unconvertible path/query parameter. Expected, never fatal.
    #[error(transparent)]
    Parameter(#[from] ParamError),
    /// Body conversion failure. Expected, never fatal.
    #[error(transparent)]
    Body(#[from] BodyError),
    /// Application/domain error raised deliberately by a handler.
    #[error("{0}")]
    App(Box<dyn std::error::Error + Send + Sync>),
    /// A panic caught during filter/handler invocation.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl Fault {
    /// Wraps a domain error.
    pub fn app(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::App(cause.into())
    }

    /// The lookup key for exception routing.
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Parameter(_) => FaultKind::Parameter,
            Self::Body(_)      => FaultKind::Body,
            Self::App(_)       => FaultKind::App,
            Self::Panic(_)     => FaultKind::Panic,
        }
    }
}

/// Fault discriminant used to register exception handlers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FaultKind {
    Parameter,
    Body,
    App,
    Panic,
}

/// Runs a fallible invocation, converting a panic into [`Fault::Panic`].
///
/// `AssertUnwindSafe` is sound here: on panic the response builder the
/// closure was mutating is abandoned, never observed again.
pub(crate) fn contain<T>(f: impl FnOnce() -> Result<T, Fault>) -> Result<T, Fault> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Fault::Panic(panic_text(payload.as_ref()))),
    }
}

fn panic_text(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_passes_results_through() {
        assert_eq!(contain(|| Ok::<_, Fault>(7)).unwrap(), 7);
    }

    #[test]
    fn contain_converts_panics() {
        let fault = contain::<()>(|| panic!("boom")).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Panic);
        assert!(fault.to_string().contains("boom"));
    }

    #[test]
    fn conversions_feed_question_mark() {
        fn inner() -> Result<u64, Fault> {
            let p = crate::Params::new();
            Ok(p.mandatory::<u64>("id")?)
        }
        assert_eq!(inner().unwrap_err().kind(), FaultKind::Parameter);
    }
}
