//! Run async HTTP calls from the synchronous adapter traits.
#![forbid(unsafe_code)]

use std::future::Future;

use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Raised when a blocking call is made from a `current_thread` runtime,
/// which can neither be blocked in place nor host a nested runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("blocking adapter called from a current-thread Tokio runtime")]
pub(crate) struct NestedRuntime;

/// Owned current-thread runtime reused across calls.
///
/// Inside a multi-threaded Tokio runtime the caller's handle is used with
/// [`tokio::task::block_in_place`] instead. Inside a `current_thread` runtime
/// neither option is available and the call fails with [`NestedRuntime`].
pub(crate) struct BlockingRuntime {
    runtime: Runtime,
}

impl BlockingRuntime {
    pub(crate) fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> Result<F::Output, NestedRuntime> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                Ok(tokio::task::block_in_place(|| handle.block_on(future)))
            }
            Ok(_) => Err(NestedRuntime),
            Err(_) => Ok(self.runtime.block_on(future)),
        }
    }
}

impl std::fmt::Debug for BlockingRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<tokio::runtime::Runtime>")
    }
}
