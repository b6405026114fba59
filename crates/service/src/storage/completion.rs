//! Callback adaptor over the async store API.
//!
//! Mutations resolve to `Result<(), ServiceError>`; callers written against a
//! completion callback receive `None` on success or the error otherwise.

use std::future::Future;

use crate::errors::ServiceError;

/// Drive `operation` to completion and hand its outcome to `callback`.
pub async fn notify<F, C>(operation: F, callback: C)
where
    F: Future<Output = Result<(), ServiceError>>,
    C: FnOnce(Option<ServiceError>),
{
    callback(operation.await.err())
}
