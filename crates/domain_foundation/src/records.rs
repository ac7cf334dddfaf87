//! Deferred, restartable record queries
//!
//! [`Records`] describes a query without running it. Each call to
//! [`Records::stream`] starts a fresh execution against the backing store,
//! so the same value can be consumed any number of times. Failures surface
//! per execution, as items of the stream.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use core_kernel::StorageError;

/// One execution of a [`Records`] query
pub type RecordStream<E, Err = StorageError> = BoxStream<'static, Result<E, Err>>;

type Producer<E, Err> = dyn Fn() -> RecordStream<E, Err> + Send + Sync;

/// Lazily evaluated collection of records
pub struct Records<E, Err = StorageError> {
    producer: Arc<Producer<E, Err>>,
}

impl<E, Err> Records<E, Err>
where
    E: Send + 'static,
    Err: Send + 'static,
{
    /// Wraps a function that starts one execution each time it is called
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> RecordStream<E, Err> + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Records backed by an in-memory snapshot
    pub fn from_vec(items: Vec<E>) -> Self
    where
        E: Clone + Sync,
    {
        let items = Arc::new(items);
        Self::new(move || stream::iter(items.as_ref().clone().into_iter().map(Ok)).boxed())
    }

    /// Records that never yield anything
    pub fn empty() -> Self {
        Self::new(|| stream::empty().boxed())
    }

    /// Starts a new execution
    pub fn stream(&self) -> RecordStream<E, Err> {
        (*self.producer)()
    }

    /// Runs one execution to completion, stopping at the first failure
    pub async fn collect(&self) -> Result<Vec<E>, Err> {
        self.stream().try_collect().await
    }

    /// Converts the failures of every future execution
    pub fn map_err<Err2, F>(self, convert: F) -> Records<E, Err2>
    where
        Err2: Send + 'static,
        F: Fn(Err) -> Err2 + Send + Sync + 'static,
    {
        let convert = Arc::new(convert);
        let producer = self.producer;

        Records::new(move || {
            let convert = Arc::clone(&convert);
            (*producer)().map_err(move |error| (*convert)(error)).boxed()
        })
    }
}

impl<E, Err> Clone for Records<E, Err> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<E, Err> fmt::Debug for Records<E, Err> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records").finish_non_exhaustive()
    }
}
