use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::core::domain::command::CommandError;
use crate::core::domain::transaction::{TransactionError, TransactionWrapper};

#[derive(Debug, Error)]
pub enum TransactionOperationError {
    #[error(transparent)]
    TransactionError(#[from] TransactionError),

    #[error(transparent)]
    CommandError(#[from] CommandError),

    #[error("Operation failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait BoxedTransactionOperation: Send + Sync {
    async fn execute(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
    ) -> Result<(), TransactionOperationError>;

    #[doc(hidden)]
    fn as_chain(&self) -> Option<&OperationChain> {
        None
    }
}

pub type SharedOperation = Arc<dyn BoxedTransactionOperation>;

pub type OperationFuture<'a> = BoxFuture<'a, Result<(), TransactionOperationError>>;

/// The operation that does nothing and always succeeds. Identity for [`compose`].
pub fn empty() -> SharedOperation {
    Arc::new(OperationChain::default())
}

/// Runs `left`, then `right` if `left` succeeded.
pub fn compose(left: SharedOperation, right: SharedOperation) -> SharedOperation {
    let mut chain = OperationChain::of(left);
    match right.as_chain() {
        Some(steps) => {
            for step in steps.steps() {
                chain = chain.push(step.clone());
            }
        }
        None => chain = chain.push(right),
    }
    Arc::new(chain)
}

/// Lifts an async closure into an operation.
pub fn from_fn<F>(f: F) -> SharedOperation
where
    F: for<'a> Fn(&'a mut Box<dyn TransactionWrapper>) -> OperationFuture<'a>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnOperation(f))
}

struct ChainNode {
    step: SharedOperation,
    previous: Option<Arc<ChainNode>>,
}

impl Drop for ChainNode {
    // Unlink iteratively; the default recursive drop overflows on long chains.
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(node) = previous {
            match Arc::try_unwrap(node) {
                Ok(mut node) => previous = node.previous.take(),
                Err(_) => break,
            }
        }
    }
}

/// Ordered steps, stored newest first so that appending shares the tail.
#[derive(Clone, Default)]
pub struct OperationChain {
    last: Option<Arc<ChainNode>>,
}

impl OperationChain {
    fn of(operation: SharedOperation) -> Self {
        match operation.as_chain() {
            Some(chain) => chain.clone(),
            None => OperationChain::default().push(operation),
        }
    }

    fn push(self, step: SharedOperation) -> Self {
        Self {
            last: Some(Arc::new(ChainNode {
                step,
                previous: self.last,
            })),
        }
    }

    fn steps(&self) -> Vec<&SharedOperation> {
        let mut steps = Vec::new();
        let mut node = self.last.as_deref();
        while let Some(current) = node {
            steps.push(&current.step);
            node = current.previous.as_deref();
        }
        steps.reverse();
        steps
    }
}

#[async_trait]
impl BoxedTransactionOperation for OperationChain {
    async fn execute(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
    ) -> Result<(), TransactionOperationError> {
        for step in self.steps() {
            step.execute(transaction).await?;
        }
        Ok(())
    }

    fn as_chain(&self) -> Option<&OperationChain> {
        Some(self)
    }
}

struct FnOperation<F>(F);

#[async_trait]
impl<F> BoxedTransactionOperation for FnOperation<F>
where
    F: for<'a> Fn(&'a mut Box<dyn TransactionWrapper>) -> OperationFuture<'a> + Send + Sync,
{
    async fn execute(
        &self,
        transaction: &mut Box<dyn TransactionWrapper>,
    ) -> Result<(), TransactionOperationError> {
        (self.0)(transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::store::memory::{InMemoryStore, InMemoryTransaction};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn session() -> Box<dyn TransactionWrapper> {
        Box::new(InMemoryTransaction::new(Arc::new(InMemoryStore::new())))
    }

    fn succeeding(name: &'static str, log: &Log) -> SharedOperation {
        let log = log.clone();
        from_fn(move |_transaction| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(name);
                Ok::<(), TransactionOperationError>(())
            })
        })
    }

    fn failing(name: &'static str, log: &Log) -> SharedOperation {
        let log = log.clone();
        from_fn(move |_transaction| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(name);
                Err::<(), _>(TransactionOperationError::Failed(format!("{} failed", name)))
            })
        })
    }

    /// Runs `operation` on a fresh session, returning its outcome and the steps it touched.
    async fn run(operation: SharedOperation, log: &Log) -> (Result<(), String>, Vec<&'static str>) {
        log.lock().unwrap().clear();
        let mut transaction = session();
        let outcome = operation
            .execute(&mut transaction)
            .await
            .map_err(|e| e.to_string());
        let invoked = log.lock().unwrap().clone();
        (outcome, invoked)
    }

    #[tokio::test]
    async fn empty_succeeds_without_effect() {
        let log = Log::default();
        let (outcome, invoked) = run(empty(), &log).await;
        assert!(outcome.is_ok());
        assert!(invoked.is_empty());
    }

    #[tokio::test]
    async fn empty_is_identity_on_both_sides() {
        let log = Log::default();
        for x in [succeeding("x", &log), failing("x", &log)] {
            let expected = run(x.clone(), &log).await;
            assert_eq!(run(compose(empty(), x.clone()), &log).await, expected);
            assert_eq!(run(compose(x.clone(), empty()), &log).await, expected);
        }
    }

    #[tokio::test]
    async fn compose_is_associative() {
        let log = Log::default();
        let cases = [
            (succeeding("a", &log), succeeding("b", &log), succeeding("c", &log)),
            (failing("a", &log), succeeding("b", &log), succeeding("c", &log)),
            (succeeding("a", &log), failing("b", &log), succeeding("c", &log)),
            (succeeding("a", &log), succeeding("b", &log), failing("c", &log)),
        ];

        for (a, b, c) in cases {
            let left_nested = compose(compose(a.clone(), b.clone()), c.clone());
            let right_nested = compose(a, compose(b, c));
            assert_eq!(run(left_nested, &log).await, run(right_nested, &log).await);
        }
    }

    #[tokio::test]
    async fn compose_short_circuits_on_first_error() {
        let log = Log::default();
        let chain = compose(
            compose(succeeding("a", &log), failing("b", &log)),
            succeeding("c", &log),
        );

        let (outcome, invoked) = run(chain, &log).await;
        assert_eq!(outcome, Err("Operation failed: b failed".to_string()));
        assert_eq!(invoked, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn nested_chains_run_flat_in_order() {
        let log = Log::default();
        let inner = compose(succeeding("b", &log), succeeding("c", &log));
        let chain = compose(succeeding("a", &log), compose(inner, succeeding("d", &log)));

        let (outcome, invoked) = run(chain, &log).await;
        assert!(outcome.is_ok());
        assert_eq!(invoked, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn long_chains_execute_and_drop_without_deep_recursion() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut chain = empty();
        for _ in 0..50_000 {
            let count = count.clone();
            chain = compose(
                chain,
                from_fn(move |_transaction| {
                    count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Box::pin(async { Ok::<(), TransactionOperationError>(()) })
                }),
            );
        }

        let mut transaction = session();
        chain.execute(&mut transaction).await.unwrap();
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 50_000);

        drop(chain);
    }

    #[tokio::test]
    async fn composing_does_not_run_anything() {
        let log = Log::default();
        let _chain = compose(succeeding("a", &log), failing("b", &log));
        assert!(log.lock().unwrap().is_empty());
    }
}
