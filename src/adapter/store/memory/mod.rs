//! Transactional in-process store. Understands `INSERT INTO` only; the first
//! value of a row is its primary key, claimed by the INSERT that stages it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::core::domain::context::ExecutionContext;
use crate::core::domain::transaction::{ToSql, TransactionError, TransactionWrapper};
use crate::core::domain::transaction_manager::{
    run_in_transaction, TransactionManager, TransactionManagerError,
};
use crate::core::domain::transaction_operation::BoxedTransactionOperation;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlValue {
    Int(i32),
    Text(String),
}

impl SqlValue {
    fn from_param(param: &dyn ToSql) -> Result<Self, TransactionError> {
        if let Some(value) = param.as_i32() {
            Ok(SqlValue::Int(value))
        } else if let Some(value) = param.as_string() {
            Ok(SqlValue::Text(value))
        } else {
            Err(TransactionError::BindError(format!(
                "Unsupported parameter type: {:?}",
                param
            )))
        }
    }
}

pub type Row = Vec<SqlValue>;

type Key = (String, SqlValue);

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<String, Vec<Row>>,
    keys: HashSet<Key>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows of `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables().rows.get(table).cloned().unwrap_or_default()
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    // Every update under the lock is a single insert or removal, so a
    // poisoned lock still guards consistent data.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `key` for a pending insert; false if committed or claimed already.
    fn claim(&self, key: Key) -> bool {
        self.tables().keys.insert(key)
    }

    fn release(&self, staged: Vec<(Key, Row)>) {
        let mut tables = self.tables();
        for (key, _) in staged {
            tables.keys.remove(&key);
        }
    }

    fn apply(&self, staged: Vec<(Key, Row)>) {
        let mut tables = self.tables();
        for ((table, _), row) in staged {
            tables.rows.entry(table).or_default().push(row);
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
    }
}

fn duplicate_key(table: &str) -> String {
    format!(
        "duplicate key value violates unique constraint \"{}_pkey\"",
        table
    )
}

fn insert_target(query: &str) -> Option<&str> {
    let mut words = query.split_whitespace();
    if !words.next()?.eq_ignore_ascii_case("insert") || !words.next()?.eq_ignore_ascii_case("into")
    {
        return None;
    }
    words
        .next()
        .map(|table| table.split('(').next().unwrap_or(table))
        .filter(|table| !table.is_empty())
}

/// A session on an [`InMemoryStore`].
pub struct InMemoryTransaction {
    store: Arc<InMemoryStore>,
    staged: Vec<(Key, Row)>,
}

impl InMemoryTransaction {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        // Abandoned without commit or rollback.
        if !self.staged.is_empty() {
            self.store.release(std::mem::take(&mut self.staged));
        }
    }
}

#[async_trait]
impl TransactionWrapper for InMemoryTransaction {
    async fn execute(
        &mut self,
        query: &str,
        params: Vec<Box<dyn ToSql>>,
    ) -> Result<(), TransactionError> {
        let table = insert_target(query).ok_or_else(|| {
            TransactionError::ExecutionError(format!("Unsupported statement: {}", query))
        })?;

        let row = params
            .iter()
            .map(|param| SqlValue::from_param(param.as_ref()))
            .collect::<Result<Row, _>>()?;
        let key = match row.first() {
            Some(value) => (table.to_string(), value.clone()),
            None => {
                return Err(TransactionError::ExecutionError(format!(
                    "Missing primary key: {}",
                    query
                )))
            }
        };

        if !self.store.claim(key.clone()) {
            return Err(TransactionError::ExecutionError(duplicate_key(table)));
        }
        self.staged.push((key, row));
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), TransactionError> {
        self.store.release(std::mem::take(&mut self.staged));
        self.store.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), TransactionError> {
        self.store.apply(std::mem::take(&mut self.staged));
        Ok(())
    }
}

pub struct InMemoryTransactionManager {
    store: Arc<InMemoryStore>,
}

impl InMemoryTransactionManager {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        operation: &dyn BoxedTransactionOperation,
    ) -> Result<(), TransactionManagerError> {
        tracing::debug!("in-memory transaction started");
        let transaction: Box<dyn TransactionWrapper> =
            Box::new(InMemoryTransaction::new(self.store.clone()));
        run_in_transaction(ctx, transaction, operation).await
    }
}
