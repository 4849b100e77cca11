//! Call instrumentation for cache operations.
//!
//! An [`Operation`] is a named, async unit of work. Wrappers compose around it to add
//! cross-cutting behaviour while keeping the same interface:
//!
//! - [`CountCalls`] increments a counter keyed by the operation's qualified name
//!   *before* delegating.
//! - [`CallHistory`] delegates first, then appends the call's arguments to
//!   `"{name}:inputs"` and its result to `"{name}:outputs"` in one atomic step.
//!
//! Both write into a [`KvBackend`]. A wrapper built with `detached` has no backend and
//! only delegates. [`replay`] reads the recorded history back.
//!
//! # Example
//!
//! ```ignore
//! use storekit::instrument::{CallHistory, CountCalls, replay};
//!
//! let op = CallHistory::new(CountCalls::new(my_op, kv.clone()), kv.clone());
//! op.call(("foo".into(),)).await?;
//! replay(&op, &mut std::io::stdout())?;
//! ```

use async_trait::async_trait;
use std::{fmt, io::Write};
use tracing::{debug, warn};

use crate::{
    backend::KvBackend,
    error::{StoreError, StoreResult},
    value::{to_integer, to_text},
};

/// Returns the key of the list holding the recorded inputs of an operation.
pub fn inputs_key(qualified_name: &str) -> String {
    format!("{}:inputs", qualified_name)
}

/// Returns the key of the list holding the recorded outputs of an operation.
pub fn outputs_key(qualified_name: &str) -> String {
    format!("{}:outputs", qualified_name)
}

/// A named asynchronous operation that can be wrapped by instrumentation.
///
/// The qualified name identifies the operation in the backing store, so two operations
/// sharing a name share their counter and history.
#[async_trait]
pub trait Operation: Send + Sync {
    /// The positional arguments of a call, recorded with their `Debug` rendering.
    type Args: fmt::Debug + Send + 'static;
    /// The result of a call, recorded with its `Display` rendering.
    type Output: fmt::Display + Send + 'static;

    /// Returns the name the operation is recorded under.
    fn qualified_name(&self) -> &str;

    /// Runs the operation.
    async fn call(&self, args: Self::Args) -> StoreResult<Self::Output>;
}

/// An operation that records into a key-value backend.
pub trait Instrumented: Operation {
    type Backend: KvBackend;

    /// Returns the backing store, or `None` if the operation is detached.
    fn backend(&self) -> Option<&Self::Backend>;
}

/// Counts every call of the wrapped operation.
#[derive(Debug, Clone)]
pub struct CountCalls<O, B> {
    inner: O,
    backend: Option<B>,
}

impl<O, B> CountCalls<O, B> {
    /// Wraps `inner`, counting calls in `backend`.
    pub fn new(inner: O, backend: B) -> Self {
        Self { inner, backend: Some(backend) }
    }

    /// Wraps `inner` without a backend; calls are not counted.
    pub fn detached(inner: O) -> Self {
        Self { inner, backend: None }
    }

    /// Returns the wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O, B> Operation for CountCalls<O, B>
where
    O: Operation,
    B: KvBackend,
{
    type Args = O::Args;
    type Output = O::Output;

    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    async fn call(&self, args: Self::Args) -> StoreResult<Self::Output> {
        if let Some(backend) = &self.backend {
            let count = backend.incr(self.qualified_name()).await?;
            debug!(operation = self.qualified_name(), count, "call counted");
        }

        self.inner.call(args).await
    }
}

impl<O, B> Instrumented for CountCalls<O, B>
where
    O: Operation,
    B: KvBackend,
{
    type Backend = B;

    fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }
}

/// Records the inputs and outputs of every successful call of the wrapped operation.
///
/// Both entries of a call are appended in one atomic step, so the two lists stay
/// index-aligned. A failed call records nothing. If recording itself fails, the call's
/// result is still returned and the failure is logged.
#[derive(Debug, Clone)]
pub struct CallHistory<O, B> {
    inner: O,
    backend: Option<B>,
}

impl<O, B> CallHistory<O, B> {
    /// Wraps `inner`, recording calls in `backend`.
    pub fn new(inner: O, backend: B) -> Self {
        Self { inner, backend: Some(backend) }
    }

    /// Wraps `inner` without a backend; calls are not recorded.
    pub fn detached(inner: O) -> Self {
        Self { inner, backend: None }
    }

    /// Returns the wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O, B> Operation for CallHistory<O, B>
where
    O: Operation,
    B: KvBackend,
{
    type Args = O::Args;
    type Output = O::Output;

    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    async fn call(&self, args: Self::Args) -> StoreResult<Self::Output> {
        let input = format!("{:?}", args);
        let output = self.inner.call(args).await?;

        if let Some(backend) = &self.backend {
            let name = self.qualified_name();
            // the call already happened, so a failed recording must not hide its result
            match backend
                .record_call(
                    &inputs_key(name),
                    &outputs_key(name),
                    input.as_bytes(),
                    output.to_string().as_bytes(),
                )
                .await
            {
                Ok(recorded) => debug!(operation = name, recorded, "call recorded"),
                Err(err) => warn!(operation = name, error = %err, "call not recorded"),
            }
        }

        Ok(output)
    }
}

impl<O, B> Instrumented for CallHistory<O, B>
where
    O: Operation,
    B: KvBackend,
{
    type Backend = B;

    fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }
}

/// One recorded call: the rendered arguments and the rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

/// Returns the counter of an instrumented operation.
///
/// `None` if the operation is detached or was never counted.
pub async fn call_count<O: Instrumented>(operation: &O) -> StoreResult<Option<i64>> {
    let Some(backend) = operation.backend() else {
        return Ok(None);
    };

    match backend.get(operation.qualified_name()).await? {
        Some(raw) => Ok(Some(to_integer(raw)?)),
        None => Ok(None),
    }
}

/// Returns the recorded calls of an instrumented operation, oldest first.
///
/// Empty if the operation is detached or has no history. Fails with
/// [`StoreError::InconsistentHistory`] if the inputs and outputs lists differ in length.
pub async fn call_history<O: Instrumented>(operation: &O) -> StoreResult<Vec<CallRecord>> {
    let Some(backend) = operation.backend() else {
        return Ok(Vec::new());
    };

    let name = operation.qualified_name();
    let inputs = backend.lrange(&inputs_key(name), 0, -1).await?;
    let outputs = backend.lrange(&outputs_key(name), 0, -1).await?;

    if inputs.len() != outputs.len() {
        return Err(StoreError::InconsistentHistory(format!(
            "{} has {} inputs but {} outputs",
            name,
            inputs.len(),
            outputs.len()
        )));
    }

    inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| {
            Ok(CallRecord {
                input: to_text(input)?,
                output: to_text(output)?,
            })
        })
        .collect()
}

/// Renders the history of an operation as replay lines.
///
/// The first line is `"{name} was called {n} times:"`, where `n` is the call counter when
/// present and the number of recorded calls otherwise. Each following line is
/// `"{name}{inputs} -> {output}"`. A detached operation yields no lines.
pub async fn replay_lines<O: Instrumented>(operation: &O) -> StoreResult<Vec<String>> {
    if operation.backend().is_none() {
        return Ok(Vec::new());
    }

    let name = operation.qualified_name();
    let history = call_history(operation).await?;
    let count = match call_count(operation).await? {
        Some(count) => count,
        None => history.len() as i64,
    };

    let mut lines = Vec::with_capacity(history.len() + 1);
    lines.push(format!("{} was called {} times:", name, count));
    lines.extend(
        history
            .into_iter()
            .map(|record| format!("{}{} -> {}", name, record.input, record.output)),
    );

    Ok(lines)
}

/// Writes the replay of an operation's history to `out`.
pub async fn replay<O, W>(operation: &O, out: &mut W) -> StoreResult<()>
where
    O: Instrumented,
    W: Write,
{
    for line in replay_lines(operation).await? {
        writeln!(out, "{}", line)?;
    }

    Ok(())
}
