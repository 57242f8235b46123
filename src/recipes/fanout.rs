use std::future::Future;

use futures_util::future::join_all;

/// Runs `op` for every input concurrently and keeps the successful outputs
/// in input order. Each call gets its own result slot; failures leave their
/// slot empty and are compacted away. No fail-fast, no retry.
pub async fn collect_ok<I, F, Fut, T, E>(inputs: I, op: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let slots = join_all(inputs.into_iter().map(op)).await;
    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(error = %e, "fan-out call dropped");
                None
            }
        })
        .collect()
}
