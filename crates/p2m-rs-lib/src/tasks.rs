//! Bounded parallel fan-out over independent items.

use std::future::Future;

use tokio::task::JoinSet;

/// Runs `task` for every item with at most `limit` tasks in flight.
///
/// Results come back in completion order. The first error stops new tasks from being started,
/// tasks already running are awaited and their results dropped, then the error is returned.
pub async fn process_in_parallel<T, R, F, Fut>(items: impl IntoIterator<Item = T>, limit: usize, task: F) -> crate::Result<Vec<R>>
where
	T: Send + 'static,
	R: Send + 'static,
	F: Fn(T) -> Fut,
	Fut: Future<Output = crate::Result<R>> + Send + 'static,
{
	let limit = limit.max(1);
	let mut items = items.into_iter();
	let mut set = JoinSet::new();
	let mut results = Vec::new();
	let mut first_error: Option<crate::Error> = None;

	loop {
		while first_error.is_none() && set.len() < limit {
			match items.next() {
				Some(item) => { set.spawn(task(item)); },
				None => break,
			}
		}

		let outcome = match set.join_next().await {
			Some(joined) => joined.map_err(crate::Error::from).and_then(|r| r),
			None => break,
		};

		match outcome {
			Ok(r) if first_error.is_none() => results.push(r),
			Ok(_) => {},
			Err(e) if first_error.is_none() => {
				log::debug!("Task failed, waiting for {} running tasks before stopping: {}", set.len(), e);
				first_error = Some(e);
			},
			Err(e) => log::debug!("Discarding error after batch failure: {}", e),
		}
	}

	match first_error {
		Some(e) => Err(e),
		None => Ok(results),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[tokio::test]
	async fn parallel_processes_every_item() {
		let mut results = process_in_parallel(0..20u32, 4, |i| async move { Ok(i * 2) }).await.unwrap();
		results.sort();
		assert_eq!(results, (0..20u32).map(|i| i * 2).collect::<Vec<_>>());
	}

	#[tokio::test]
	async fn parallel_respects_limit() {
		let running = Arc::new(AtomicUsize::new(0));
		let peak = Arc::new(AtomicUsize::new(0));

		process_in_parallel(0..16, 3, |_| {
			let running = running.clone();
			let peak = peak.clone();
			async move {
				let now = running.fetch_add(1, Ordering::SeqCst) + 1;
				peak.fetch_max(now, Ordering::SeqCst);
				tokio::time::sleep(std::time::Duration::from_millis(5)).await;
				running.fetch_sub(1, Ordering::SeqCst);
				Ok(())
			}
		}).await.unwrap();

		assert!(peak.load(Ordering::SeqCst) <= 3);
	}

	#[tokio::test]
	async fn parallel_stops_on_first_error() {
		let started = Arc::new(AtomicUsize::new(0));

		let res = process_in_parallel(0..100, 1, |i| {
			let started = started.clone();
			async move {
				started.fetch_add(1, Ordering::SeqCst);
				if i == 2 {
					Err(crate::Error::Validation(format!("item {}", i)))
				} else {
					Ok(i)
				}
			}
		}).await;

		assert!(matches!(res, Err(crate::Error::Validation(ref m)) if m == "item 2"));
		assert_eq!(started.load(Ordering::SeqCst), 3);
	}
}
