use std::sync::OnceLock;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("solo-worker-helper")
			.build()
			.expect("failed to build solo-worker helper tokio runtime")
	});
	runtime.handle().clone()
}

/// Runs `f` as a fire-and-forget job on the helper pool.
///
/// Uses the ambient Tokio runtime when one is entered, otherwise a lazily
/// built process-global one. The job is detached; nothing waits for it.
pub(crate) fn spawn_detached<F>(actor: &str, f: F)
where
	F: FnOnce() + Send + 'static,
{
	tracing::trace!(actor, "worker.spawn_detached");
	drop(runtime_handle().spawn_blocking(f));
}

/// Spawns a dedicated named OS thread for one worker loop.
pub(crate) fn spawn_named_thread<F, R>(name: &str, stack_size: Option<usize>, f: F) -> std::io::Result<std::thread::JoinHandle<R>>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(thread = name, ?stack_size, "worker.spawn_named_thread");
	let mut builder = std::thread::Builder::new().name(name.to_string());
	if let Some(size) = stack_size {
		builder = builder.stack_size(size);
	}
	builder.spawn(f)
}
