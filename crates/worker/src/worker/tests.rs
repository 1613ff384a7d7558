use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::*;
use crate::error::CallError;
use crate::task::{Reply, package};

fn config(name: &str, shutdown: ShutdownMode) -> WorkerConfig {
	WorkerConfig {
		name: name.to_string(),
		shutdown,
		stack_size: None,
	}
}

fn spawn_counter(name: &str, shutdown: ShutdownMode) -> Worker {
	Worker::spawn(&config(name, shutdown), || Box::new(0usize) as Box<State>).expect("spawn worker")
}

fn submit<R, F>(port: &WorkerPort, op: F) -> Reply<R>
where
	R: Send + 'static,
	F: FnOnce(&mut usize) -> R + Send + 'static,
{
	let (task, rx) = package::<usize, R, F>(Arc::clone(port.name()), op);
	port.submit(task);
	rx
}

#[test]
fn runs_tasks_in_submission_order() {
	let worker = Worker::spawn(&config("ordered", ShutdownMode::Drain), || Box::new(Vec::<u32>::new()) as Box<State>).expect("spawn worker");
	let port = worker.port().clone();

	for i in 0..200u32 {
		let (task, _rx) = package::<Vec<u32>, (), _>(Arc::clone(port.name()), move |seen| seen.push(i));
		assert!(port.submit(task));
	}
	let (task, rx) = package::<Vec<u32>, Vec<u32>, _>(Arc::clone(port.name()), |seen| seen.clone());
	port.submit(task);

	let seen = rx.blocking_recv().unwrap().unwrap();
	assert_eq!(seen, (0..200).collect::<Vec<_>>());
}

#[test]
fn task_can_submit_to_its_own_worker() {
	let worker = spawn_counter("self-submit", ShutdownMode::Drain);
	let port = worker.port().clone();

	let inner_port = port.clone();
	let outer = submit(&port, move |n| {
		*n += 1;
		submit(&inner_port, |n| {
			*n += 10;
			*n
		})
	});

	let inner = outer.blocking_recv().unwrap().unwrap();
	assert_eq!(inner.blocking_recv().unwrap(), Ok(11));
}

#[test]
fn panicking_task_leaves_loop_running() {
	let worker = spawn_counter("panics", ShutdownMode::Drain);
	let port = worker.port().clone();

	let failed = submit(&port, |_| -> usize { panic!("first call fails") });
	let ok = submit(&port, |n| {
		*n += 2;
		*n
	});

	assert!(matches!(failed.blocking_recv().unwrap(), Err(CallError::Panicked { .. })));
	assert_eq!(ok.blocking_recv().unwrap(), Ok(2));
}

#[test]
fn drop_in_drain_mode_runs_queued_tasks() {
	let worker = spawn_counter("drain", ShutdownMode::Drain);
	let port = worker.port().clone();
	let ran = Arc::new(AtomicUsize::new(0));

	let _slow = submit(&port, |_| std::thread::sleep(Duration::from_millis(30)));
	let replies: Vec<_> = (0..5)
		.map(|_| {
			let ran = Arc::clone(&ran);
			submit(&port, move |_| {
				ran.fetch_add(1, Ordering::SeqCst);
			})
		})
		.collect();

	drop(worker);

	assert_eq!(ran.load(Ordering::SeqCst), 5);
	for rx in replies {
		assert_eq!(rx.blocking_recv().unwrap(), Ok(()));
	}
}

#[test]
fn drop_in_discard_mode_abandons_queued_tasks() {
	let worker = spawn_counter("discard", ShutdownMode::Discard);
	let port = worker.port().clone();
	let ran = Arc::new(AtomicUsize::new(0));

	let (started_tx, started_rx) = mpsc::channel();
	let (release_tx, release_rx) = mpsc::channel::<()>();
	let in_flight = submit(&port, move |n| {
		let _ = started_tx.send(());
		let _ = release_rx.recv();
		*n += 1;
		*n
	});
	started_rx.recv().unwrap();

	let queued: Vec<_> = (0..3)
		.map(|_| {
			let ran = Arc::clone(&ran);
			submit(&port, move |_| {
				ran.fetch_add(1, Ordering::SeqCst);
			})
		})
		.collect();

	let watcher = port.clone();
	let releaser = std::thread::spawn(move || {
		while !watcher.is_closed() {
			std::thread::sleep(Duration::from_millis(1));
		}
		let _ = release_tx.send(());
	});

	drop(worker);
	releaser.join().unwrap();

	assert_eq!(in_flight.blocking_recv().unwrap(), Ok(1), "in-flight task finishes");
	assert_eq!(ran.load(Ordering::SeqCst), 0);
	for rx in queued {
		assert!(rx.blocking_recv().is_err(), "queued task should be dropped");
	}
}

#[test]
fn submit_after_join_is_rejected() {
	let worker = spawn_counter("closed", ShutdownMode::Drain);
	let port = worker.port().clone();
	let state = worker.join().expect("join worker");
	assert_eq!(state.downcast_ref::<usize>(), Some(&0));

	let (task, rx) = package::<usize, usize, _>(Arc::clone(port.name()), |n| *n);
	assert!(!port.submit(task));
	assert!(rx.blocking_recv().is_err());
	assert!(port.is_closed());
}

#[test]
fn join_returns_mutated_state() {
	let worker = spawn_counter("state", ShutdownMode::Drain);
	let port = worker.port().clone();
	for _ in 0..4 {
		let _ = submit(&port, |n| *n += 5);
	}

	let state = worker.join().expect("join worker");
	assert_eq!(state.downcast_ref::<usize>(), Some(&20));
}

#[test]
fn spawn_reports_construction_panic() {
	let err = Worker::spawn(&config("bad-init", ShutdownMode::Drain), || -> Box<State> { panic!("no state for you") })
		.err()
		.expect("construction should fail");
	match err {
		SpawnError::Construct { name, message } => {
			assert_eq!(name, "bad-init");
			assert!(message.contains("no state for you"), "got: {message}");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn dropping_worker_on_its_own_thread_does_not_deadlock() {
	let worker = spawn_counter("self-drop", ShutdownMode::Drain);
	let port = worker.port().clone();
	let slot = Arc::new(Mutex::new(Some(worker)));

	let task_slot = Arc::clone(&slot);
	let reply = submit(&port, move |n| {
		drop(task_slot.lock().take());
		*n + 1
	});

	assert_eq!(reply.blocking_recv().unwrap(), Ok(1));
	assert!(slot.lock().is_none());
	assert!(port.is_closed());
}

#[test]
fn detached_submission_eventually_runs() {
	let worker = spawn_counter("detached", ShutdownMode::Drain);
	let port = worker.port().clone();

	let (task, rx) = package::<usize, usize, _>(Arc::clone(port.name()), |n| {
		*n += 3;
		*n
	});
	port.submit_detached(task);

	assert_eq!(rx.blocking_recv().unwrap(), Ok(3));
}
