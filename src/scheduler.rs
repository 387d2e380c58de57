// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crossbeam_channel::{RecvTimeoutError, Sender};
use log::{trace, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
    time::Duration,
};

enum TaskInput {
    Stop,
}

/// [RepeatingTask] calls a function on its own thread, waiting however long
/// the function's previous call asked for before calling it again. The
/// function returns `Some(delay)` to be called again after `delay`, or `None`
/// to finish.
///
/// Once [RepeatingTask::stop] returns, the function will not be called again.
/// Dropping the task stops it.
#[derive(Debug)]
pub struct RepeatingTask {
    sender: Option<Sender<TaskInput>>,
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}
impl RepeatingTask {
    pub fn spawn<F>(initial_delay: Duration, mut f: F) -> Self
    where
        F: FnMut() -> Option<Duration> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            let mut delay = initial_delay;
            loop {
                match receiver.recv_timeout(delay) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(next_delay) = f() {
                            delay = next_delay;
                        } else {
                            trace!("repeating task finished on its own");
                            break;
                        }
                    }
                    Ok(TaskInput::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            thread_running.store(false, Ordering::SeqCst);
        });
        Self {
            sender: Some(sender),
            handle: Some(handle),
            running,
        }
    }

    /// Whether the function might still be called.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Cancels any pending call and waits for a call in progress to finish.
    /// Calling this from inside the task's own function only cancels; it
    /// can't wait for itself.
    pub fn stop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(TaskInput::Stop);
        }
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() != std::thread::current().id() {
                if handle.join().is_err() {
                    warn!("repeating task's function panicked");
                }
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }
}
impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_ge;
    use std::{sync::atomic::AtomicUsize, thread::sleep, time::Instant};

    fn wait_until_stopped(task: &RepeatingTask) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while task.is_running() && Instant::now() < deadline {
            sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn runs_until_function_says_stop() {
        let count = Arc::new(AtomicUsize::default());
        let task_count = Arc::clone(&count);
        let task = RepeatingTask::spawn(Duration::ZERO, move || {
            if task_count.fetch_add(1, Ordering::SeqCst) + 1 < 5 {
                Some(Duration::from_millis(1))
            } else {
                None
            }
        });
        wait_until_stopped(&task);
        assert!(!task.is_running());
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn stopping_cancels_pending_calls() {
        let count = Arc::new(AtomicUsize::default());
        let task_count = Arc::clone(&count);
        let mut task = RepeatingTask::spawn(Duration::from_secs(60), move || {
            task_count.fetch_add(1, Ordering::SeqCst);
            Some(Duration::from_secs(60))
        });
        assert!(task.is_running());
        let start = Instant::now();
        task.stop();
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(!task.is_running());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn nothing_runs_after_stop_returns() {
        let count = Arc::new(AtomicUsize::default());
        let task_count = Arc::clone(&count);
        let mut task = RepeatingTask::spawn(Duration::ZERO, move || {
            task_count.fetch_add(1, Ordering::SeqCst);
            Some(Duration::from_millis(1))
        });
        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            sleep(Duration::from_millis(1));
        }
        task.stop();
        let at_stop = count.load(Ordering::SeqCst);
        assert_ge!(at_stop, 3);
        sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), at_stop);

        // Stopping twice is harmless.
        task.stop();
        assert!(!task.is_running());
    }

    #[test]
    fn panicking_function_stops_quietly() {
        let mut task = RepeatingTask::spawn(Duration::ZERO, || panic!("tick failed"));
        task.stop();
        assert!(!task.is_running());
        task.stop();
    }

    #[test]
    fn dropping_stops_the_task() {
        let count = Arc::new(AtomicUsize::default());
        let task_count = Arc::clone(&count);
        {
            let _task = RepeatingTask::spawn(Duration::from_millis(50), move || {
                task_count.fetch_add(1, Ordering::SeqCst);
                Some(Duration::from_millis(50))
            });
        }
        sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
