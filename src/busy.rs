use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-in-flight flag shared by a feature instance.
///
/// [`try_acquire`](BusyFlag::try_acquire) hands out a [`BusyGuard`] only when
/// no other guard is alive. The flag is released when the guard drops, so an
/// aborted task never leaves the feature stuck busy.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag, or `None` if an operation is already pending.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases its [`BusyFlag`] when dropped.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire().expect("first acquire");
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[tokio::test]
    async fn aborted_task_releases_flag() {
        let flag = BusyFlag::new();
        let f = flag.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _guard = f.try_acquire().unwrap();
            let _ = rx.await;
        });
        // let the task claim the flag
        while !flag.is_busy() {
            tokio::task::yield_now().await;
        }
        handle.abort();
        let _ = handle.await;
        assert!(!flag.is_busy());
        drop(tx);
    }
}
