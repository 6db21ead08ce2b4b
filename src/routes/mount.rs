use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Owned by a screen; the screen counts as unmounted once this is dropped.
#[derive(Debug)]
pub(crate) struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl MountGuard {
    pub(crate) fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub(crate) fn token(&self) -> MountToken {
        MountToken {
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

/// Held by in-flight work to check whether anyone is still there to receive it.
#[derive(Clone, Debug)]
pub(crate) struct MountToken {
    mounted: Arc<AtomicBool>,
}

impl MountToken {
    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}
