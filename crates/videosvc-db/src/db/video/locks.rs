use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

pub const DEFAULT_LOCK_STRIPES: usize = 16;

/// Striped per-video locks.
///
/// Read-modify-write cycles on one video take the stripe for its id, so two
/// writers on the same video never interleave. Unrelated videos share a stripe
/// only when their ids collide modulo the stripe count.
#[derive(Clone)]
pub struct VideoLocks {
    stripes: Arc<Vec<Mutex<()>>>,
}

impl VideoLocks {
    pub fn new(stripe_count: usize) -> Self {
        let stripe_count = stripe_count.max(1);
        let stripes = (0..stripe_count).map(|_| Mutex::new(())).collect();
        Self {
            stripes: Arc::new(stripes),
        }
    }

    fn stripe_index(&self, video_id: i64) -> usize {
        video_id.rem_euclid(self.stripes.len() as i64) as usize
    }

    pub async fn lock(&self, video_id: i64) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_index(video_id)].lock().await
    }
}

impl Default for VideoLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_STRIPES)
    }
}
