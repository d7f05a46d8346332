use std::{collections::HashMap, sync::Arc};

use spotbook_core::SpotId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per spot. Booking writes hold it from reading the
/// existing bookings until the new one is stored, so two overlapping
/// requests for the same spot cannot both pass the availability check.
#[derive(Default)]
pub struct SpotLocks {
    inner: Mutex<HashMap<SpotId, Arc<Mutex<()>>>>,
}

impl SpotLocks {
    pub async fn acquire(&self, spot_id: SpotId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            Arc::clone(locks.entry(spot_id).or_default())
        };

        lock.lock_owned().await
    }

    pub async fn forget(&self, spot_id: SpotId) {
        self.inner.lock().await.remove(&spot_id);
    }
}
