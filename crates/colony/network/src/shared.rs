use std::sync::Arc;

use tokio::sync::Mutex;

use crate::network::ColonyNetwork;

/// A [`ColonyNetwork`] shared between tasks.
///
/// Every closure runs with exclusive access, so concurrent callers observe
/// operations in one total order and never see a half-applied one.
#[derive(Clone)]
pub struct SharedNetwork {
    inner: Arc<Mutex<ColonyNetwork>>,
}

impl SharedNetwork {
    pub fn new(network: ColonyNetwork) -> Self {
        Self {
            inner: Arc::new(Mutex::new(network)),
        }
    }

    /// Run `f` with exclusive access.
    pub async fn transact<R>(&self, f: impl FnOnce(&mut ColonyNetwork) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }

    pub async fn read<R>(&self, f: impl FnOnce(&ColonyNetwork) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }
}
