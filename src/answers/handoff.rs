//! One-shot handoff of override answers
//!
//! A configurator (file loader, web editor, prompt) produces the override map
//! once; the run awaits it once before dispatching. Dropping the sender
//! without resolving yields an empty map so the run falls back to synthesis.

use super::OverrideMap;
use tokio::sync::oneshot;

/// Configurator side of the handoff
#[derive(Debug)]
pub struct OverrideSender {
    tx: oneshot::Sender<OverrideMap>,
}

/// Dispatcher side of the handoff
#[derive(Debug)]
pub struct OverrideReceiver {
    rx: oneshot::Receiver<OverrideMap>,
}

/// Creates a connected sender/receiver pair
pub fn override_handoff() -> (OverrideSender, OverrideReceiver) {
    let (tx, rx) = oneshot::channel();
    (OverrideSender { tx }, OverrideReceiver { rx })
}

impl OverrideSender {
    /// Resolves the handoff; consumes the sender so it can only happen once
    ///
    /// Returns `false` if the receiver was already dropped.
    pub fn resolve(self, overrides: OverrideMap) -> bool {
        self.tx.send(overrides.without_random_sentinels()).is_ok()
    }
}

impl OverrideReceiver {
    /// Waits for the configurator to resolve the handoff
    pub async fn wait(self) -> OverrideMap {
        match self.rx.await {
            Ok(overrides) => overrides,
            Err(_) => {
                tracing::warn!("Override configurator closed without answers, using random generation");
                OverrideMap::new()
            }
        }
    }
}
