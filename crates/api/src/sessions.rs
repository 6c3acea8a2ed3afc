//! In-memory wizard session registry.
//!
//! Sessions hold uploaded image bytes and generated drafts for the duration
//! of one batch creation flow. Nothing is persisted; a restart drops all
//! sessions, which matches the throwaway nature of the wizard.

use std::collections::HashMap;
use std::sync::Arc;

use faceglow_pipeline::WizardState;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Registry of live wizard sessions, keyed by session id.
///
/// Each session has its own `Mutex` so a long-running generate call on one
/// session never blocks requests touching another.
#[derive(Default)]
pub struct Sessions {
    inner: RwLock<HashMap<Uuid, Arc<Mutex<WizardState>>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(WizardState::new())));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<WizardState>>> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_remove_roundtrip() {
        let sessions = Sessions::new();
        let id = sessions.create().await;
        assert_eq!(sessions.count().await, 1);
        assert!(sessions.get(id).await.is_some());
        assert!(sessions.remove(id).await);
        assert!(sessions.get(id).await.is_none());
        assert!(!sessions.remove(id).await);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let sessions = Sessions::new();
        let a = sessions.create().await;
        let b = sessions.create().await;
        assert_ne!(a, b);

        let handle = sessions.get(a).await.unwrap();
        handle.lock().await.set_src_image(faceglow_pipeline::ImageInput {
            file_name: "selfie.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1],
        });

        let other = sessions.get(b).await.unwrap();
        assert!(other.lock().await.src_image.is_none());
    }
}
