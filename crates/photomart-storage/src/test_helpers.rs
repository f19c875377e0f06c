//! Scriptable in-memory storage for workflow tests

use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
struct Recorded {
    objects: HashMap<String, Vec<u8>>,
    upload_order: Vec<String>,
    deleted: Vec<String>,
}

/// Storage double that keeps objects in memory.
///
/// Uploads are numbered from 1 in call order. A test can fail a given call or
/// delay individual calls to shuffle completion order.
#[derive(Clone)]
pub struct MockStorage {
    base_url: String,
    recorded: Arc<Mutex<Recorded>>,
    calls: Arc<AtomicUsize>,
    fail_on_call: Option<usize>,
    delays: Arc<Vec<Duration>>,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            base_url: "https://res.cloudinary.com/test/image".to_string(),
            recorded: Arc::new(Mutex::new(Recorded::default())),
            calls: Arc::new(AtomicUsize::new(0)),
            fail_on_call: None,
            delays: Arc::new(Vec::new()),
        }
    }

    /// Serve objects under a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fail the n-th upload call (1-based).
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Sleep before completing each upload call; index 0 is the first call.
    pub fn with_delays(mut self, delays: Vec<Duration>) -> Self {
        self.delays = Arc::new(delays);
        self
    }

    pub fn upload_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored_keys(&self) -> Vec<String> {
        let recorded = self.lock();
        recorded
            .upload_order
            .iter()
            .filter(|key| recorded.objects.contains_key(*key))
            .cloned()
            .collect()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn storage_key(&self, photographer_id: Uuid, filename: &str) -> String {
        format!("{}/{}", photographer_id, filename)
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delays.get(call - 1) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_on_call == Some(call) {
            return Err(StorageError::UploadFailed(format!(
                "mock failure on upload call {}",
                call
            )));
        }

        let key = storage_key.to_string();
        let size = data.len() as u64;
        {
            let mut recorded = self.lock();
            recorded.objects.insert(key.clone(), data);
            recorded.upload_order.push(key.clone());
        }

        Ok(StoredObject {
            url: format!("{}/upload/{}", self.base_url.trim_end_matches('/'), key),
            key,
            size,
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.lock()
            .objects
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let mut recorded = self.lock();
        recorded.objects.remove(storage_key);
        recorded.deleted.push(storage_key.to_string());
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.lock().objects.contains_key(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}
