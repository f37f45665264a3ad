use std::collections::BTreeMap;
use std::sync::Mutex;

use sum_task_runtime::adapters::object_store::ObjectStore;

/// Bucket-scoped in-memory store that records every write attempt.
#[derive(Default)]
pub struct MemoryBucket {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    attempts: Mutex<usize>,
}

impl MemoryBucket {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            attempts: Mutex::new(0),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .keys()
            .cloned()
            .collect()
    }

    pub fn body_text(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(key)
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }

    pub fn write_attempts(&self) -> usize {
        *self.attempts.lock().expect("poisoned mutex")
    }
}

impl ObjectStore for MemoryBucket {
    fn write_object(
        &self,
        key: &str,
        body: &[u8],
        _content_type: Option<&str>,
    ) -> Result<(), String> {
        *self.attempts.lock().expect("poisoned mutex") += 1;
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}
