use std::sync::{
    atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use gallery_backend::image_storage::{
    new_upload_key, ImageStorageError, ImageStorageResult, ImageStore, ObjectUrlBuilder,
    StagedUpload, StoredImage,
};

/// Object as held by the in-memory store
#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory stand-in for the bucket
///
/// Keeps insertion order and counts calls so tests can assert the store was
/// never reached. Reads, writes and local staging can each be switched to fail.
pub struct MemoryImageStore {
    objects: Mutex<Vec<MemoryObject>>,
    urls: ObjectUrlBuilder,
    clock: AtomicI64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_staging: AtomicBool,
    upload_calls: AtomicUsize,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            urls: ObjectUrlBuilder::virtual_hosted("test-gallery", "us-east-1"),
            clock: AtomicI64::new(1_700_000_000_000),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_staging: AtomicBool::new(false),
            upload_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Inserts objects directly, bypassing the upload path
    pub fn seed<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.push(MemoryObject {
                key: key.into(),
                bytes: b"seed".to_vec(),
                content_type: "image/png".to_string(),
            });
        }
    }

    /// Seeds `count` objects named `uploads/<n>-image-<n>.png`
    pub fn seed_numbered(&self, count: usize) {
        self.seed((0..count).map(|n| format!("uploads/{}-image-{n:02}.png", 1_000 + n)));
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|object| object.key.clone())
            .collect()
    }

    pub fn object(&self, key: &str) -> Option<MemoryObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|object| object.key == key)
            .cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes uploads fail as if the staged file could not be read
    pub fn set_fail_staging(&self, fail: bool) {
        self.fail_staging.store(fail, Ordering::SeqCst);
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, upload: &StagedUpload) -> ImageStorageResult<StoredImage> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ImageStorageError::StoreWrite(
                "connection reset by peer".to_string(),
            ));
        }
        if self.fail_staging.load(Ordering::SeqCst) {
            return Err(ImageStorageError::Io(std::io::Error::other(
                "no space left on device",
            )));
        }
        if upload.original_name().is_empty() {
            return Err(ImageStorageError::InvalidInput(
                "original file name is empty".to_string(),
            ));
        }

        let bytes = tokio::fs::read(upload.path()).await?;
        let key = new_upload_key(
            self.clock.fetch_add(1, Ordering::SeqCst),
            upload.original_name(),
        );

        self.objects.lock().unwrap().push(MemoryObject {
            key: key.clone(),
            bytes,
            content_type: upload.content_type().to_string(),
        });

        Ok(StoredImage::from_key(key, &self.urls))
    }

    async fn list(&self) -> ImageStorageResult<Vec<StoredImage>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ImageStorageError::StoreRead(
                "dispatch failure: connection refused".to_string(),
            ));
        }

        Ok(self
            .keys()
            .into_iter()
            .map(|key| StoredImage::from_key(key, &self.urls))
            .collect())
    }

    async fn delete(&self, key: &str) -> ImageStorageResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ImageStorageError::StoreWrite("access denied".to_string()));
        }

        self.objects.lock().unwrap().retain(|object| object.key != key);
        Ok(())
    }
}
