use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::client::RecognitionClient;
use crate::config::Config;
use crate::error::Result;
use crate::ocr::OcrProvider;
use crate::storage::Storage;

#[derive(Clone)]
pub struct IngressState {
    pub config: Arc<Config>,
    pub storage: Storage,
    pub recognition: RecognitionClient,
    pub normalize_pool: Arc<Semaphore>,
}

impl IngressState {
    pub fn new(config: Config) -> Result<Self> {
        let storage = Storage::new(&config.storage.upload_dir)?;
        let recognition = RecognitionClient::new(&config.recognition_client)?;
        let normalize_pool = Arc::new(Semaphore::new(config.normalize.max_concurrent));

        Ok(Self {
            config: Arc::new(config),
            storage,
            recognition,
            normalize_pool,
        })
    }
}

#[derive(Clone)]
pub struct RecognitionState {
    pub config: Arc<Config>,
    pub storage: Storage,
    pub ocr: OcrProvider,
    pub normalize_pool: Arc<Semaphore>,
}

impl RecognitionState {
    pub fn new(config: Config, ocr: OcrProvider) -> Result<Self> {
        let storage = Storage::new(&config.storage.upload_dir)?;
        let normalize_pool = Arc::new(Semaphore::new(config.normalize.max_concurrent));

        Ok(Self {
            config: Arc::new(config),
            storage,
            ocr,
            normalize_pool,
        })
    }
}
