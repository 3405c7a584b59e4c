use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{Document, DocumentStore, Repository};
use crate::services::{Mailer, Notifier};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>, mailer: Arc<dyn Mailer>) -> Self {
        let notifier = Arc::new(Notifier::new(mailer, &config));
        Self {
            config: Arc::new(config),
            store,
            notifier,
        }
    }

    pub fn repository<T: Document>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }
}
