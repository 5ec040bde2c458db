use std::sync::Arc;

use crate::auth::{AuthorizationChecker, CityClaimPolicy};
use crate::config::AppConfig;
use crate::database::{CityInfoRepository, EntityStore};
use crate::services::{LocalMailService, MailService};

/// Shared handles every request is served from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn EntityStore>,
    pub authorizer: Arc<dyn AuthorizationChecker>,
    pub mail: Arc<dyn MailService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn EntityStore>) -> Self {
        let mail = Arc::new(LocalMailService::new(&config.mail));
        Self {
            config: Arc::new(config),
            store,
            authorizer: Arc::new(CityClaimPolicy),
            mail,
        }
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn AuthorizationChecker>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn with_mail_service(mut self, mail: Arc<dyn MailService>) -> Self {
        self.mail = mail;
        self
    }

    /// A fresh unit of work for one request.
    pub fn repository(&self) -> CityInfoRepository {
        CityInfoRepository::new(self.store.clone())
    }
}
