use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::ports::{Clock, CredentialProvider, SheetsGateway};
use crate::use_cases::form_responses::FormResponseRepository;
use crate::use_cases::participants::ParticipantRepository;

pub type SharedGateway = Arc<dyn SheetsGateway>;
pub type SharedCredentials = Arc<dyn CredentialProvider>;

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub gateway: SharedGateway,
    pub credentials: SharedCredentials,
    pub sheet_name: Arc<str>,
}

impl AppState {
    pub fn participants(&self) -> ParticipantRepository<SharedGateway, SharedCredentials> {
        ParticipantRepository {
            gateway: self.gateway.clone(),
            credentials: self.credentials.clone(),
            sheet: self.sheet_name.to_string(),
        }
    }

    pub fn form_responses(&self) -> FormResponseRepository<SharedGateway, SharedCredentials> {
        FormResponseRepository {
            gateway: self.gateway.clone(),
            credentials: self.credentials.clone(),
            sheet: self.sheet_name.to_string(),
        }
    }
}

// System clock adapter used by the credential provider.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
