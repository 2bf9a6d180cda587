use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::domain::entities::BearerCredential;
use crate::domain::errors::SheetsError;
use crate::domain::ports::{Access, Clock, CredentialProvider, Grid, RangeUpdate, SheetsGateway};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AccessKind {
    ApiKey,
    Bearer(String),
}

impl From<Access<'_>> for AccessKind {
    fn from(access: Access<'_>) -> Self {
        match access {
            Access::ApiKey => AccessKind::ApiKey,
            Access::Bearer(credential) => AccessKind::Bearer(credential.access_token.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecordedWrite {
    pub range: String,
    pub values: Grid,
    pub access: AccessKind,
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub read: bool,
    pub write: bool,
}

// In-memory sheet fake. Reads serve canned grids by range; writes are only
// recorded so tests can assert exactly what would reach the sheet.
#[derive(Clone, Default)]
pub(crate) struct RecordingGateway {
    grids: Arc<Mutex<HashMap<String, Grid>>>,
    reads: Arc<Mutex<Vec<(String, AccessKind)>>>,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
    batches: Arc<Mutex<Vec<Vec<RangeUpdate>>>>,
    failures: FailureFlags,
    // Holds every reader until the barrier fills, to interleave concurrent calls.
    read_barrier: Option<Arc<Barrier>>,
}

impl RecordingGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_grid(self, range: &str, rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect();
        self.grids
            .lock()
            .expect("grids mutex poisoned")
            .insert(range.to_string(), grid);
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_read_barrier(mut self, readers: usize) -> Self {
        self.read_barrier = Some(Arc::new(Barrier::new(readers)));
        self
    }

    pub(crate) fn reads(&self) -> Vec<(String, AccessKind)> {
        self.reads.lock().expect("reads mutex poisoned").clone()
    }

    pub(crate) fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().expect("writes mutex poisoned").clone()
    }

    pub(crate) fn batches(&self) -> Vec<Vec<RangeUpdate>> {
        self.batches.lock().expect("batches mutex poisoned").clone()
    }
}

#[async_trait]
impl SheetsGateway for RecordingGateway {
    async fn read_range(&self, range: &str, access: Access<'_>) -> Result<Grid, SheetsError> {
        if self.failures.read {
            return Err(SheetsError::UpstreamRead {
                status: 500,
                body: "read failed".to_string(),
            });
        }

        self.reads
            .lock()
            .expect("reads mutex poisoned")
            .push((range.to_string(), access.into()));
        let grid = self
            .grids
            .lock()
            .expect("grids mutex poisoned")
            .get(range)
            .cloned()
            .unwrap_or_default();

        if let Some(barrier) = &self.read_barrier {
            barrier.wait().await;
        }

        Ok(grid)
    }

    async fn write_range(
        &self,
        range: &str,
        values: Grid,
        access: Access<'_>,
    ) -> Result<(), SheetsError> {
        if self.failures.write {
            return Err(SheetsError::UpstreamWrite {
                status: 500,
                body: "write failed".to_string(),
            });
        }

        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .push(RecordedWrite {
                range: range.to_string(),
                values,
                access: access.into(),
            });
        Ok(())
    }

    async fn batch_write(
        &self,
        updates: Vec<RangeUpdate>,
        access: Access<'_>,
    ) -> Result<(), SheetsError> {
        if self.failures.write {
            return Err(SheetsError::UpstreamWrite {
                status: 500,
                body: "batch failed".to_string(),
            });
        }

        let mut writes = self.writes.lock().expect("writes mutex poisoned");
        for update in &updates {
            writes.push(RecordedWrite {
                range: update.range.clone(),
                values: update.values.clone(),
                access: access.into(),
            });
        }
        drop(writes);

        self.batches
            .lock()
            .expect("batches mutex poisoned")
            .push(updates);
        Ok(())
    }
}

// Credential fake that counts how many credentials were minted.
#[derive(Clone, Default)]
pub(crate) struct StubCredentials {
    issued: Arc<AtomicUsize>,
    fail: bool,
}

impl StubCredentials {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            issued: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub(crate) fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for StubCredentials {
    async fn acquire_write_credential(&self) -> Result<BearerCredential, SheetsError> {
        if self.fail {
            return Err(SheetsError::UpstreamAuth {
                status: 401,
                body: "invalid_grant".to_string(),
            });
        }

        let issued = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BearerCredential {
            access_token: format!("token-{issued}"),
            expires_at: 3_600,
        })
    }
}
