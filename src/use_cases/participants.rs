use crate::domain::entities::{Participant, ParticipantUpdate};
use crate::domain::errors::SheetsError;
use crate::domain::ports::{Access, CredentialProvider, RangeUpdate, SheetsGateway};
use crate::domain::rows;

// Points added when a caller does not say how many.
pub const DEFAULT_POINTS_DELTA: i64 = 100;

// Participant reads and writes over the A:B range.
pub struct ParticipantRepository<G, P> {
    pub gateway: G,
    pub credentials: P,
    pub sheet: String,
}

impl<G, P> ParticipantRepository<G, P>
where
    G: SheetsGateway,
    P: CredentialProvider,
{
    // Full read with the read-only API key, in sheet order.
    pub async fn list(&self) -> Result<Vec<Participant>, SheetsError> {
        let grid = self
            .gateway
            .read_range(&rows::participant_range(&self.sheet), Access::ApiKey)
            .await?;
        let participants = rows::parse_participants(&grid);
        tracing::debug!(count = participants.len(), "participants read");
        Ok(participants)
    }

    // Writes every record at its caller-supplied row in one batch. Rows past
    // the current data extend the sheet; nothing checks they exist.
    pub async fn replace_all(&self, records: Vec<ParticipantUpdate>) -> Result<usize, SheetsError> {
        if records.iter().all(|record| record.name.trim().is_empty()) {
            return Err(SheetsError::validation(
                "at least one named participant is required",
            ));
        }
        if let Some(record) = records.iter().find(|record| record.row_number < 2) {
            return Err(SheetsError::validation(format!(
                "row {} is reserved for the header",
                record.row_number
            )));
        }

        let credential = self.credentials.acquire_write_credential().await?;
        let updates: Vec<RangeUpdate> = records
            .iter()
            .map(|record| RangeUpdate {
                range: rows::participant_row_range(&self.sheet, record.row_number),
                values: rows::participant_row(&record.name, record.points),
            })
            .collect();
        let count = updates.len();

        self.gateway
            .batch_write(updates, Access::Bearer(&credential))
            .await?;

        tracing::info!(count, "participants replaced");
        Ok(count)
    }

    // Read-then-write with no version check: two concurrent increments for
    // the same name can both read the old total and one delta is lost.
    pub async fn increment_points(&self, name: &str, delta: i64) -> Result<Participant, SheetsError> {
        if name.trim().is_empty() {
            return Err(SheetsError::validation("participant name is required"));
        }

        let credential = self.credentials.acquire_write_credential().await?;
        let needle = name.to_lowercase();
        let current = self
            .list()
            .await?
            .into_iter()
            .find(|participant| participant.name.to_lowercase() == needle)
            .ok_or_else(|| SheetsError::NotFound(format!("participant {name}")))?;

        let points = current
            .points
            .checked_add(delta)
            .ok_or_else(|| SheetsError::validation("points total out of range"))?;
        self.gateway
            .write_range(
                &rows::points_cell(&self.sheet, current.row_number),
                rows::points_row(points),
                Access::Bearer(&credential),
            )
            .await?;

        tracing::info!(
            row = current.row_number,
            from = current.points,
            to = points,
            "participant points updated"
        );
        Ok(Participant { points, ..current })
    }
}
