use crate::domain::entities::{DinnerAttendance, FormResponse, Registration};
use crate::domain::errors::SheetsError;
use crate::domain::ports::{Access, CredentialProvider, SheetsGateway};
use crate::domain::rows;

// Registration form responses over the D:G range, one row per name.
pub struct FormResponseRepository<G, P> {
    pub gateway: G,
    pub credentials: P,
    pub sheet: String,
}

impl<G, P> FormResponseRepository<G, P>
where
    G: SheetsGateway,
    P: CredentialProvider,
{
    pub async fn find_by_name(&self, name: &str, access: Access<'_>) -> Result<Option<u32>, SheetsError> {
        let column = self
            .gateway
            .read_range(&rows::form_identity_range(&self.sheet), access)
            .await?;
        Ok(rows::find_row_by_name(&column, name))
    }

    pub async fn find_first_empty_row(&self, access: Access<'_>) -> Result<u32, SheetsError> {
        let column = self
            .gateway
            .read_range(&rows::form_identity_range(&self.sheet), access)
            .await?;
        Ok(rows::first_empty_row(&column))
    }

    // Overwrites an existing row for the same name, else takes the first
    // free row. Two new names submitted at once can pick the same row.
    pub async fn upsert(&self, registration: &Registration) -> Result<u32, SheetsError> {
        let credential = self.credentials.acquire_write_credential().await?;
        let access = Access::Bearer(&credential);

        let row = match self.find_by_name(&registration.name, access).await? {
            Some(row) => {
                tracing::debug!(row, "existing form response found");
                row
            }
            None => self.find_first_empty_row(access).await?,
        };

        self.gateway
            .write_range(
                &rows::form_row_range(&self.sheet, row),
                rows::form_response_row(registration),
                access,
            )
            .await?;

        tracing::info!(row, "form response saved");
        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<FormResponse>, SheetsError> {
        let grid = self
            .gateway
            .read_range(&rows::form_range(&self.sheet), Access::ApiKey)
            .await?;
        Ok(rows::parse_form_responses(&grid))
    }
}

// Checks a raw submission before it can reach the sheet.
pub fn validate_registration(
    name: &str,
    attending_dinner: Option<&str>,
    allergies: Option<&str>,
    drink_preferences: &[String],
) -> Result<Registration, SheetsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SheetsError::validation("name is required"));
    }

    let attending_dinner = match attending_dinner.map(DinnerAttendance::parse) {
        None | Some(Some(DinnerAttendance::Unset)) => {
            return Err(SheetsError::validation("attendingDinner is required"));
        }
        Some(None) => {
            return Err(SheetsError::validation("attendingDinner must be yes or no"));
        }
        Some(Some(answer)) => answer,
    };

    let drink_preferences: Vec<String> = drink_preferences
        .iter()
        .map(|drink| drink.trim())
        .filter(|drink| !drink.is_empty())
        .map(str::to_string)
        .collect();
    if drink_preferences.is_empty() {
        return Err(SheetsError::validation(
            "at least one drink preference is required",
        ));
    }

    Ok(Registration {
        name: name.to_string(),
        attending_dinner,
        allergies: allergies.unwrap_or_default().trim().to_string(),
        drink_preferences,
    })
}
