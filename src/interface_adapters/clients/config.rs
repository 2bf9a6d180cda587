use crate::domain::errors::SheetsError;

pub const DEFAULT_SHEET_NAME: &str = "Ranking";
pub const DEFAULT_SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// Process-wide spreadsheet settings, built once at startup and shared read-only.
// The four secrets stay optional here so the server can start without them
// and report a configuration error per call instead.
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    pub api_key: Option<String>,
    pub service_account_email: Option<String>,
    pub private_key: Option<String>,
    pub sheet_name: String,
    pub api_base_url: String,
    pub token_url: String,
}

// Borrowed view of a config where every required value is present.
pub struct RequiredSheetsConfig<'a> {
    pub spreadsheet_id: &'a str,
    pub api_key: &'a str,
    pub service_account_email: &'a str,
    pub private_key: &'a str,
}

impl SheetsConfig {
    pub fn new(
        spreadsheet_id: Option<String>,
        api_key: Option<String>,
        service_account_email: Option<String>,
        private_key: Option<String>,
    ) -> Self {
        Self {
            spreadsheet_id,
            api_key,
            service_account_email,
            private_key,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            api_base_url: DEFAULT_SHEETS_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_endpoints(mut self, api_base_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self.token_url = token_url.into();
        self
    }

    // All four values are checked together so one error names every gap.
    pub fn require(&self) -> Result<RequiredSheetsConfig<'_>, SheetsError> {
        let fields = [
            ("GOOGLE_SHEETS_ID", &self.spreadsheet_id),
            ("GOOGLE_SHEETS_API_KEY", &self.api_key),
            ("GOOGLE_SERVICE_ACCOUNT_EMAIL", &self.service_account_email),
            ("GOOGLE_PRIVATE_KEY", &self.private_key),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SheetsError::Config(format!("missing {}", missing.join(", "))));
        }

        Ok(RequiredSheetsConfig {
            spreadsheet_id: present(&self.spreadsheet_id).unwrap_or_default(),
            api_key: present(&self.api_key).unwrap_or_default(),
            service_account_email: present(&self.service_account_email).unwrap_or_default(),
            private_key: present(&self.private_key).unwrap_or_default(),
        })
    }
}

// Blank values count as unset.
fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |value: &Option<String>| if present(value).is_some() { "set" } else { "unset" };
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &state(&self.spreadsheet_id))
            .field("api_key", &state(&self.api_key))
            .field("service_account_email", &state(&self.service_account_email))
            .field("private_key", &state(&self.private_key))
            .field("sheet_name", &self.sheet_name)
            .field("api_base_url", &self.api_base_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}
