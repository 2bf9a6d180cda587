use serde::{Deserialize, Serialize};

// A leaderboard row read from the participant range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub points: i64,
    // 1-based sheet row; row 1 is the header so the first participant is row 2.
    pub row_number: u32,
}

// Participant with its leaderboard position assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedParticipant {
    pub position: usize,
    #[serde(flatten)]
    pub participant: Participant,
}

// Caller-supplied row for the admin bulk replace.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantUpdate {
    pub name: String,
    pub points: i64,
    pub row_number: u32,
}

/// Dinner answer from the registration form.
///
/// The sheet stores `si` / `no` / empty, which is what the public form has
/// always written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DinnerAttendance {
    Yes,
    No,
    #[default]
    Unset,
}

impl DinnerAttendance {
    // Accepts the form values plus an English spelling.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "si" | "sí" | "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "" => Some(Self::Unset),
            _ => None,
        }
    }

    pub fn from_cell(cell: &str) -> Self {
        Self::parse(cell).unwrap_or_default()
    }

    pub fn as_cell(self) -> &'static str {
        match self {
            Self::Yes => "si",
            Self::No => "no",
            Self::Unset => "",
        }
    }
}

// A form response as read back from the sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub name: String,
    pub attending_dinner: DinnerAttendance,
    pub allergies: String,
    // Stored display text, e.g. "cerveza, agua". Not split back into tags.
    pub drink_preferences: String,
    pub row_number: u32,
}

// A validated registration ready to be written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub attending_dinner: DinnerAttendance,
    pub allergies: String,
    pub drink_preferences: Vec<String>,
}

impl Registration {
    pub fn drinks_cell(&self) -> String {
        self.drink_preferences.join(", ")
    }
}

// Short-lived write authorization for the spreadsheet API.
#[derive(Clone)]
pub struct BearerCredential {
    pub access_token: String,
    pub expires_at: u64,
}

impl std::fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerCredential")
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
