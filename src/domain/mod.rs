pub mod entities;
pub mod errors;
pub mod ports;
pub mod ranking;
pub mod rows;

// Re-export the domain boundary types and ports.
pub use entities::{
    BearerCredential, DinnerAttendance, FormResponse, Participant, ParticipantUpdate,
    RankedParticipant, Registration,
};
pub use errors::SheetsError;
pub use ports::{Access, Clock, CredentialProvider, Grid, RangeUpdate, SheetsGateway};
