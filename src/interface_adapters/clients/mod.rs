// The clients defined here are reqwest clients for the external Google services.
pub mod config;
pub mod credentials;
pub mod sheets;

pub use config::SheetsConfig;
pub use credentials::ServiceAccountCredentials;
pub use sheets::SheetsClient;
