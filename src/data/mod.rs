mod content;
mod credentials;
mod loader;
mod results;

pub use content::{ContentStore, ImportReport, SkippedEntry};
pub use credentials::{ADMIN_USERNAME, CredentialStore};
pub use results::ResultLog;
