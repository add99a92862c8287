//! Matrix loading and the session data context.

mod error;
mod loader;
mod types;

pub use error::FetchError;
pub use loader::{load_all_data, resolve_signed_url};
pub use types::{ChordData, DataContext, Matrix};
