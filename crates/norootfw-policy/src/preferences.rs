//! Source of the global filtering mode stamped onto inserted rules

use norootfw_storage::Database;

use crate::Result;

/// Supplies the current filtering mode. Read once per insert and never
/// cached by the store.
pub trait PreferenceSource: Send + Sync {
    fn filtering_mode(&self) -> String;
}

impl<F> PreferenceSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn filtering_mode(&self) -> String {
        self()
    }
}

/// Filtering mode kept in the database `settings` table.
#[derive(Clone)]
pub struct StoredPreferences {
    db: Database,
    default_mode: String,
}

impl StoredPreferences {
    pub const FILTERING_MODE_KEY: &'static str = "filtering_mode";

    pub fn new(db: Database, default_mode: impl Into<String>) -> Self {
        Self {
            db,
            default_mode: default_mode.into(),
        }
    }

    pub fn set_filtering_mode(&self, mode: &str) -> Result<()> {
        self.db.set_setting(Self::FILTERING_MODE_KEY, mode)?;
        tracing::info!(mode, "Filtering mode changed");
        Ok(())
    }
}

impl PreferenceSource for StoredPreferences {
    fn filtering_mode(&self) -> String {
        match self.db.get_setting(Self::FILTERING_MODE_KEY) {
            Ok(Some(mode)) => mode,
            Ok(None) => self.default_mode.clone(),
            Err(e) => {
                tracing::warn!("Failed to read filtering mode, using default: {}", e);
                self.default_mode.clone()
            }
        }
    }
}
