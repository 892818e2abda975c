//! Policy backend: the rule store opened from configuration, with the
//! filtering mode kept alongside it in the settings table.

use norootfw_policy::{filtering_mode, PreferenceSource, RuleStore, StoredPreferences};
use norootfw_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct PolicyBackend {
    config: Config,
    store: RuleStore<StoredPreferences>,
}

impl PolicyBackend {
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let prefs = StoredPreferences::new(db.clone(), config.default_filtering_mode.clone());
        let store = RuleStore::on_create(db, prefs);

        tracing::info!(
            path = %config.database_path.display(),
            filtering_mode = %store.preferences().filtering_mode(),
            "Policy backend ready"
        );

        Ok(Self { config, store })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RuleStore<StoredPreferences> {
        &self.store
    }

    pub fn filtering_mode(&self) -> String {
        self.store.preferences().filtering_mode()
    }

    /// Change the mode stamped onto rules inserted from now on. Existing
    /// rules keep the mode they were inserted with.
    pub fn set_filtering_mode(&self, mode: &str) -> Result<()> {
        if mode != filtering_mode::BLACKLIST && mode != filtering_mode::WHITELIST {
            return Err(CoreError::InvalidFilteringMode(mode.to_string()));
        }
        self.store.preferences().set_filtering_mode(mode)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use norootfw_policy::{uris, ConnectionDirection, RuleValues, Selection};
    use std::path::PathBuf;

    fn temp_config() -> (PathBuf, Config) {
        let dir = std::env::temp_dir().join(format!("norootfw-{}", uuid::Uuid::new_v4()));
        (dir.clone(), Config::new(dir))
    }

    fn outbound(ip: &str, port: u16) -> RuleValues {
        RuleValues::new(ConnectionDirection::Outbound)
            .ip_address(ip)
            .port(port)
    }

    #[test]
    fn test_backend_stamps_current_mode() {
        let (dir, config) = temp_config();
        let backend = PolicyBackend::new(config).unwrap();
        let table = uris::ip_port_table();

        assert_eq!(backend.filtering_mode(), "blacklist");
        let first = backend
            .store()
            .insert(&table, outbound("10.0.0.1", 80))
            .unwrap()
            .unwrap();

        backend.set_filtering_mode(filtering_mode::WHITELIST).unwrap();
        let second = backend
            .store()
            .insert(&table, outbound("10.0.0.2", 443))
            .unwrap()
            .unwrap();

        let store = backend.store();
        assert_eq!(store.get(&first).unwrap().unwrap().filtering_mode, "blacklist");
        assert_eq!(store.get(&second).unwrap().unwrap().filtering_mode, "whitelist");

        drop(backend);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_rules_and_mode_survive_reopen() {
        let (dir, config) = temp_config();
        let table = uris::ip_port_table();

        {
            let backend = PolicyBackend::new(config.clone()).unwrap();
            backend.set_filtering_mode(filtering_mode::WHITELIST).unwrap();
            backend
                .store()
                .insert(&table, outbound("10.0.0.1", 80))
                .unwrap()
                .unwrap();
        }

        let backend = PolicyBackend::new(config).unwrap();
        assert_eq!(backend.filtering_mode(), "whitelist");

        let rules = backend
            .store()
            .query(&table, &Selection::all(), None)
            .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].filtering_mode, "whitelist");

        // Uniqueness holds across reopen
        assert!(backend
            .store()
            .insert(&table, outbound("10.0.0.1", 80))
            .unwrap()
            .is_none());

        drop(backend);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let (dir, config) = temp_config();
        let backend = PolicyBackend::new(config).unwrap();

        assert!(matches!(
            backend.set_filtering_mode("greylist"),
            Err(CoreError::InvalidFilteringMode(_))
        ));
        assert_eq!(backend.filtering_mode(), "blacklist");

        drop(backend);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
