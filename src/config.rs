use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::filter::FilterCondition;

// ---------------------------------------------------------------------------
// Named filter configurations, persisted one per line
// ---------------------------------------------------------------------------

/// Default store location, next to the executable's working directory.
pub const DEFAULT_CONFIG_FILE: &str = "filter_configs.txt";

/// Append-only store of named filter configurations.
///
/// File format: one record per line, `<name>:<JSON condition list>`. The
/// conditions are encoded with serde_json and decoded with a plain parser;
/// stored text is never evaluated. Saving never rewrites earlier lines, so a
/// re-used name shadows the older entry on load (last write wins).
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration name must be non-empty and must not contain ':'")]
    InvalidName,

    #[error("config store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding configuration: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Default for ConfigStore {
    fn default() -> Self {
        ConfigStore::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Append one named configuration. Duplicate names are allowed; the
    /// newest entry wins on the next [`load`](Self::load).
    pub fn save(&self, name: &str, conditions: &[FilterCondition]) -> Result<(), ConfigError> {
        let line = encode_entry(name, conditions)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        log::info!("Saved filter configuration '{name}' to {}", self.path.display());
        Ok(())
    }

    /// Read every stored configuration. A missing file means nothing has
    /// been saved yet and yields an empty map. Malformed lines are reported
    /// and skipped, never executed.
    pub fn load(&self) -> Result<BTreeMap<String, Vec<FilterCondition>>, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(parse_configs(&text))
    }
}

fn encode_entry(name: &str, conditions: &[FilterCondition]) -> Result<String, ConfigError> {
    if name.is_empty() || name.contains(':') {
        return Err(ConfigError::InvalidName);
    }
    let body = serde_json::to_string(conditions)?;
    Ok(format!("{name}:{body}"))
}

/// Parse the whole store body, file order. Later duplicates shadow earlier
/// ones.
fn parse_configs(text: &str) -> BTreeMap<String, Vec<FilterCondition>> {
    let mut configs = BTreeMap::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some((name, conditions)) => {
                configs.insert(name, conditions);
            }
            None => log::warn!("Skipping malformed config line {}: {line}", line_no + 1),
        }
    }
    configs
}

fn parse_line(line: &str) -> Option<(String, Vec<FilterCondition>)> {
    let (name, body) = line.split_once(':')?;
    if name.is_empty() {
        return None;
    }
    let conditions: Vec<FilterCondition> = serde_json::from_str(body).ok()?;
    Some((name.to_string(), conditions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Comparator;

    fn sample_conditions() -> Vec<FilterCondition> {
        vec![
            FilterCondition::new("Time created", Comparator::Le, "2"),
            FilterCondition::new("Dev sold %", Comparator::Eq, "100"),
        ]
    }

    fn temp_store(tag: &str) -> ConfigStore {
        let path = std::env::temp_dir().join(format!(
            "signal_sieve_{tag}_{}.txt",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        ConfigStore::new(path)
    }

    #[test]
    fn encode_then_parse_round_trips() {
        let conditions = sample_conditions();
        let line = encode_entry("aggressive", &conditions).unwrap();
        let (name, parsed) = parse_line(&line).unwrap();
        assert_eq!(name, "aggressive");
        assert_eq!(parsed, conditions);
    }

    #[test]
    fn names_with_delimiter_are_rejected() {
        assert!(matches!(
            encode_entry("a:b", &[]),
            Err(ConfigError::InvalidName)
        ));
        assert!(matches!(
            encode_entry("", &[]),
            Err(ConfigError::InvalidName)
        ));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let good = encode_entry("keep", &sample_conditions()).unwrap();
        let text = format!("not json at all\n{good}\n:missing name\n");
        let configs = parse_configs(&text);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs["keep"], sample_conditions());
    }

    #[test]
    fn duplicate_name_last_write_wins() {
        let older = vec![FilterCondition::new("Time created", Comparator::Ge, "3")];
        let newer = sample_conditions();
        let text = format!(
            "{}\n{}\n",
            encode_entry("mine", &older).unwrap(),
            encode_entry("mine", &newer).unwrap()
        );
        let configs = parse_configs(&text);
        assert_eq!(configs["mine"], newer);
    }

    #[test]
    fn save_then_load_round_trips_through_a_file() {
        let store = temp_store("roundtrip");
        let conditions = sample_conditions();
        store.save("scalp", &conditions).unwrap();
        store.save("swing", &conditions[..1].to_vec()).unwrap();

        let configs = store.load().unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs["scalp"], conditions);
        assert_eq!(configs["swing"], conditions[..1]);
    }

    #[test]
    fn missing_store_loads_empty() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_empty());
    }
}
