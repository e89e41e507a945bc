use crate::message::Placeholders;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// Default file name for the persisted miss log, under the OS temp dir.
const MISS_LOG_FILE: &str = "not-found-translations.txt";

/// Records lookups that failed to resolve even in the fallback language.
///
/// Each record is `key||name::TypeName|name2::TypeName2` for the
/// placeholders supplied at miss time. Records are deduplicated and the
/// full set is rewritten to a flat text file on every flush. Diagnostic
/// only — the engine never reads this file back.
#[derive(Debug)]
pub struct MissLog {
    path: PathBuf,
    records: Mutex<Vec<String>>,
}

impl Default for MissLog {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join(MISS_LOG_FILE))
    }
}

impl MissLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Record a fallback-language miss and flush the deduplicated log.
    pub fn record(&self, key: &str, placeholders: &Placeholders) {
        let line = format!("{key}||{}", placeholders.type_summary());
        let snapshot = {
            let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
            records.push(line);
            records.clone()
        };
        self.flush(&snapshot);
    }

    fn flush(&self, records: &[String]) {
        let mut seen = HashSet::new();
        let deduped: Vec<&str> = records
            .iter()
            .map(String::as_str)
            .filter(|line| seen.insert(*line))
            .collect();
        if deduped.is_empty() {
            return;
        }
        if let Err(e) = std::fs::write(&self.path, deduped.join("\n")) {
            warn!("failed to write miss log {}: {e}", self.path.display());
        }
    }

    /// Deduplicated records currently held in memory.
    pub fn entries(&self) -> Vec<String> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut seen = HashSet::new();
        records
            .iter()
            .filter(|line| seen.insert(line.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Placeholders;

    fn temp_log(name: &str) -> MissLog {
        MissLog::new(std::env::temp_dir().join(name))
    }

    #[test]
    fn test_record_format() {
        let log = temp_log("__lingo_test_miss_format__.txt");
        let ph = Placeholders::new().set("name", "World").set("count", 3i64);
        log.record("greet", &ph);
        assert_eq!(log.entries(), vec!["greet||name::String|count::Int"]);
    }

    #[test]
    fn test_record_without_placeholders() {
        let log = temp_log("__lingo_test_miss_bare__.txt");
        log.record("greet", &Placeholders::new());
        assert_eq!(log.entries(), vec!["greet||"]);
    }

    #[test]
    fn test_deduplication() {
        let log = temp_log("__lingo_test_miss_dedup__.txt");
        let ph = Placeholders::new().set("name", "World");
        log.record("greet", &ph);
        log.record("greet", &ph);
        log.record("greet", &Placeholders::new().set("name", 1i64));
        assert_eq!(
            log.entries(),
            vec!["greet||name::String", "greet||name::Int"]
        );
    }

    #[test]
    fn test_flush_writes_file() {
        let path = std::env::temp_dir().join("__lingo_test_miss_file__.txt");
        let _ = std::fs::remove_file(&path);
        let log = MissLog::new(path.clone());
        log.record("a", &Placeholders::new());
        log.record("b", &Placeholders::new());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a||\nb||");
        let _ = std::fs::remove_file(&path);
    }
}
