//! Record of finished negotiations, kept in memory and appended to disk.
//!
//! No money or inventory changes hands here; the ledger is where an economy
//! would pick up accepted deals.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use super::session::DialogueOutcome;

const DEFAULT_DEAL_LOG_PATH: &str = "logs/deals.jsonl";

const DEFAULT_DEAL_LEDGER_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct DealRecord {
    pub occurred_at_seconds: f64,
    pub npc: String,
    pub customer_name: String,
    pub is_buyer: bool,
    pub price: f32,
    pub barter_rounds: u32,
    pub outcome: DialogueOutcome,
}

/// Rolling window of recent deals.
#[derive(Resource, Debug)]
pub struct DealLedger {
    capacity: usize,
    records: VecDeque<DealRecord>,
}

impl DealLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: DealRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &DealRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&DealRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DealLedger {
    fn default() -> Self {
        Self::new(DEFAULT_DEAL_LEDGER_CAPACITY)
    }
}

/// Pending deals waiting to be appended as JSON lines.
#[derive(Resource, Debug)]
pub struct DealLog {
    output_path: PathBuf,
    pending: Vec<DealRecord>,
}

impl DealLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &DealRecord) {
        self.pending.push(record.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            let serialisable = SerializableDealRecord::from(record);
            serde_json::to_writer(&mut file, &serialisable)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for DealLog {
    fn default() -> Self {
        Self::new(DEFAULT_DEAL_LOG_PATH)
    }
}

/// Appends pending deals to disk, logging a warning if persistence fails.
pub fn flush_deal_log(mut log: ResMut<DealLog>) {
    if let Err(err) = log.flush() {
        warn!("Failed to persist deals to {:?}: {}", log.path(), err);
    }
}

#[derive(Serialize)]
struct SerializableDealRecord {
    occurred_at_seconds: f64,
    npc: String,
    customer_name: String,
    role: &'static str,
    price: f32,
    barter_rounds: u32,
    outcome: &'static str,
}

impl From<DealRecord> for SerializableDealRecord {
    fn from(value: DealRecord) -> Self {
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            npc: value.npc,
            customer_name: value.customer_name,
            role: if value.is_buyer { "buyer" } else { "seller" },
            price: value.price,
            barter_rounds: value.barter_rounds,
            outcome: value.outcome.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::{env, fs, time::SystemTime};

    fn record(at: f64, outcome: DialogueOutcome) -> DealRecord {
        DealRecord {
            occurred_at_seconds: at,
            npc: "NPC-0003".to_string(),
            customer_name: "Mabel".to_string(),
            is_buyer: true,
            price: 11.0,
            barter_rounds: 1,
            outcome,
        }
    }

    #[test]
    fn ledger_drops_old_records_when_full() {
        let mut ledger = DealLedger::new(2);
        ledger.push(record(1.0, DialogueOutcome::Accepted));
        ledger.push(record(2.0, DialogueOutcome::Refused));
        ledger.push(record(3.0, DialogueOutcome::Accepted));

        assert_eq!(ledger.len(), 2);
        assert!(ledger.records().all(|entry| entry.occurred_at_seconds >= 2.0));
        assert_eq!(ledger.last().map(|entry| entry.occurred_at_seconds), Some(3.0));
    }

    #[test]
    fn log_writes_json_lines() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir().join(format!("deal_log_test_{}.jsonl", unique_suffix));

        let mut log = DealLog::new(&path);
        log.push(&record(12.5, DialogueOutcome::Refused));
        log.flush().expect("deal log should flush");
        assert!(log.is_empty());

        let raw = fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: Value = serde_json::from_str(lines[0]).expect("json line should parse");
        assert_eq!(value["outcome"], "refused");
        assert_eq!(value["role"], "buyer");
        assert_eq!(value["npc"], "NPC-0003");
        assert_eq!(value["barter_rounds"], 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_log_does_not_touch_disk() {
        let mut log = DealLog::new("/nonexistent-dir/should-not-be-created/deals.jsonl");
        assert!(log.flush().is_ok());
    }
}
