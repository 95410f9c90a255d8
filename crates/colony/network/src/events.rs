use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use colony_types::{Address, Event};
use serde::Serialize;

/// One observed event, stamped when the network recorded it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub seq: u64,
    pub at: DateTime<Utc>,
    /// The contract the event concerns.
    pub source: Address,
    pub event: Event,
}

/// Append-only log with monotonically increasing sequence numbers.
///
/// A bounded log drops its oldest records; sequence numbers are never reused.
#[derive(Clone, Debug)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    next_seq: u64,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            next_seq: 1,
            capacity,
        }
    }

    pub fn record(&mut self, source: Address, event: Event) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.push_back(EventRecord {
            seq,
            at: Utc::now(),
            source,
            event,
        });
        if self.capacity > 0 && self.records.len() > self.capacity {
            self.records.pop_front();
        }
        seq
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Records with `seq > after`.
    pub fn since(&self, after: u64) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.seq > after)
    }

    pub fn last(&self) -> Option<&EventRecord> {
        self.records.back()
    }

    /// Event names in order, for assertions and summaries.
    pub fn names(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.event.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One JSON object per line.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}
