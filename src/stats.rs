use serde::{Deserialize, Serialize};

use crate::format::format_file_size;

/// Aggregate numbers shown in the header, as served by `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_files: u64,
    pub total_size_formatted: String,
}

impl StatsSnapshot {
    pub fn from_sizes<I>(sizes: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let (total_files, total_bytes) = sizes
            .into_iter()
            .fold((0u64, 0u64), |(count, bytes), size| (count + 1, bytes.saturating_add(size)));
        Self {
            total_files,
            total_size_formatted: format_file_size(total_bytes),
        }
    }
}

/// Identifies one poll of the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket(u64);

/// Orders stats polls so a slow response can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct PollSequence {
    issued: u64,
}

impl PollSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a poll, superseding any poll still in flight.
    pub fn begin(&mut self) -> PollTicket {
        self.issued += 1;
        PollTicket(self.issued)
    }

    pub fn is_current(&self, ticket: PollTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Invalidates every outstanding ticket, e.g. on teardown.
    pub fn cancel_all(&mut self) {
        self.issued += 1;
    }
}
