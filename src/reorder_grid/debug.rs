use std::collections::VecDeque;

use itertools::Itertools as _;

/// Bounded log of drag lifecycle events, meant for copy-paste from a debug panel.
#[derive(Debug, Default)]
pub(super) struct DebugEventLog {
    lines: VecDeque<String>,
    counter: u64,
}

impl DebugEventLog {
    pub(super) fn push(&mut self, capacity: usize, message: String) {
        let cap = capacity.clamp(1, 10_000);
        while self.lines.len() >= cap {
            self.lines.pop_front();
        }
        self.counter += 1;
        self.lines
            .push_back(format!("[event {}] {}", self.counter, message));
    }

    pub(super) fn clear(&mut self) {
        self.lines.clear();
    }

    pub(super) fn text(&self) -> String {
        self.lines.iter().join("\n")
    }
}
