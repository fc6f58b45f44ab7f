//! Timestamped, bounded log shown in the monitor's side pane

use std::collections::VecDeque;

/// Lines kept before the oldest are dropped
pub const LOG_CAPACITY: usize = 500;

pub struct LogPane {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogPane {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line stamped with the local time
    pub fn push(&mut self, message: impl AsRef<str>) {
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.push_raw(format!("[{}] {}", stamp, message.as_ref()));
    }

    fn push_raw(&mut self, line: String) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines joined for a read-only text view
    pub fn text(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }
}

impl Default for LogPane {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_stamps_lines() {
        let mut pane = LogPane::default();
        pane.push("IMU direction: 12.5");
        assert_eq!(pane.len(), 1);
        let text = pane.text();
        assert!(text.starts_with('['));
        assert!(text.ends_with("] IMU direction: 12.5"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut pane = LogPane::new(3);
        for i in 0..5 {
            pane.push(format!("line {}", i));
        }
        assert_eq!(pane.len(), 3);
        let text = pane.text();
        assert!(!text.contains("line 1"));
        assert!(text.contains("line 2"));
        assert!(text.ends_with("line 4"));
    }

    #[test]
    fn test_clear() {
        let mut pane = LogPane::new(3);
        pane.push("x");
        pane.clear();
        assert_eq!(pane.len(), 0);
        assert!(pane.text().is_empty());
    }
}
