//! Simulated upload progress.
//!
//! The browser only learns that an upload finished, never how far along it
//! is, so the bar is an animation: fixed steps on a timer up to a ceiling,
//! then a jump to 100 when the response arrives.

pub const PROGRESS_STEP: u8 = 10;
pub const PROGRESS_TICK_MS: u32 = 200;
pub const PROGRESS_CEILING: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Moved forward and more ticks are useful.
    Advanced(u8),
    /// Reached the ceiling; the timer can be dropped.
    Ceiling(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulatedProgress {
    percent: u8,
    complete: bool,
}

impl SimulatedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn advance(&mut self) -> Tick {
        if !self.complete {
            self.percent = self.percent.saturating_add(PROGRESS_STEP).min(PROGRESS_CEILING);
        }
        if self.percent >= PROGRESS_CEILING {
            Tick::Ceiling(self.percent)
        } else {
            Tick::Advanced(self.percent)
        }
    }

    pub fn complete(&mut self) {
        self.percent = 100;
        self.complete = true;
    }

    pub fn label(&self) -> String {
        if self.complete {
            "Upload complete!".to_string()
        } else {
            format!("Uploading... {}%", self.percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_by_ten_until_ceiling() {
        let mut progress = SimulatedProgress::new();
        let ticks: Vec<Tick> = (0..9).map(|_| progress.advance()).collect();

        assert_eq!(ticks[0], Tick::Advanced(10));
        assert_eq!(ticks[7], Tick::Advanced(80));
        assert_eq!(ticks[8], Tick::Ceiling(90));
    }

    // The bar never reaches 100 on its own, however long the upload takes.
    #[test]
    fn holds_at_ceiling_without_a_response() {
        let mut progress = SimulatedProgress::new();
        for _ in 0..50 {
            progress.advance();
        }
        assert_eq!(progress.percent(), 90);
        assert_eq!(progress.label(), "Uploading... 90%");
    }

    #[test]
    fn completion_jumps_to_full() {
        let mut progress = SimulatedProgress::new();
        progress.advance();
        progress.complete();
        assert_eq!(progress.percent(), 100);
        assert_eq!(progress.label(), "Upload complete!");

        // a stray tick after completion does not move the bar back
        progress.advance();
        assert_eq!(progress.percent(), 100);
    }
}
