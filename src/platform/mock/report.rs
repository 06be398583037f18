//! Mock parameter report sink for testing

use crate::platform::traits::{ParamReporter, ReportValue};
use heapless::Vec;

/// Mock report channel that records emitted values
#[derive(Debug, Default)]
pub struct MockReporter {
    reports: Vec<(u16, ReportValue), 16>,
}

impl MockReporter {
    /// Create a new empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded reports in emission order
    pub fn reports(&self) -> &[(u16, ReportValue)] {
        &self.reports
    }
}

impl ParamReporter for MockReporter {
    fn report_parameter(&mut self, index: u16, value: ReportValue) {
        // Recording more than the capacity is a test bug, drop silently.
        let _ = self.reports.push((index, value));
    }
}
