//! Parameter report sink trait
//!
//! A bare `#n` item (no `=`) prints the parameter value on the serial
//! console. Formatting and transport live outside this crate; the evaluator
//! only emits typed values through this trait.

/// Value emitted by a parameter report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportValue {
    /// Stored or live float value, printed with 3 decimals downstream
    Float(f32),
    /// Raw bitfield value, printed as an unsigned integer
    Uint32(u32),
}

/// Report channel for parameter queries
pub trait ParamReporter {
    /// Emit the value of parameter `index`
    fn report_parameter(&mut self, index: u16, value: ReportValue);
}
