//! RS274/NGC expression evaluation and parameter-setting items
//!
//! A parameter item is `#<integer-value>` optionally followed by
//! `=<real-value>`. Without the `=` the item reports the parameter value on
//! the console; with it the item sets the parameter.
//!
//! Parameter setting is done in parallel, not sequentially: assignments on a
//! line take effect only after the whole line has been read. If `#1` is 5
//! before the line `#1=10 #2=#1` is read, then after the line executes `#1`
//! is 10 and `#2` is 5. A line that fails to parse changes nothing.

pub mod cursor;
pub mod error;
pub mod expression;
pub mod ops;

pub use cursor::LineCursor;
pub use error::EvalError;
pub use ops::{Operation, UnaryOp};

use core::fmt;

use crate::params::{ParameterStore, MAX_PARAMETERS};
use crate::platform::error::PlcError;
use crate::platform::traits::{ParamReporter, PlcIoInterface, PositionSource};

/// Error from processing a full line of parameter items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// A reader rejected the line; nothing was committed
    Eval(EvalError),
    /// The line parsed but a PLC output commit failed
    Plc(PlcError),
}

impl LineError {
    /// Numeric code for the `error:<code>` wire protocol
    pub fn code(&self) -> u16 {
        match self {
            LineError::Eval(e) => e.code(),
            LineError::Plc(e) => e.code(),
        }
    }
}

impl From<EvalError> for LineError {
    fn from(e: EvalError) -> Self {
        LineError::Eval(e)
    }
}

impl From<PlcError> for LineError {
    fn from(e: PlcError) -> Self {
        LineError::Plc(e)
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error:{}", self.code())
    }
}

/// Read one `#<int>[=<real>]` item, cursor on `#`
///
/// Without `=` the parameter is reported through `reporter`. With `=` the
/// right-hand value is evaluated against the pre-line parameter state and
/// staged on the store; `ParameterStore::commit_line` applies it.
pub fn read_parameter_setting<P, S, R>(
    cursor: &mut LineCursor,
    store: &mut ParameterStore<P, S>,
    reporter: &mut R,
) -> Result<(), EvalError>
where
    P: PlcIoInterface,
    S: PositionSource,
    R: ParamReporter,
{
    if cursor.peek() != b'#' {
        return Err(EvalError::BadCharacter);
    }
    cursor.bump();
    let index = expression::read_integer_value(cursor, store)?;
    if index < 1 || index >= MAX_PARAMETERS as i32 {
        return Err(EvalError::ParameterOutOfRange);
    }
    let index = index as u16;

    if cursor.peek() != b'=' {
        store.report(index, reporter);
    } else {
        cursor.bump();
        let value = expression::read_real_value(cursor, store)?;
        store.stage_write(index, value);
    }
    Ok(())
}

/// Process a full line of parameter items
///
/// The line must be upper-cased with comments stripped; spaces inside an
/// item must already be removed by the line preprocessor, as on the wire.
/// Spaces between items are skipped. All assignments are staged while
/// reading and
/// committed together once the whole line has parsed; any read error
/// discards the staged assignments and leaves the parameter table
/// untouched.
pub fn read_line<P, S, R>(
    line: &str,
    store: &mut ParameterStore<P, S>,
    reporter: &mut R,
) -> Result<(), LineError>
where
    P: PlcIoInterface,
    S: PositionSource,
    R: ParamReporter,
{
    let mut cursor = LineCursor::new(line);
    loop {
        while cursor.peek() == b' ' {
            cursor.bump();
        }
        if cursor.peek() == 0 {
            break;
        }
        if let Err(e) = read_parameter_setting(&mut cursor, store, reporter) {
            store.discard_line();
            return Err(e.into());
        }
    }
    store.commit_line()?;
    Ok(())
}
