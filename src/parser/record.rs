//! Statistics records and body line classification.

use crate::utils::config::{
    CALL_FILE_PREFIX, CALL_FUNCTION_PREFIX, CALL_TARGET_PREFIX, FILE_PREFIX, FUNCTION_PREFIX,
};
use crate::utils::error::ParseError;
use std::fmt;

/// One per-position statistics record
///
/// Wire form is `<instr> <line> <v_1> ... <v_k>` where `k` is the number of
/// declared events. The writer that produces these files pads lines with
/// trailing spaces, so parsing is whitespace-tolerant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    /// Instruction index within the instrumented artifact
    pub instr: u64,
    /// Source line number
    pub line: u64,
    /// One counter per declared event, in declaration order
    pub values: Vec<u64>,
}

impl StatRecord {
    /// Parse a record from its wire form
    ///
    /// # Errors
    /// * `ParseError::MalformedRecord` - fewer than two fields, or a field
    ///   that is not an unsigned integer
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut fields = Vec::new();
        for field in text.split_whitespace() {
            match field.parse::<u64>() {
                Ok(value) => fields.push(value),
                Err(_) => return Err(ParseError::MalformedRecord(text.to_string())),
            }
        }

        if fields.len() < 2 {
            return Err(ParseError::MalformedRecord(text.to_string()));
        }
        let values = fields.split_off(2);

        Ok(Self {
            instr: fields[0],
            line: fields[1],
            values,
        })
    }

    /// Position pair used for alignment checks
    pub fn position(&self) -> (u64, u64) {
        (self.instr, self.line)
    }
}

impl fmt::Display for StatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.instr, self.line)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

/// True for `fl=` / `fn=` source structure markers
pub fn is_marker_line(line: &str) -> bool {
    line.starts_with(FILE_PREFIX) || line.starts_with(FUNCTION_PREFIX)
}

/// True for any call block directive (`cfl=`, `cfn=`, `calls=`)
pub fn is_call_line(line: &str) -> bool {
    line.starts_with(CALL_FILE_PREFIX)
        || line.starts_with(CALL_FUNCTION_PREFIX)
        || line.starts_with(CALL_TARGET_PREFIX)
}
