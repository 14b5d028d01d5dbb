//! Errors raised while loading a data file.

use std::fmt;

use crate::data::hyperparameters::Hyperparameter;

/// A values section of a `DATA_SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Input,
    DesiredOutput,
}

impl Section {
    pub fn marker(self) -> &'static str {
        match self {
            Section::Input => "INPUT",
            Section::DesiredOutput => "DESIRED_OUTPUT",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Input => f.write_str("input"),
            Section::DesiredOutput => f.write_str("desired output"),
        }
    }
}

/// Which part of a record was still missing when it had to be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    Input,
    DesiredOutput,
    Both,
}

impl MissingData {
    pub(crate) fn from_flags(input_read: bool, desired_read: bool) -> Option<MissingData> {
        match (input_read, desired_read) {
            (true, true) => None,
            (false, true) => Some(MissingData::Input),
            (true, false) => Some(MissingData::DesiredOutput),
            (false, false) => Some(MissingData::Both),
        }
    }
}

impl fmt::Display for MissingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingData::Input => f.write_str("input data"),
            MissingData::DesiredOutput => f.write_str("desired output data"),
            MissingData::Both => f.write_str("input data and desired output data"),
        }
    }
}

/// Cause of a [`MalformedInputError`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MalformedKind {
    #[error("new DataSet encountered before {0} was loaded for the previous DataSet")]
    MissingRecordData(MissingData),

    #[error("NUM_INPUT, NUM_OUTPUT, NUM_HIDDEN, and LEARNING_RATE must be declared before a DATA_SET")]
    HyperparametersUndeclared,

    #[error("second {} specified for a single DataSet", .0)]
    DuplicateSection(Section),

    #[error("{} specified before any DATA_SET", .0.marker())]
    SectionOutsideDataSet(Section),

    #[error("'{token}' is not a valid floating-point value")]
    InvalidNumber { token: String },

    #[error("'{value}' is not a valid value for {name}")]
    InvalidHyperparameter { name: Hyperparameter, value: String },

    #[error("{0} declared without a value")]
    MissingHyperparameterValue(Hyperparameter),

    #[error("{name} changed from {previous} to {value} after the first DATA_SET")]
    HyperparameterChanged { name: Hyperparameter, previous: String, value: String },

    #[error("expected {expected} {section} values, found {found}")]
    ValueCountMismatch { section: Section, expected: usize, found: usize },

    #[error("end of input reached without any DataSet")]
    NoRecords,
}

/// A contract violation in the data file, with the 1-based line it was found on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("malformed data file at line {line}: {kind}")]
pub struct MalformedInputError {
    pub line: usize,
    pub kind: MalformedKind,
}

impl MalformedInputError {
    pub(crate) fn new(line: usize, kind: MalformedKind) -> Self {
        MalformedInputError { line, kind }
    }
}

/// Anything that can abort a load.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Malformed(#[from] MalformedInputError),

    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// The malformed-input cause, if this is not an I/O failure.
    pub fn malformed(&self) -> Option<&MalformedInputError> {
        match self {
            LoadError::Malformed(e) => Some(e),
            LoadError::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_message_names_the_gap() {
        let both = MalformedInputError::new(7, MalformedKind::MissingRecordData(MissingData::Both));
        assert_eq!(
            both.to_string(),
            "malformed data file at line 7: new DataSet encountered before input data and \
             desired output data was loaded for the previous DataSet"
        );
        let input = MalformedKind::MissingRecordData(MissingData::Input).to_string();
        assert!(input.contains("before input data was loaded"));
        let desired = MalformedKind::MissingRecordData(MissingData::DesiredOutput).to_string();
        assert!(desired.contains("before desired output data was loaded"));
    }

    #[test]
    fn flags_map_to_missing_data() {
        assert_eq!(MissingData::from_flags(true, true), None);
        assert_eq!(MissingData::from_flags(false, true), Some(MissingData::Input));
        assert_eq!(MissingData::from_flags(true, false), Some(MissingData::DesiredOutput));
        assert_eq!(MissingData::from_flags(false, false), Some(MissingData::Both));
    }

    #[test]
    fn duplicate_section_message() {
        let kind = MalformedKind::DuplicateSection(Section::DesiredOutput);
        assert_eq!(kind.to_string(), "second desired output specified for a single DataSet");
    }
}
