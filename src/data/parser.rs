//! Loader for the marker-based data file format.
//!
//! ```text
//! NUM_INPUT
//! 2
//! NUM_OUTPUT
//! 1
//! NUM_HIDDEN
//! 2
//! LEARNING_RATE
//! 0.5
//! DATA_SET
//! INPUT
//! 0, 1
//! DESIRED_OUTPUT
//! 1
//! ```
//!
//! Each hyperparameter marker takes the next non-empty line as its value.
//! `INPUT` and `DESIRED_OUTPUT` take every following line as comma-separated
//! numbers until the next marker. Lines that are not markers are ignored
//! outside of a values section.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace};

use crate::data::error::{LoadError, MalformedInputError, MalformedKind, MissingData, Section};
use crate::data::hyperparameters::{Hyperparameter, Hyperparameters, PartialHyperparameters};
use crate::data::record::Record;

/// Everything a data file declares.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub hyperparameters: Hyperparameters,
    pub records: Vec<Record>,
}

/// Parses already-split lines. Line numbers in errors are 1-based positions
/// in `lines`.
pub fn parse_lines<I, S>(lines: I) -> Result<Dataset, MalformedInputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = Scanner::default();
    for line in lines {
        scanner.feed(line.as_ref())?;
    }
    scanner.finish()
}

/// Streams lines from `reader` through the scanner.
pub fn load_from_reader<R: BufRead>(reader: R) -> Result<Dataset, LoadError> {
    let mut scanner = Scanner::default();
    for line in reader.lines() {
        scanner.feed(&line?)?;
    }
    Ok(scanner.finish()?)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    debug!("loading data sets from {:?}", path);
    let file = File::open(path)?;
    load_from_reader(BufReader::new(file))
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the next marker; anything else is skipped.
    Scanning,
    /// The previous marker was a hyperparameter; its value is the next non-empty line.
    ExpectHyperparamValue(Hyperparameter),
    /// Inside an `INPUT` or `DESIRED_OUTPUT` section.
    ExpectValues(Section),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Hyperparameter(Hyperparameter),
    DataSet,
    Section(Section),
}

impl Marker {
    fn recognize(line: &str) -> Option<Marker> {
        match line {
            "NUM_INPUT" => Some(Marker::Hyperparameter(Hyperparameter::NumInput)),
            "NUM_OUTPUT" => Some(Marker::Hyperparameter(Hyperparameter::NumOutput)),
            "NUM_HIDDEN" => Some(Marker::Hyperparameter(Hyperparameter::NumHidden)),
            "LEARNING_RATE" => Some(Marker::Hyperparameter(Hyperparameter::LearningRate)),
            "DATA_SET" => Some(Marker::DataSet),
            "INPUT" => Some(Marker::Section(Section::Input)),
            "DESIRED_OUTPUT" => Some(Marker::Section(Section::DesiredOutput)),
            _ => None,
        }
    }
}

/// Values collected for the `DATA_SET` currently being read.
#[derive(Debug, Default)]
struct PendingRecord {
    input: Option<Vec<f64>>,
    desired: Option<Vec<f64>>,
}

impl PendingRecord {
    fn missing(&self) -> Option<MissingData> {
        MissingData::from_flags(self.input.is_some(), self.desired.is_some())
    }

    fn has(&self, section: Section) -> bool {
        match section {
            Section::Input => self.input.is_some(),
            Section::DesiredOutput => self.desired.is_some(),
        }
    }

    fn slot(&mut self, section: Section) -> &mut Option<Vec<f64>> {
        match section {
            Section::Input => &mut self.input,
            Section::DesiredOutput => &mut self.desired,
        }
    }
}

#[derive(Debug)]
struct Scanner {
    state: State,
    /// 1-based number of the line most recently fed.
    line: usize,
    declared: PartialHyperparameters,
    /// Snapshot taken at the first `DATA_SET`; hyperparameters are fixed from then on.
    fixed: Option<Hyperparameters>,
    /// `None` until the first `DATA_SET`.
    pending: Option<PendingRecord>,
    section_values: Vec<f64>,
    section_line: usize,
    records: Vec<Record>,
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner {
            state: State::Scanning,
            line: 0,
            declared: PartialHyperparameters::default(),
            fixed: None,
            pending: None,
            section_values: Vec::new(),
            section_line: 0,
            records: Vec::new(),
        }
    }
}

impl Scanner {
    fn error(&self, kind: MalformedKind) -> MalformedInputError {
        MalformedInputError::new(self.line, kind)
    }

    fn feed(&mut self, raw: &str) -> Result<(), MalformedInputError> {
        self.line += 1;
        let line = raw.trim();

        match self.state {
            State::Scanning => {
                if let Some(marker) = Marker::recognize(line) {
                    self.on_marker(marker)?;
                }
            }
            State::ExpectHyperparamValue(name) => {
                if !line.is_empty() {
                    self.set_hyperparameter(name, line)?;
                    self.state = State::Scanning;
                }
            }
            State::ExpectValues(section) => match Marker::recognize(line) {
                Some(marker) => {
                    self.close_section(section)?;
                    self.state = State::Scanning;
                    self.on_marker(marker)?;
                }
                None => self.push_values(line)?,
            },
        }
        Ok(())
    }

    fn on_marker(&mut self, marker: Marker) -> Result<(), MalformedInputError> {
        match marker {
            Marker::Hyperparameter(name) => {
                self.state = State::ExpectHyperparamValue(name);
            }
            Marker::DataSet => {
                if let Some(missing) = self.pending.as_ref().and_then(PendingRecord::missing) {
                    return Err(self.error(MalformedKind::MissingRecordData(missing)));
                }
                let Some(hyperparameters) = self.declared.complete() else {
                    return Err(self.error(MalformedKind::HyperparametersUndeclared));
                };
                if self.fixed.is_none() {
                    debug!("hyperparameters fixed at line {}: {:?}", self.line, hyperparameters);
                    self.fixed = Some(hyperparameters);
                }
                self.pending = Some(PendingRecord::default());
            }
            Marker::Section(section) => {
                let already_read = match &self.pending {
                    Some(pending) => pending.has(section),
                    None => return Err(self.error(MalformedKind::SectionOutsideDataSet(section))),
                };
                if already_read {
                    return Err(self.error(MalformedKind::DuplicateSection(section)));
                }
                self.section_values.clear();
                self.section_line = self.line;
                self.state = State::ExpectValues(section);
            }
        }
        Ok(())
    }

    fn push_values(&mut self, line: &str) -> Result<(), MalformedInputError> {
        for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<f64>() {
                Ok(value) if value.is_finite() => self.section_values.push(value),
                _ => {
                    return Err(self.error(MalformedKind::InvalidNumber { token: token.to_string() }));
                }
            }
        }
        Ok(())
    }

    /// Stores the values of a finished section and materializes the record
    /// once both sections are present.
    fn close_section(&mut self, section: Section) -> Result<(), MalformedInputError> {
        // A section can only be opened after a DATA_SET, which fixes the hyperparameters.
        let (Some(fixed), Some(pending)) = (self.fixed, self.pending.as_mut()) else {
            return Ok(());
        };
        let expected = match section {
            Section::Input => fixed.num_inputs,
            Section::DesiredOutput => fixed.num_outputs,
        };
        let found = self.section_values.len();
        if found != expected {
            return Err(MalformedInputError::new(
                self.section_line,
                MalformedKind::ValueCountMismatch { section, expected, found },
            ));
        }
        *pending.slot(section) = Some(std::mem::take(&mut self.section_values));

        if let (Some(input), Some(desired)) = (&pending.input, &pending.desired) {
            let record = Record::new(input.clone(), desired.clone(), fixed.num_hidden);
            trace!("loaded data set {} ending at line {}", self.records.len() + 1, self.line);
            self.records.push(record);
        }
        Ok(())
    }

    fn set_hyperparameter(&mut self, name: Hyperparameter, value: &str) -> Result<(), MalformedInputError> {
        let invalid = || MalformedKind::InvalidHyperparameter { name, value: value.to_string() };

        match name {
            Hyperparameter::LearningRate => {
                let rate = value.parse::<f64>().ok()
                    .filter(|r| r.is_finite() && *r > 0.0)
                    .ok_or_else(|| self.error(invalid()))?;
                if let Some(fixed) = self.fixed {
                    if fixed.learning_rate != rate {
                        return Err(self.error(MalformedKind::HyperparameterChanged {
                            name,
                            previous: fixed.learning_rate.to_string(),
                            value: value.to_string(),
                        }));
                    }
                }
                self.declared.learning_rate = Some(rate);
            }
            _ => {
                let count = value.parse::<usize>().ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| self.error(invalid()))?;
                if let Some(fixed) = self.fixed {
                    let previous = match name {
                        Hyperparameter::NumInput => fixed.num_inputs,
                        Hyperparameter::NumOutput => fixed.num_outputs,
                        _ => fixed.num_hidden,
                    };
                    if previous != count {
                        return Err(self.error(MalformedKind::HyperparameterChanged {
                            name,
                            previous: previous.to_string(),
                            value: value.to_string(),
                        }));
                    }
                }
                match name {
                    Hyperparameter::NumInput => self.declared.num_inputs = Some(count),
                    Hyperparameter::NumOutput => self.declared.num_outputs = Some(count),
                    _ => self.declared.num_hidden = Some(count),
                }
            }
        }
        debug!("{} = {}", name, value);
        Ok(())
    }

    fn finish(mut self) -> Result<Dataset, MalformedInputError> {
        match self.state {
            State::ExpectHyperparamValue(name) => {
                return Err(self.error(MalformedKind::MissingHyperparameterValue(name)));
            }
            State::ExpectValues(section) => self.close_section(section)?,
            State::Scanning => {}
        }

        if let Some(missing) = self.pending.as_ref().and_then(PendingRecord::missing) {
            return Err(self.error(MalformedKind::MissingRecordData(missing)));
        }

        match self.fixed {
            Some(hyperparameters) if !self.records.is_empty() => {
                info!(
                    "loaded {} data sets ({} inputs, {} outputs, {} hidden, learning rate {})",
                    self.records.len(),
                    hyperparameters.num_inputs,
                    hyperparameters.num_outputs,
                    hyperparameters.num_hidden,
                    hyperparameters.learning_rate,
                );
                Ok(Dataset { hyperparameters, records: self.records })
            }
            _ => Err(self.error(MalformedKind::NoRecords)),
        }
    }
}
