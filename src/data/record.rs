use std::fmt;

/// Constant value of the bias unit appended to the input and hidden layers.
pub const BIAS: f64 = 1.0;

/// One training example together with the scratch values of its last
/// forward pass.
///
/// `input` always ends in the bias constant, as does `hidden`. Only the
/// non-bias slots are ever written by the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) input: Vec<f64>,
    desired: Vec<f64>,
    pub(crate) hidden_raw: Vec<f64>,
    pub(crate) hidden: Vec<f64>,
    pub(crate) output_raw: Vec<f64>,
    pub(crate) output: Vec<f64>,
}

impl Record {
    /// Builds a record from its declared values; the bias unit is appended here.
    pub fn new(mut input: Vec<f64>, desired: Vec<f64>, num_hidden: usize) -> Record {
        input.push(BIAS);
        let num_outputs = desired.len();
        let mut record = Record {
            input,
            desired,
            hidden_raw: Vec::new(),
            hidden: Vec::new(),
            output_raw: Vec::new(),
            output: Vec::new(),
        };
        record.reset(num_hidden, num_outputs);
        record
    }

    /// Reallocates the scratch arrays at the given sizes and re-fixes the
    /// hidden bias entry.
    pub fn reset(&mut self, num_hidden: usize, num_outputs: usize) {
        self.hidden_raw = vec![0.0; num_hidden];
        self.hidden = vec![0.0; num_hidden + 1];
        self.hidden[num_hidden] = BIAS;
        self.output_raw = vec![0.0; num_outputs];
        self.output = vec![0.0; num_outputs];
    }

    /// Input activations including the trailing bias unit.
    pub fn input(&self) -> &[f64] { &self.input }

    /// Input values as declared in the data file, without the bias unit.
    pub fn input_values(&self) -> &[f64] { &self.input[..self.input.len() - 1] }

    pub fn desired(&self) -> &[f64] { &self.desired }

    pub fn hidden_raw(&self) -> &[f64] { &self.hidden_raw }

    /// Hidden activations including the trailing bias unit.
    pub fn hidden(&self) -> &[f64] { &self.hidden }

    pub fn output_raw(&self) -> &[f64] { &self.output_raw }

    pub fn output(&self) -> &[f64] { &self.output }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, self.input_values(), &self.output, &self.desired)
    }
}

/// Three-line listing of inputs, outputs (2 decimals) and desired values.
/// Values print in `{:?}` form, so whole numbers keep their `.0`.
pub(crate) fn write_summary(
    f: &mut fmt::Formatter<'_>,
    inputs: &[f64],
    outputs: &[f64],
    desired: &[f64],
) -> fmt::Result {
    let inputs: Vec<String> = inputs.iter().map(|x| format!("{x:?}")).collect();
    let outputs: Vec<String> = outputs.iter().map(|x| format!("{x:.2}")).collect();
    let desired: Vec<String> = desired.iter().map(|x| format!("{x:?}")).collect();
    writeln!(f, "Inputs:  \t[{}]", inputs.join(", "))?;
    writeln!(f, "Outputs:\t[{}]", outputs.join(", "))?;
    writeln!(f, "Desired:\t[{}]", desired.join(", "))
}
