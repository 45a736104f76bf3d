//! Errors that can occur while rendering a single audio buffer.
//!
//! None of these errors is fatal: the buffer is left untouched (which amounts to
//! passing the input through) and the next buffer is rendered as usual.
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderError {
    /// The buffer has fewer than two channels, so there is nothing to pan between.
    InvalidChannelLayout { channels: usize },
    /// The number of samples in one oscillation period is not a positive, finite number.
    /// This happens when the host reports a sample rate of zero.
    DegenerateOscillatorPeriod { period_samples: f64 },
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            RenderError::InvalidChannelLayout { channels } => write!(
                f,
                "Invalid channel layout: expected two channels, but got {}",
                channels
            ),
            RenderError::DegenerateOscillatorPeriod { period_samples } => write!(
                f,
                "Degenerate oscillator period: {} samples per period",
                period_samples
            ),
        }
    }
}

impl Error for RenderError {}

#[test]
fn display_mentions_the_number_of_channels() {
    let error = RenderError::InvalidChannelLayout { channels: 1 };
    assert_eq!(
        error.to_string(),
        "Invalid channel layout: expected two channels, but got 1"
    );
}
