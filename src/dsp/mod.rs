//! Signal processing.
pub mod pan_oscillator;
pub mod time;

pub use self::pan_oscillator::{
    GainMode, OscillatorSettings, PanOscillator, PanParameters, PhaseReset, PiConstant,
};
