//! Parameters that the host can automate.
//!
//! A [`FloatParameter`] is written from the host's user interface or automation thread
//! and read from the audio thread. The value is stored as the bit pattern of an `f32`
//! in an `AtomicU32`, so neither side ever blocks. A read may observe a value that is one
//! write behind, which is fine for audio parameters.
use std::fmt::{Error, Write};
use std::sync::atomic::{AtomicU32, Ordering};

/// Static description of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo {
    /// Identifier, stable across versions.
    pub id: &'static str,
    /// Name shown to the user.
    pub name: &'static str,
    /// Unit, e.g. "ms".
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterInfo {
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.max(self.min).min(self.max)
    }

    /// Map a plain value in `[min, max]` to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        (self.clamp(value) - self.min) / (self.max - self.min)
    }

    /// Map a value in `[0, 1]` to `[min, max]`.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = if normalized.is_nan() {
            self.normalize(self.default)
        } else {
            normalized.max(0.0).min(1.0)
        };
        self.min + normalized * (self.max - self.min)
    }
}

/// A parameter with a floating point value.
#[derive(Debug)]
pub struct FloatParameter {
    info: ParameterInfo,
    value: AtomicU32,
}

impl FloatParameter {
    pub fn new(info: ParameterInfo) -> Self {
        Self {
            value: AtomicU32::new(info.default.to_bits()),
            info,
        }
    }

    pub fn info(&self) -> &ParameterInfo {
        &self.info
    }

    /// The current value, in `[min, max]`.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Set the value. Values outside `[min, max]` are clamped, NaN resets to the default.
    pub fn set(&self, value: f32) {
        self.value
            .store(self.info.clamp(value).to_bits(), Ordering::Relaxed);
    }

    pub fn get_normalized(&self) -> f32 {
        self.info.normalize(self.get())
    }

    pub fn set_normalized(&self, normalized: f32) {
        self.set(self.info.denormalize(normalized));
    }

    pub fn reset(&self) {
        self.set(self.info.default);
    }

    /// Write the current value as text, without the unit.
    pub fn write_value<W: Write>(&self, buffer: &mut W) -> Result<(), Error> {
        write!(buffer, "{:.2}", self.get())
    }

    /// Parse `text` and set the value. Returns `false` if `text` is not a number.
    pub fn set_from_text(&self, text: &str) -> bool {
        let text = text.trim();
        let text = text.strip_suffix(self.info.label).unwrap_or(text).trim();
        match text.parse::<f32>() {
            Ok(value) => {
                self.set(value);
                true
            }
            Err(_) => false,
        }
    }
}

/// Gives the host indexed access to the parameters of a plugin.
///
/// Implementors are shared between the audio thread and the host's other threads,
/// hence the `Sync` bound.
pub trait ParameterHost: Sync {
    fn number_of_parameters(&self) -> usize;

    /// The parameter with the given index, or `None` if `index` is out of range.
    fn parameter(&self, index: usize) -> Option<&FloatParameter>;

    fn parameter_by_id(&self, id: &str) -> Option<&FloatParameter> {
        (0..self.number_of_parameters())
            .filter_map(|index| self.parameter(index))
            .find(|parameter| parameter.info().id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: ParameterInfo = ParameterInfo {
        id: "mS",
        name: "MilliSeconds",
        label: "ms",
        min: 10.0,
        max: 5000.0,
        default: 2490.0,
    };

    #[test]
    fn starts_at_default() {
        let parameter = FloatParameter::new(PERIOD);
        assert_eq!(parameter.get(), 2490.0);
    }

    #[test]
    fn set_clamps_to_range() {
        let parameter = FloatParameter::new(PERIOD);
        parameter.set(1.0);
        assert_eq!(parameter.get(), 10.0);
        parameter.set(10_000.0);
        assert_eq!(parameter.get(), 5000.0);
        parameter.set(std::f32::NAN);
        assert_eq!(parameter.get(), 2490.0);
    }

    #[test]
    fn normalized_values_map_to_range() {
        let parameter = FloatParameter::new(PERIOD);
        parameter.set_normalized(0.0);
        assert_eq!(parameter.get(), 10.0);
        parameter.set_normalized(1.0);
        assert_eq!(parameter.get(), 5000.0);
        parameter.set(2505.0);
        assert!((parameter.get_normalized() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn text_with_or_without_unit_is_accepted() {
        let parameter = FloatParameter::new(PERIOD);
        assert!(parameter.set_from_text(" 125 ms"));
        assert_eq!(parameter.get(), 125.0);
        assert!(parameter.set_from_text("300"));
        assert_eq!(parameter.get(), 300.0);
        assert!(!parameter.set_from_text("fast"));
        assert_eq!(parameter.get(), 300.0);
    }

    #[test]
    fn write_value_uses_two_decimals() {
        let parameter = FloatParameter::new(PERIOD);
        let mut text = String::new();
        parameter.write_value(&mut text).unwrap();
        assert_eq!(text, "2490.00");
    }
}
