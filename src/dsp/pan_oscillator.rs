//! The panning oscillator: a sine LFO that sweeps a stereo signal between left and right.
//!
//! Per sample, the oscillator computes
//!
//! ```text
//! s     = (sin(phase) + 1) * double_pi / 4
//! left  = left  * cos(s)
//! right = right * sin(s)
//! phase = phase + 2 * double_pi / period_in_samples
//! ```
//!
//! Since both gains are taken from the same angle `s`, `left_gain² + right_gain² = 1`:
//! the panning is constant-power.
//!
//! # Legacy and corrected behaviour
//! The first version of this effect had three quirks, which are reproduced by
//! [`OscillatorSettings::legacy()`] (the default) so that existing sessions sound the same:
//!
//! * `double_pi` is `2 * 3.1459` (6.2918) instead of 2π;
//! * the phase, measured in radians, is reset to zero after a buffer once it exceeds
//!   the length of a period *in samples*, so in practice it keeps growing for a long time;
//! * the gain parameter has no effect.
//!
//! Additionally, the period is truncated to a whole number of samples.
//! [`OscillatorSettings::corrected()`] uses 2π, wraps the phase into `[0, 2π)` after every
//! sample, keeps the fractional period and applies the gain to the output.
//! The formulas themselves are the same in both modes: the angle `s` spans `[0, π]`
//! and the sweep completes two cycles per period.
use super::time::ms_to_sample_count;
use crate::error::RenderError;
use dasp_sample::{FromSample, Sample};
use std::f32::consts::PI;

/// The value used for "two pi" in the oscillator formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiConstant {
    /// `2 * 3.1459`.
    Legacy,
    /// 2π.
    Exact,
}

impl PiConstant {
    pub const LEGACY_DOUBLE_PI: f32 = 2.0 * 3.1459;

    #[inline]
    pub fn double_pi(self) -> f32 {
        match self {
            PiConstant::Legacy => Self::LEGACY_DOUBLE_PI,
            PiConstant::Exact => 2.0 * PI,
        }
    }
}

/// When the phase accumulator goes back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseReset {
    /// After each buffer, if the phase (in radians) is larger than the period in samples.
    /// The period is truncated to a whole number of samples.
    AfterBufferBySampleCount,
    /// After each sample, the phase is wrapped into `[0, 2π)`.
    WrapEverySample,
}

/// What the gain parameter does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainMode {
    /// The gain parameter is exposed to the host, but has no effect.
    Inert,
    /// Both channels are multiplied by the gain.
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OscillatorSettings {
    pub pi_constant: PiConstant,
    pub phase_reset: PhaseReset,
    pub gain_mode: GainMode,
}

impl OscillatorSettings {
    /// Sample-for-sample compatible with the first version.
    pub const fn legacy() -> Self {
        Self {
            pi_constant: PiConstant::Legacy,
            phase_reset: PhaseReset::AfterBufferBySampleCount,
            gain_mode: GainMode::Inert,
        }
    }

    pub const fn corrected() -> Self {
        Self {
            pi_constant: PiConstant::Exact,
            phase_reset: PhaseReset::WrapEverySample,
            gain_mode: GainMode::Output,
        }
    }
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self::legacy()
    }
}

/// The parameter values for one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanParameters {
    pub gain: f32,
    pub period_ms: f32,
}

pub struct PanOscillator {
    settings: OscillatorSettings,
    // In radians.
    phase: f32,
}

impl PanOscillator {
    pub fn new(settings: OscillatorSettings) -> Self {
        Self {
            settings,
            phase: 0.0,
        }
    }

    pub fn settings(&self) -> OscillatorSettings {
        self.settings
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// The number of samples in one period, or an error if that is not a positive number.
    pub fn period_in_samples(
        &self,
        sample_rate: f64,
        period_ms: f32,
    ) -> Result<f64, RenderError> {
        let period_samples = match self.settings.phase_reset {
            PhaseReset::AfterBufferBySampleCount => {
                // The milliseconds are converted to seconds in single precision
                // and the result is truncated.
                (sample_rate * (period_ms / 1000.0) as f64) as i32 as f64
            }
            PhaseReset::WrapEverySample => ms_to_sample_count(period_ms as f64, sample_rate),
        };
        if period_samples > 0.0 && period_samples.is_finite() {
            Ok(period_samples)
        } else {
            Err(RenderError::DegenerateOscillatorPeriod { period_samples })
        }
    }

    /// The phase increment per sample, in radians.
    pub fn radians_per_sample(&self, period_samples: f64) -> f32 {
        (2.0 * self.settings.pi_constant.double_pi()) / period_samples as f32
    }

    /// The gains for the left and the right channel at the given phase.
    #[inline]
    pub fn pan_gains(&self, phase: f32) -> (f32, f32) {
        let angle = (phase.sin() + 1.0) * self.settings.pi_constant.double_pi() / 4.0;
        (angle.cos(), angle.sin())
    }

    /// Pan one buffer in place.
    ///
    /// `left` and `right` must have the same length.
    /// On error, neither the samples nor the phase are changed.
    ///
    /// This method does not allocate and can be used in a real-time context.
    pub fn render<S>(
        &mut self,
        left: &mut [S],
        right: &mut [S],
        sample_rate: f64,
        parameters: PanParameters,
    ) -> Result<(), RenderError>
    where
        S: Sample,
    {
        debug_assert_eq!(left.len(), right.len());
        let period_samples = self.period_in_samples(sample_rate, parameters.period_ms)?;
        let radians_per_sample = self.radians_per_sample(period_samples);
        // A period that is positive in double precision can still vanish in single precision.
        if !(radians_per_sample.is_finite() && radians_per_sample > 0.0) {
            return Err(RenderError::DegenerateOscillatorPeriod { period_samples });
        }
        let gain = match self.settings.gain_mode {
            GainMode::Inert => 1.0,
            GainMode::Output => parameters.gain,
        };
        let full_circle = 2.0 * PI;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (left_gain, right_gain) = self.pan_gains(self.phase);
            *l = l.mul_amp(<S::Float as FromSample<f32>>::from_sample_(left_gain * gain));
            *r = r.mul_amp(<S::Float as FromSample<f32>>::from_sample_(right_gain * gain));

            match self.settings.phase_reset {
                PhaseReset::AfterBufferBySampleCount => self.phase += radians_per_sample,
                PhaseReset::WrapEverySample => {
                    self.phase = (self.phase + radians_per_sample).rem_euclid(full_circle);
                    // `rem_euclid` may round up to `full_circle`.
                    if self.phase >= full_circle {
                        self.phase = 0.0;
                    }
                }
            }
        }

        if self.settings.phase_reset == PhaseReset::AfterBufferBySampleCount
            && self.phase as f64 > period_samples
        {
            self.phase = 0.0;
        }
        Ok(())
    }
}

impl Default for PanOscillator {
    fn default() -> Self {
        Self::new(OscillatorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn render_constant(
        oscillator: &mut PanOscillator,
        frames: usize,
        sample_rate: f64,
        parameters: PanParameters,
    ) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![1.0_f32; frames];
        let mut right = vec![1.0_f32; frames];
        oscillator
            .render(&mut left, &mut right, sample_rate, parameters)
            .expect("valid period");
        (left, right)
    }

    const DEFAULT_PARAMETERS: PanParameters = PanParameters {
        gain: 0.5,
        period_ms: 2490.0,
    };

    #[test]
    fn ten_samples_at_48_khz_match_the_formulas() {
        let expected = [
            (-0.0021537, 0.9999977),
            (-0.0023193, 0.9999973),
            (-0.0024848, 0.9999969),
            (-0.0026505, 0.9999965),
            (-0.0028161, 0.9999960),
            (-0.0029817, 0.9999956),
            (-0.0031473, 0.9999950),
            (-0.0033129, 0.9999945),
            (-0.0034786, 0.9999939),
            (-0.0036441, 0.9999934),
        ];
        let mut oscillator = PanOscillator::default();
        let (left, right) = render_constant(&mut oscillator, 10, 48000.0, DEFAULT_PARAMETERS);
        for (index, (expected_left, expected_right)) in expected.iter().enumerate() {
            assert!(
                (left[index] - expected_left).abs() < TOLERANCE,
                "left sample #{}: expected {} but got {}",
                index,
                expected_left,
                left[index]
            );
            assert!(
                (right[index] - expected_right).abs() < TOLERANCE,
                "right sample #{}: expected {} but got {}",
                index,
                expected_right,
                right[index]
            );
        }
    }

    #[test]
    fn legacy_period_is_truncated_to_whole_samples() {
        let oscillator = PanOscillator::default();
        assert_eq!(oscillator.period_in_samples(48000.0, 2490.0), Ok(119520.0));
        // 10 / 1000 is slightly less than 0.01 in single precision.
        assert_eq!(oscillator.period_in_samples(1000.0, 10.0), Ok(9.0));
    }

    #[test]
    fn corrected_period_keeps_fractions() {
        let oscillator = PanOscillator::new(OscillatorSettings::corrected());
        let period = oscillator.period_in_samples(44100.0, 10.0).unwrap();
        assert!((period - 441.0).abs() < 1e-3);
    }

    #[test]
    fn legacy_double_pi_is_not_two_pi() {
        assert!((PiConstant::Legacy.double_pi() - 6.2918).abs() < 1e-6);
        assert!((PiConstant::Exact.double_pi() - 6.283_185_3).abs() < 1e-6);
    }

    #[test]
    fn single_sample_advances_phase_by_one_step() {
        let mut oscillator = PanOscillator::default();
        let step = oscillator.radians_per_sample(119520.0);
        render_constant(&mut oscillator, 1, 48000.0, DEFAULT_PARAMETERS);
        assert_eq!(oscillator.phase(), step);
    }

    #[test]
    fn empty_buffer_leaves_phase_untouched() {
        let mut oscillator = PanOscillator::default();
        render_constant(&mut oscillator, 0, 48000.0, DEFAULT_PARAMETERS);
        assert_eq!(oscillator.phase(), 0.0);
    }

    #[test]
    fn panning_is_constant_power() {
        for settings in [OscillatorSettings::legacy(), OscillatorSettings::corrected()].iter() {
            let mut oscillator = PanOscillator::new(OscillatorSettings {
                gain_mode: GainMode::Inert,
                ..*settings
            });
            let parameters = PanParameters {
                gain: 1.0,
                period_ms: 10.0,
            };
            let (left, right) = render_constant(&mut oscillator, 2000, 44100.0, parameters);
            for (l, r) in left.iter().zip(right.iter()) {
                assert!((l * l + r * r - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn legacy_phase_is_not_wrapped_at_two_pi() {
        let mut oscillator = PanOscillator::default();
        let parameters = PanParameters {
            gain: 0.5,
            period_ms: 125.0,
        };
        // 80 Hz * 0.125 s = 10 samples per period, 1.25836 radians per sample.
        render_constant(&mut oscillator, 6, 80.0, parameters);
        assert!(oscillator.phase() > 2.0 * PI);
    }

    #[test]
    fn legacy_phase_resets_after_the_buffer_in_which_it_exceeds_the_sample_count() {
        let parameters = PanParameters {
            gain: 0.5,
            period_ms: 125.0,
        };
        let mut oscillator = PanOscillator::default();
        // After 4 samples: 5.03 radians, after 8 samples: 10.07 radians > 10 samples.
        let first = render_constant(&mut oscillator, 4, 80.0, parameters);
        assert!(oscillator.phase() > 5.0);
        let second = render_constant(&mut oscillator, 4, 80.0, parameters);
        assert_eq!(oscillator.phase(), 0.0);
        let third = render_constant(&mut oscillator, 4, 80.0, parameters);
        let fourth = render_constant(&mut oscillator, 4, 80.0, parameters);
        assert_eq!(first, third);
        assert_eq!(second, fourth);
        assert_ne!(first, second);
    }

    #[test]
    fn corrected_output_is_periodic_with_the_period_in_samples() {
        let mut oscillator = PanOscillator::new(OscillatorSettings {
            gain_mode: GainMode::Inert,
            ..OscillatorSettings::corrected()
        });
        let parameters = PanParameters {
            gain: 1.0,
            period_ms: 100.0,
        };
        let (left, right) = render_constant(&mut oscillator, 400, 1000.0, parameters);
        for index in 0..300 {
            assert!((left[index] - left[index + 100]).abs() < 1e-4);
            assert!((right[index] - right[index + 100]).abs() < 1e-4);
        }
        assert!(oscillator.phase() >= 0.0 && oscillator.phase() < 2.0 * PI);
    }

    #[test]
    fn phase_is_continuous_across_buffers() {
        for settings in [OscillatorSettings::legacy(), OscillatorSettings::corrected()].iter() {
            let mut whole = PanOscillator::new(*settings);
            let expected = render_constant(&mut whole, 1000, 48000.0, DEFAULT_PARAMETERS);

            let mut pieces = PanOscillator::new(*settings);
            let mut left = Vec::new();
            let mut right = Vec::new();
            for frames in [7, 1, 300, 64, 628].iter() {
                let (l, r) = render_constant(&mut pieces, *frames, 48000.0, DEFAULT_PARAMETERS);
                left.extend(l);
                right.extend(r);
            }
            assert_eq!(expected, (left, right));
            assert_eq!(whole.phase(), pieces.phase());
        }
    }

    #[test]
    fn zero_sample_rate_leaves_everything_untouched() {
        let mut oscillator = PanOscillator::new(OscillatorSettings::corrected());
        let mut left = vec![0.25_f32; 4];
        let mut right = vec![0.75_f32; 4];
        let result = oscillator.render(&mut left, &mut right, 0.0, DEFAULT_PARAMETERS);
        assert_eq!(
            result,
            Err(RenderError::DegenerateOscillatorPeriod {
                period_samples: 0.0
            })
        );
        assert_eq!(left, vec![0.25; 4]);
        assert_eq!(right, vec![0.75; 4]);
        assert_eq!(oscillator.phase(), 0.0);
    }

    #[test]
    fn huge_phase_steps_stay_within_one_circle() {
        // At 1e-6 Hz, one sample is a million periods of 10 ms.
        let mut oscillator = PanOscillator::new(OscillatorSettings::corrected());
        let parameters = PanParameters {
            gain: 1.0,
            period_ms: 10.0,
        };
        let (left, right) = render_constant(&mut oscillator, 64, 1e-6, parameters);
        let phase = oscillator.phase();
        assert!(phase >= 0.0 && phase < 2.0 * PI, "phase {}", phase);
        for (l, r) in left.iter().zip(right.iter()) {
            assert!((l * l + r * r - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn period_vanishing_in_single_precision_is_degenerate() {
        let mut oscillator = PanOscillator::new(OscillatorSettings::corrected());
        let mut left = vec![0.25_f32; 4];
        let mut right = vec![0.75_f32; 4];
        // 1e-50 samples is positive as `f64` but zero as `f32`.
        let result = oscillator.render(&mut left, &mut right, 1e-48, DEFAULT_PARAMETERS);
        assert!(matches!(
            result,
            Err(RenderError::DegenerateOscillatorPeriod { .. })
        ));
        assert_eq!(left, vec![0.25; 4]);
        assert_eq!(right, vec![0.75; 4]);
        assert_eq!(oscillator.phase(), 0.0);
    }

    #[test]
    fn legacy_period_truncating_to_zero_is_degenerate() {
        let mut oscillator = PanOscillator::default();
        let mut left = vec![1.0_f32; 2];
        let mut right = vec![1.0_f32; 2];
        let parameters = PanParameters {
            gain: 0.5,
            period_ms: 10.0,
        };
        // 50 Hz * 0.01 s = half a sample.
        assert!(oscillator
            .render(&mut left, &mut right, 50.0, parameters)
            .is_err());
        assert_eq!(left, vec![1.0; 2]);
    }

    #[test]
    fn gain_is_applied_only_in_output_mode() {
        let parameters = PanParameters {
            gain: 0.5,
            period_ms: 500.0,
        };
        let mut inert = PanOscillator::new(OscillatorSettings {
            gain_mode: GainMode::Inert,
            ..OscillatorSettings::corrected()
        });
        let mut output = PanOscillator::new(OscillatorSettings::corrected());
        let (inert_left, inert_right) = render_constant(&mut inert, 32, 44100.0, parameters);
        let (left, right) = render_constant(&mut output, 32, 44100.0, parameters);
        for index in 0..32 {
            assert!((left[index] - 0.5 * inert_left[index]).abs() < 1e-6);
            assert!((right[index] - 0.5 * inert_right[index]).abs() < 1e-6);
        }
    }

    #[test]
    fn renders_double_precision_samples() {
        let mut single = PanOscillator::default();
        let (left32, right32) = render_constant(&mut single, 16, 48000.0, DEFAULT_PARAMETERS);

        let mut double = PanOscillator::default();
        let mut left = vec![1.0_f64; 16];
        let mut right = vec![1.0_f64; 16];
        double
            .render(&mut left, &mut right, 48000.0, DEFAULT_PARAMETERS)
            .unwrap();
        for index in 0..16 {
            assert!((left[index] - left32[index] as f64).abs() < 1e-6);
            assert!((right[index] - right32[index] as f64).abs() < 1e-6);
        }
    }
}
