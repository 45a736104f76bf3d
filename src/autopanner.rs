//! The autopanner plugin: the panning oscillator together with its parameters and meta-data.
use crate::backend::HostInterface;
use crate::buffer::AudioBufferInOut;
use crate::dsp::{OscillatorSettings, PanOscillator, PanParameters};
use crate::error::RenderError;
use crate::meta::{InOut, Meta, MetaData};
use crate::parameter::{FloatParameter, ParameterHost, ParameterInfo};
use crate::{AudioHandler, ContextualAudioRenderer};
use dasp_sample::Sample;
use std::sync::Arc;

pub const GAIN: ParameterInfo = ParameterInfo {
    id: "gain",
    name: "Gain",
    label: "",
    min: 0.0,
    max: 1.0,
    default: 0.5,
};

pub const PERIOD: ParameterInfo = ParameterInfo {
    id: "mS",
    name: "MilliSeconds",
    label: "ms",
    min: 10.0,
    max: 5000.0,
    default: 2490.0,
};

/// The parameters of the autopanner, shared between the audio thread and the host.
#[derive(Debug)]
pub struct AutopannerParameters {
    pub gain: FloatParameter,
    pub period_ms: FloatParameter,
}

impl AutopannerParameters {
    pub fn new() -> Self {
        Self {
            gain: FloatParameter::new(GAIN),
            period_ms: FloatParameter::new(PERIOD),
        }
    }

    /// The current values, read once per buffer.
    #[inline]
    pub fn current(&self) -> PanParameters {
        PanParameters {
            gain: self.gain.get(),
            period_ms: self.period_ms.get(),
        }
    }
}

impl Default for AutopannerParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterHost for AutopannerParameters {
    fn number_of_parameters(&self) -> usize {
        2
    }

    fn parameter(&self, index: usize) -> Option<&FloatParameter> {
        match index {
            0 => Some(&self.gain),
            1 => Some(&self.period_ms),
            _ => None,
        }
    }
}

pub struct Autopanner {
    meta: MetaData<&'static str, &'static str>,
    parameters: Arc<AutopannerParameters>,
    oscillator: PanOscillator,
    sample_rate: f64,
    // Why the previous buffer was passed through, if it was.
    last_error: Option<RenderError>,
    // Logged outside of `render_buffer`.
    unreported_error: Option<RenderError>,
}

impl Autopanner {
    pub const NAME: &'static str = "Autopanner";
    const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

    fn meta_data() -> MetaData<&'static str, &'static str> {
        MetaData {
            general_meta: Self::NAME,
            audio_port_meta: InOut {
                inputs: vec!["left in", "right in"],
                outputs: vec!["left out", "right out"],
            },
        }
    }

    pub fn new() -> Self {
        Self::with_settings(OscillatorSettings::default())
    }

    pub fn with_settings(settings: OscillatorSettings) -> Self {
        info!("Creating autopanner with {:?}", settings);
        Self {
            meta: Self::meta_data(),
            parameters: Arc::new(AutopannerParameters::new()),
            oscillator: PanOscillator::new(settings),
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            last_error: None,
            unreported_error: None,
        }
    }

    /// The parameters. Clone the `Arc` to change them from another thread.
    pub fn parameters(&self) -> &Arc<AutopannerParameters> {
        &self.parameters
    }

    pub fn settings(&self) -> OscillatorSettings {
        self.oscillator.settings()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn phase(&self) -> f32 {
        self.oscillator.phase()
    }

    /// Whether the last buffer was passed through unchanged because it could not be panned.
    pub fn is_bypassed(&self) -> bool {
        self.last_error.is_some()
    }

    /// Why the last buffer was passed through unchanged, if it was.
    pub fn last_error(&self) -> Option<RenderError> {
        self.last_error
    }

    /// Start the oscillator from the beginning, e.g. when the host restarts playback.
    pub fn reset(&mut self) {
        self.report_render_error();
        debug!("Resetting the oscillator phase.");
        self.oscillator.reset();
    }

    /// Log the first render error since the last successful buffer, if it has not been
    /// logged yet, and return it.
    ///
    /// `render_buffer` does not log, since logging may lock and allocate.
    /// This is called from `reset` and `set_sample_rate`, which hosts do not call
    /// from the audio thread.
    pub fn report_render_error(&mut self) -> Option<RenderError> {
        let error = self.unreported_error.take();
        if let Some(e) = error {
            warn!("{}. The audio was passed through.", e);
        }
        error
    }

    /// Mono and stereo are supported, as long as there are as many inputs as outputs.
    /// Mono audio is passed through unchanged.
    pub fn is_layout_supported(inputs: usize, outputs: usize) -> bool {
        inputs == outputs && (inputs == 1 || inputs == 2)
    }

    // Only remembers the error: no logging on the audio thread.
    fn record(&mut self, result: Result<(), RenderError>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                if self.last_error.is_none() && self.unreported_error.is_none() {
                    self.unreported_error = Some(e);
                }
                self.last_error = Some(e);
            }
        }
    }
}

impl Default for Autopanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Meta for Autopanner {
    type MetaData = MetaData<&'static str, &'static str>;

    fn meta(&self) -> &Self::MetaData {
        &self.meta
    }
}

impl AudioHandler for Autopanner {
    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.report_render_error();
        info!("Sample rate set to {} Hz", sample_rate);
        self.sample_rate = sample_rate;
    }
}

impl<S, H> ContextualAudioRenderer<S, H> for Autopanner
where
    S: Sample,
    H: HostInterface,
{
    fn render_buffer(&mut self, buffer: &mut AudioBufferInOut<S>, context: &mut H) {
        if !context.output_initialized() {
            buffer.outputs().set(S::EQUILIBRIUM);
        }
        buffer.pass_through();

        let parameters = self.parameters.current();
        let channels = buffer.number_of_output_channels();
        let result = if Self::is_layout_supported(buffer.number_of_input_channels(), channels) {
            match buffer.outputs().split_stereo() {
                Some((left, right)) => {
                    self.oscillator
                        .render(left, right, self.sample_rate, parameters)
                }
                None => Err(RenderError::InvalidChannelLayout { channels }),
            }
        } else {
            Err(RenderError::InvalidChannelLayout { channels })
        };
        self.record(result);
    }
}
