//! Wrapper for the VST 2.4 backend.
//!
//! Support is only enabled if you compile with the "backend-vst" feature, see
//! [the cargo reference] for more information on setting cargo features.
//!
//! For an example, see `vst_autopanner.rs` in the `demos` folder.
//!
//! # Usage
//! See also the documentation of the [`vst_init`] macro.
//!
//! [`vst_init`]: ../../macro.vst_init.html
//! [the cargo reference]: https://doc.rust-lang.org/cargo/reference/manifest.html#the-features-section
use crate::backend::HostInterface;
use crate::buffer::AudioBufferInOut;
use crate::parameter::ParameterHost;
use crate::{
    AudioHandler, AudioHandlerMeta, CommonAudioPortMeta, CommonPluginMeta, ContextualAudioRenderer,
};
use std::sync::Arc;
use vecstorage::VecStorage;
use vst::buffer::AudioBuffer;
use vst::channels::ChannelInfo;
use vst::plugin::{Category, HostCallback, Info, PluginParameters};

pub use vst;

/// A VST plugin should implement this trait in addition to [`CommonPluginMeta`],
/// [`CommonAudioPortMeta`], [`AudioHandler`] and [`ContextualAudioRenderer`]
/// for `f32` and `f64`.
///
/// [`CommonPluginMeta`]: ../../trait.CommonPluginMeta.html
/// [`CommonAudioPortMeta`]: ../../trait.CommonAudioPortMeta.html
/// [`AudioHandler`]: ../../trait.AudioHandler.html
/// [`ContextualAudioRenderer`]: ../../trait.ContextualAudioRenderer.html
pub trait VstPluginMeta: CommonPluginMeta + CommonAudioPortMeta {
    const PLUGIN_ID: i32;
    const CATEGORY: Category;
    type Parameters: ParameterHost + Send + 'static;

    /// The parameters, shared with the host.
    fn shared_parameters(&self) -> Arc<Self::Parameters>;
}

/// Exposes a [`ParameterHost`] to the host as VST parameters.
/// VST parameters are always normalized to `[0, 1]`.
///
/// [`ParameterHost`]: ../../parameter/trait.ParameterHost.html
pub struct VstParameters<H> {
    parameters: Arc<H>,
}

impl<H> VstParameters<H> {
    pub fn new(parameters: Arc<H>) -> Self {
        Self { parameters }
    }
}

impl<H> VstParameters<H>
where
    H: ParameterHost,
{
    fn with_parameter<T, F>(&self, index: i32, default: T, f: F) -> T
    where
        F: FnOnce(&crate::parameter::FloatParameter) -> T,
    {
        if index < 0 {
            return default;
        }
        match self.parameters.parameter(index as usize) {
            Some(parameter) => f(parameter),
            None => {
                warn!("Host asked for unknown parameter #{}", index);
                default
            }
        }
    }
}

impl<H> PluginParameters for VstParameters<H>
where
    H: ParameterHost + Send,
{
    fn get_parameter_label(&self, index: i32) -> String {
        self.with_parameter(index, String::new(), |p| p.info().label.to_string())
    }

    fn get_parameter_text(&self, index: i32) -> String {
        self.with_parameter(index, String::new(), |p| {
            let mut text = String::new();
            match p.write_value(&mut text) {
                Ok(()) => text,
                Err(_) => String::new(),
            }
        })
    }

    fn get_parameter_name(&self, index: i32) -> String {
        self.with_parameter(index, String::new(), |p| p.info().name.to_string())
    }

    fn get_parameter(&self, index: i32) -> f32 {
        self.with_parameter(index, 0.0, |p| p.get_normalized())
    }

    fn set_parameter(&self, index: i32, value: f32) {
        trace!("set_parameter({}, {})", index, value);
        self.with_parameter(index, (), |p| p.set_normalized(value))
    }

    fn can_be_automated(&self, index: i32) -> bool {
        self.with_parameter(index, false, |_| true)
    }

    fn string_to_parameter(&self, index: i32, text: String) -> bool {
        trace!("string_to_parameter({}, {:?})", index, text);
        self.with_parameter(index, false, |p| p.set_from_text(&text))
    }
}

/// A struct used internally by the `vst_init` macro. Normally, plugin's do not need to use this.
pub struct VstPluginWrapper<P> {
    plugin: P,
    host: VstHost,
    inputs_f32: VecStorage<&'static [f32]>,
    outputs_f32: VecStorage<&'static mut [f32]>,
    inputs_f64: VecStorage<&'static [f64]>,
    outputs_f64: VecStorage<&'static mut [f64]>,
}

impl<P> VstPluginWrapper<P>
where
    P: VstPluginMeta
        + AudioHandler
        + Resume
        + ContextualAudioRenderer<f32, VstHost>
        + ContextualAudioRenderer<f64, VstHost>,
{
    pub fn get_info(&self) -> Info {
        trace!("get_info");
        let mut name = String::new();
        if self.plugin.plugin_name(&mut name).is_err() {
            warn!("Could not write the plugin name.");
        }
        Info {
            name,
            inputs: self.plugin.max_number_of_audio_inputs() as i32,
            outputs: self.plugin.max_number_of_audio_outputs() as i32,
            parameters: self.plugin.shared_parameters().number_of_parameters() as i32,
            unique_id: P::PLUGIN_ID,
            category: P::CATEGORY,
            f64_precision: true,
            ..Info::default()
        }
    }

    pub fn new(plugin: P, host: HostCallback) -> Self {
        let number_of_inputs = plugin.max_number_of_audio_inputs();
        let number_of_outputs = plugin.max_number_of_audio_outputs();
        Self {
            plugin,
            inputs_f32: VecStorage::with_capacity(number_of_inputs),
            outputs_f32: VecStorage::with_capacity(number_of_outputs),
            inputs_f64: VecStorage::with_capacity(number_of_inputs),
            outputs_f64: VecStorage::with_capacity(number_of_outputs),
            host: VstHost { callback: host },
        }
    }

    pub fn host(&self) -> &HostCallback {
        &self.host.callback
    }

    pub fn get_parameter_object(&self) -> Arc<dyn PluginParameters> {
        Arc::new(VstParameters::new(self.plugin.shared_parameters()))
    }

    pub fn process<'b>(&mut self, buffer: &mut AudioBuffer<'b, f32>) {
        let number_of_frames = buffer.samples();
        let (input_buffers, mut output_buffers) = buffer.split();

        let mut inputs = self.inputs_f32.vec_guard();
        for i in 0..std::cmp::min(inputs.capacity(), input_buffers.len()) {
            inputs.push(input_buffers.get(i));
        }

        let mut outputs = self.outputs_f32.vec_guard();
        for i in 0..std::cmp::min(outputs.capacity(), output_buffers.len()) {
            outputs.push(output_buffers.get_mut(i));
        }

        let mut buffer = AudioBufferInOut::new(&inputs, &mut outputs, number_of_frames);
        self.plugin.render_buffer(&mut buffer, &mut self.host);
    }

    pub fn process_f64<'b>(&mut self, buffer: &mut AudioBuffer<'b, f64>) {
        let number_of_frames = buffer.samples();
        let (input_buffers, mut output_buffers) = buffer.split();

        let mut inputs = self.inputs_f64.vec_guard();
        for i in 0..std::cmp::min(inputs.capacity(), input_buffers.len()) {
            inputs.push(input_buffers.get(i));
        }

        let mut outputs = self.outputs_f64.vec_guard();
        for i in 0..std::cmp::min(outputs.capacity(), output_buffers.len()) {
            outputs.push(output_buffers.get_mut(i));
        }

        let mut buffer = AudioBufferInOut::new(&inputs, &mut outputs, number_of_frames);
        self.plugin.render_buffer(&mut buffer, &mut self.host);
    }

    pub fn get_input_info(&self, input_index: i32) -> ChannelInfo {
        trace!("get_input_info({})", input_index);
        let mut name = String::new();
        if input_index >= 0 && (input_index as usize) < self.plugin.max_number_of_audio_inputs() {
            let _ = self.plugin.input_name(&mut name, input_index as usize);
        }
        ChannelInfo::new(name, None, true, None)
    }

    pub fn get_output_info(&self, output_index: i32) -> ChannelInfo {
        trace!("get_output_info({})", output_index);
        let mut name = String::new();
        if output_index >= 0 && (output_index as usize) < self.plugin.max_number_of_audio_outputs()
        {
            let _ = self.plugin.output_name(&mut name, output_index as usize);
        }
        ChannelInfo::new(name, None, true, None)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        trace!("sample_rate: {}", sample_rate);
        self.plugin.set_sample_rate(sample_rate);
    }

    pub fn resume(&mut self) {
        trace!("resume");
        self.plugin.resume();
    }
}

/// The context passed to the plugin by the VST backend.
pub struct VstHost {
    callback: HostCallback,
}

impl VstHost {
    pub fn callback(&self) -> &HostCallback {
        &self.callback
    }
}

impl HostInterface for VstHost {
    fn output_initialized(&self) -> bool {
        // Some hosts do initialize the output to zero, but we cannot know which ones.
        false
    }
}

/// A wrapper around the `plugin_main!` macro from the `vst` crate.
/// You call this with one parameter, which is the function declaration of a function
/// that creates your plugin.
/// This function may also do some setup (e.g. initialize logging).
///
/// Example:
/// ```ignore
/// use autopanner::Autopanner;
/// use autopanner::config::Settings;
///
/// autopanner::vst_init!(
///    fn init() -> Autopanner {
///        let settings = Settings::from_env().unwrap_or_default();
///        let _ = settings.initialize_logging();
///        Autopanner::with_settings(settings.oscillator)
///    }
/// );
/// ```
//
// We define this macro so that plugins do not have to implement the `Default` trait.
//
// We will need the return type (as type parameter for `VstWrapperWrapper`)
// and we need to call the function in the `vst::plugin::Plugin::new()` function
// to which we cannot supply an extra parameter.
#[macro_export]
macro_rules! vst_init {
    (fn $function_name:ident() -> $return_type:ty
        $body:block
    ) => {

        fn $function_name () -> $return_type
        $body

        struct VstWrapperWrapper {
            wrapper: $crate::backend::vst_backend::VstPluginWrapper<$return_type>
        }

        impl Default for VstWrapperWrapper {
            fn default() -> Self {
                // Only needed for the default implementation of `Plugin::new`,
                // which is not used.
                unreachable!()
            }
        }

        // This macro is expanded in the context of the plugin, so no "use" statements here.
        impl $crate::backend::vst_backend::vst::plugin::Plugin for VstWrapperWrapper
        {
            fn get_info(&self) -> $crate::backend::vst_backend::vst::plugin::Info {
                self.wrapper.get_info()
            }

            fn new(host: $crate::backend::vst_backend::vst::plugin::HostCallback) -> Self
            where
                Self: Sized + Default
            {
                VstWrapperWrapper
                {
                    wrapper: $crate::backend::vst_backend::VstPluginWrapper::new($function_name(), host)
                }
            }

            fn init(&mut self) {
                // Get the sample rate from the host and set it in the plugin.
                let sample_rate =
                    if let Some($crate::backend::vst_backend::vst::api::TimeInfo{sample_rate: sr, ..}) =
                        $crate::backend::vst_backend::vst::host::Host::get_time_info(
                            self.wrapper.host(),
                            0 // equivalent to `vst::api::TimeInfoFlags::empty().bits()`
                        )
                    {
                        Some(sr)
                    } else {
                        None
                    };
                if let Some(sr) = sample_rate {
                    self.wrapper.set_sample_rate(sr);
                }
            }

            fn set_sample_rate(&mut self, rate: f32) {
                self.wrapper.set_sample_rate(rate as f64);
            }

            fn resume(&mut self) {
                self.wrapper.resume();
            }

            #[inline]
            fn process(&mut self, buffer: &mut $crate::backend::vst_backend::vst::buffer::AudioBuffer<f32>) {
                self.wrapper.process(buffer);
            }

            #[inline]
            fn process_f64(&mut self, buffer: &mut $crate::backend::vst_backend::vst::buffer::AudioBuffer<f64>) {
                self.wrapper.process_f64(buffer);
            }

            fn get_input_info(&self, input_index: i32) -> $crate::backend::vst_backend::vst::channels::ChannelInfo {
                self.wrapper.get_input_info(input_index)
            }

            fn get_output_info(&self, output_index: i32) -> $crate::backend::vst_backend::vst::channels::ChannelInfo {
                self.wrapper.get_output_info(output_index)
            }

            fn get_parameter_object(&mut self) -> std::sync::Arc<dyn $crate::backend::vst_backend::vst::plugin::PluginParameters> {
                self.wrapper.get_parameter_object()
            }
        }

        $crate::backend::vst_backend::vst::plugin_main!(VstWrapperWrapper);
    }
}

/// Called when the host resumes processing after having suspended it,
/// e.g. when playback restarts.
pub trait Resume {
    fn resume(&mut self);
}

impl Resume for crate::Autopanner {
    fn resume(&mut self) {
        self.reset();
    }
}

impl VstPluginMeta for crate::Autopanner {
    // "ApAn"
    const PLUGIN_ID: i32 = 0x4170_416e;
    const CATEGORY: Category = Category::Effect;
    type Parameters = crate::AutopannerParameters;

    fn shared_parameters(&self) -> Arc<Self::Parameters> {
        Arc::clone(self.parameters())
    }
}
