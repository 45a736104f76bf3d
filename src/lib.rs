//! # Autopanner
//! A stereo autopanner: an audio effect that sweeps a stereo signal between the left
//! and the right speaker, driven by a sine low-frequency oscillator.
//!
//! The effect has two parameters:
//!
//! * "Gain", in `[0, 1]`, default `0.5`;
//! * "MilliSeconds", the period of the oscillator, in `[10, 5000]` ms, default `2490` ms.
//!
//! See the [`dsp::pan_oscillator`] module for the signal processing and for the difference
//! between the legacy and the corrected oscillator settings.
//!
//! ## Back-ends
//! The plugin is written against a small set of traits that abstract the host.
//! The following back-ends are available:
//!
//! * [`vst`] (behind the `backend-vst` feature)
//! * [`jack`] (behind the `backend-jack` feature)
//! * [`combined`] offline rendering from an audio reader into an audio writer, mostly for
//!   processing files and for testing; reading and writing `.wav` files is behind the
//!   `backend-combined-hound` feature.
//!
//! ### Starting the backend/entry point for the host
//!
//! * Jack: [`run()`](./backend/jack_backend/fn.run.html)
//! * Offline : [`run()`](backend/combined/fn.run.html)
//! * VST 2.4:  [`vst_init!`]
//!
//! ### Meta-data
//! Every back-end needs the name of the plugin and the names of the audio ports.
//! These are described by [`CommonPluginMeta`], [`AudioHandlerMeta`] and
//! [`CommonAudioPortMeta`], which are implemented for every type that implements [`Meta`].
//!
//! ### Parameters
//! The host reads and writes parameters through the [`ParameterHost`] trait.
//! Parameter values are stored in atomics, so they can be changed from another thread
//! while the audio is rendered.
//!
//! ### Rendering audio
//! All back-ends require the plugin to implement [`AudioHandler`] and
//! [`ContextualAudioRenderer`]. [`ContextualAudioRenderer`] has two type parameters:
//! the data type used to represent a sample and the "context", which gives access to
//! functionality of the back-end, see [`HostInterface`].
//!
//! ### Logging and configuration
//! Logging uses the `log` crate. See the [`config`] module for the environment variables
//! that configure logging and the oscillator settings.
//!
//! [`jack`]: ./backend/jack_backend/index.html
//! [`vst`]: ./backend/vst_backend/index.html
//! [`combined`]: ./backend/combined/index.html
//! [`dsp::pan_oscillator`]: ./dsp/pan_oscillator/index.html
//! [`config`]: ./config/index.html
//! [`Meta`]: ./meta/trait.Meta.html
//! [`CommonPluginMeta`]: ./trait.CommonPluginMeta.html
//! [`AudioHandlerMeta`]: ./trait.AudioHandlerMeta.html
//! [`CommonAudioPortMeta`]: ./trait.CommonAudioPortMeta.html
//! [`AudioHandler`]: ./trait.AudioHandler.html
//! [`ContextualAudioRenderer`]: ./trait.ContextualAudioRenderer.html
//! [`ParameterHost`]: ./parameter/trait.ParameterHost.html
//! [`HostInterface`]: ./backend/trait.HostInterface.html
//! [`vst_init!`]: ./macro.vst_init.html

#[macro_use]
extern crate log;

use crate::buffer::AudioBufferInOut;
use crate::meta::{AudioPort, General, Meta, Name, Port};
use std::fmt::{Error, Write};

#[macro_use]
pub mod buffer;
pub mod autopanner;
pub mod backend;
pub mod config;
pub mod dsp;
pub mod error;
pub mod meta;
pub mod parameter;
pub mod test_utilities;

pub use crate::autopanner::{Autopanner, AutopannerParameters};

/// Define the maximum number of audio inputs and the maximum number of audio outputs.
///
/// Backends that require the plugin to implement this trait ensure that when calling the
/// [`render_buffer`] method of the [`ContextualAudioRenderer`] trait
/// *  the number of inputs channels (`buffer.number_of_input_channels()`) is smaller than or equal to
///    `Self::max_number_of_audio_inputs()` and
/// * the number of outputs (`buffer.number_of_output_channels()`) is smaller than or equal to
///    `Self::max_number_of_audio_outputs()`.
///
/// # Remark
/// This trait can be more conveniently implemented by implementing the [`Meta`] trait.
///
/// [`Meta`]: ./meta/trait.Meta.html
/// [`render_buffer`]: ./trait.ContextualAudioRenderer.html#tymethod.render_buffer
/// [`ContextualAudioRenderer`]: ./trait.ContextualAudioRenderer.html
pub trait AudioHandlerMeta {
    /// The maximum number of audio inputs supported.
    /// This method should return the same value every time it is called.
    fn max_number_of_audio_inputs(&self) -> usize;

    /// The maximum number of audio outputs supported.
    /// This method should return the same value every time it is called.
    fn max_number_of_audio_outputs(&self) -> usize;
}

/// Define how sample-rate changes are handled.
pub trait AudioHandler {
    /// Called when the sample-rate changes.
    /// The backend should ensure that this function is called before
    /// any other method.
    ///
    /// # Parameters
    /// `sample_rate`: The new sample rate in frames per second (Hz).
    /// Common sample rates are 44100 Hz (CD quality) and 48000 Hz.
    fn set_sample_rate(&mut self, sample_rate: f64);
}

/// Defines how audio is rendered.
/// The extra parameter `context` can be used by the backend to provide extra information.
///
/// The type parameter `S` refers to the data type of a sample.
/// It is typically `f32` or `f64`.
pub trait ContextualAudioRenderer<S, Context>
where
    S: Copy,
{
    /// This method is called repeatedly for subsequent buffers.
    /// The number of frames may differ from one call to the next.
    fn render_buffer(&mut self, buffer: &mut AudioBufferInOut<S>, context: &mut Context);
}

/// Provides common meta-data of the plugin or application to the host.
/// This trait is common for all backends that need this info.
/// This trait can be more conveniently implemented by implementing the [`Meta`] trait.
///
/// [`Meta`]: ./meta/trait.Meta.html
pub trait CommonPluginMeta {
    /// The name of the plugin or application.
    fn plugin_name<W: Write>(&self, buffer: &mut W) -> Result<(), Error>;
}

/// Provides some meta-data of the audio-ports used by the plugin or application to the host.
/// This trait can be more conveniently implemented by implementing the [`Meta`] trait.
///
/// [`Meta`]: ./meta/trait.Meta.html
pub trait CommonAudioPortMeta: AudioHandlerMeta {
    /// The name of the audio input with the given index.
    /// You can assume that `index` is strictly smaller than [`Self::max_number_of_audio_inputs()`].
    ///
    /// # Note
    /// When using the Jack backend, the name should not be an empty string.
    ///
    /// [`Self::max_number_of_audio_inputs()`]: trait.AudioHandlerMeta.html#tymethod.max_number_of_audio_inputs
    fn input_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        write!(buffer, "audio in {}", index)
    }

    /// The name of the audio output with the given index.
    /// You can assume that `index` is strictly smaller than [`Self::max_number_of_audio_outputs()`].
    ///
    /// # Note
    /// When using the Jack backend, the name should not be an empty string.
    ///
    /// [`Self::max_number_of_audio_outputs()`]: ./trait.AudioHandlerMeta.html#tymethod.max_number_of_audio_outputs
    fn output_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        write!(buffer, "audio out {}", index)
    }
}

impl<T> CommonPluginMeta for T
where
    T: Meta,
    T::MetaData: General,
    <<T as Meta>::MetaData as General>::GeneralData: Name,
{
    fn plugin_name<W: Write>(&self, buffer: &mut W) -> Result<(), Error> {
        self.meta().general().write_name(buffer)
    }
}

impl<T> AudioHandlerMeta for T
where
    T: Meta,
    T::MetaData: Port<AudioPort>,
{
    fn max_number_of_audio_inputs(&self) -> usize {
        self.meta().in_ports().len()
    }

    fn max_number_of_audio_outputs(&self) -> usize {
        self.meta().out_ports().len()
    }
}

impl<T> CommonAudioPortMeta for T
where
    T: Meta,
    T::MetaData: Port<AudioPort>,
    <<T as Meta>::MetaData as Port<AudioPort>>::PortData: Name,
{
    fn input_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        self.meta().in_ports()[index].write_name(buffer)
    }

    fn output_name<W: Write>(&self, buffer: &mut W, index: usize) -> Result<(), Error> {
        self.meta().out_ports()[index].write_name(buffer)
    }
}
