//! Offline rendering: read audio from an [`AudioReader`], run it through a plugin and
//! write the result to an [`AudioWriter`].
//!
//! This back-end is always available. It is useful for processing files and for testing.
//! The [`run`] function drives the plugin.
//!
//! Currently, the following inputs and outputs are available:
//!
//! * Dummy: [`AudioDummy`]: audio input that is immediately exhausted and audio output that
//!   discards everything
//! * Memory: [`AudioBufferReader`] and [`AudioBufferWriter`]: read and write audio from memory
//! * Hound: [`HoundAudioReader`] and [`HoundAudioWriter`]: read and write `.wav` files
//!   (behind the `backend-combined-hound` feature)
//!
//! [`AudioDummy`]: ./dummy/struct.AudioDummy.html
//! [`HoundAudioReader`]: ./hound/struct.HoundAudioReader.html
//! [`HoundAudioWriter`]: ./hound/struct.HoundAudioWriter.html
//! [`AudioBufferReader`]: ./memory/type.AudioBufferReader.html
//! [`AudioBufferWriter`]: ./memory/struct.AudioBufferWriter.html
//! [`AudioReader`]: ./trait.AudioReader.html
//! [`AudioWriter`]: ./trait.AudioWriter.html
//! [`run`]: ./fn.run.html

use crate::backend::{HostInterface, Stop};
use crate::buffer::{
    buffers_as_mut_slice, buffers_as_slice, AudioBufferIn, AudioBufferInOut, AudioBufferOut,
};
use crate::{AudioHandler, ContextualAudioRenderer};
use num_traits::Zero;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod dummy;
#[cfg(feature = "backend-combined-hound")]
pub mod hound;
pub mod memory;

/// Define how audio is read.
///
/// The generic parameter `S` is the data type of a sample.
pub trait AudioReader<S> {
    type Err;
    fn number_of_channels(&self) -> usize;
    fn frames_per_second(&self) -> u64;

    /// Fill the buffers. Return the number of frames that have been read and written
    /// to the buffer.
    /// If the return value is `<` the number of frames of the input, no more frames can be
    /// expected.
    fn fill_buffer(&mut self, output: &mut AudioBufferOut<S>) -> Result<usize, Self::Err>;
}

/// Define how audio is written.
///
/// The generic parameter `S` is the data type of a sample.
pub trait AudioWriter<S> {
    type Err;
    fn write_buffer(&mut self, buffer: &AudioBufferIn<S>) -> Result<(), Self::Err>;
}

/// The error type that represents the errors you can get from the [`run`] function.
///
/// [`run`]: ./fn.run.html
#[derive(Debug)]
pub enum CombinedError<AudioInErr, AudioOutErr> {
    /// An error occurred when reading the audio.
    AudioInError(AudioInErr),
    /// An error occurred when writing the audio.
    AudioOutError(AudioOutErr),
}

impl<AudioInErr, AudioOutErr> Display for CombinedError<AudioInErr, AudioOutErr>
where
    AudioInErr: Display,
    AudioOutErr: Display,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            CombinedError::AudioInError(ref e) => write!(f, "Audio in error: {}", e),
            CombinedError::AudioOutError(ref e) => write!(f, "Audio out error: {}", e),
        }
    }
}

impl<AudioInErr, AudioOutErr> Error for CombinedError<AudioInErr, AudioOutErr>
where
    AudioInErr: Error + 'static,
    AudioOutErr: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CombinedError::AudioInError(ref e) => Some(e),
            CombinedError::AudioOutError(ref e) => Some(e),
        }
    }
}

/// The context passed to the plugin by [`run`].
///
/// The output buffers are not initialized: they still contain the output of the previous
/// buffer.
///
/// [`run`]: ./fn.run.html
#[derive(Debug, Default)]
pub struct OfflineHost {
    stop_requested: bool,
}

impl OfflineHost {
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

impl HostInterface for OfflineHost {
    fn output_initialized(&self) -> bool {
        false
    }

    fn stop(&mut self) {
        self.stop_requested = true;
    }
}

impl Stop for OfflineHost {}

/// Run a plugin, reading audio from `audio_in` and writing the result to `audio_out`.
///
/// The plugin gets as many output channels as there are input channels.
/// Rendering stops when the reader is exhausted or when the plugin calls
/// [`HostInterface::stop`] on the context.
///
/// # Parameters
/// * `plugin`: the plugin to run
/// * `buffer_size_in_frames`: the maximum number of frames per call to `render_buffer`
/// * `audio_in`: the audio input
/// * `audio_out`: the audio output
///
/// # Panics
/// Panics if `buffer_size_in_frames` is `0`.
///
/// [`HostInterface::stop`]: ../trait.HostInterface.html#method.stop
pub fn run<S, P, AudioIn, AudioOut>(
    plugin: &mut P,
    buffer_size_in_frames: usize,
    mut audio_in: AudioIn,
    mut audio_out: AudioOut,
) -> Result<(), CombinedError<AudioIn::Err, AudioOut::Err>>
where
    S: Copy + Zero,
    P: AudioHandler + ContextualAudioRenderer<S, OfflineHost>,
    AudioIn: AudioReader<S>,
    AudioOut: AudioWriter<S>,
{
    assert!(buffer_size_in_frames > 0);

    let number_of_channels = audio_in.number_of_channels();
    let frames_per_second = audio_in.frames_per_second();
    info!(
        "Offline rendering of {} channels at {} Hz, {} frames per buffer",
        number_of_channels, frames_per_second, buffer_size_in_frames
    );
    plugin.set_sample_rate(frames_per_second as f64);

    let mut input_buffers = vec![vec![S::zero(); buffer_size_in_frames]; number_of_channels];
    let mut output_buffers = vec![vec![S::zero(); buffer_size_in_frames]; number_of_channels];
    let mut host = OfflineHost::default();
    let mut number_of_buffers = 0_usize;

    loop {
        let frames_read = {
            let mut input_slices = buffers_as_mut_slice(&mut input_buffers, buffer_size_in_frames);
            let mut buffer = AudioBufferOut::new(&mut input_slices, buffer_size_in_frames);
            audio_in
                .fill_buffer(&mut buffer)
                .map_err(CombinedError::AudioInError)?
        };
        assert!(frames_read <= buffer_size_in_frames);
        if frames_read == 0 {
            break;
        }

        {
            let input_slices = buffers_as_slice(&input_buffers, frames_read);
            let mut output_slices = buffers_as_mut_slice(&mut output_buffers, frames_read);
            let mut buffer = AudioBufferInOut::new(&input_slices, &mut output_slices, frames_read);
            plugin.render_buffer(&mut buffer, &mut host);
        }
        number_of_buffers += 1;

        {
            let output_slices = buffers_as_slice(&output_buffers, frames_read);
            audio_out
                .write_buffer(&AudioBufferIn::new(&output_slices, frames_read))
                .map_err(CombinedError::AudioOutError)?;
        }

        if frames_read < buffer_size_in_frames || host.stop_requested {
            break;
        }
    }
    debug!("Offline rendering finished after {} buffers", number_of_buffers);
    Ok(())
}
