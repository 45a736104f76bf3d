//! Utilities for testing.

use crate::backend::{HostInterface, Stop};
use crate::buffer::{AudioBufferInOut, AudioChunk};
use crate::{AudioHandler, AudioHandlerMeta, ContextualAudioRenderer};
use std::fmt::Debug;

/// A context for calling `render_buffer` in tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestHost {
    pub output_initialized: bool,
    pub stopped: bool,
}

impl HostInterface for TestHost {
    fn output_initialized(&self) -> bool {
        self.output_initialized
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

impl Stop for TestHost {}

/// A plugin useful for testing back-ends.
///
/// It checks that the inputs of each call to `render_buffer` are the expected ones,
/// and it writes pre-defined outputs.
/// After the last expected buffer, it asks the host to stop.
pub struct TestPlugin<S, M: AudioHandlerMeta> {
    expected_inputs: Vec<AudioChunk<S>>,
    provided_outputs: Vec<AudioChunk<S>>,
    expected_sample_rate: f64,
    meta: M,
    buffer_index: usize,
}

impl<S, M: AudioHandlerMeta> TestPlugin<S, M> {
    pub fn new(
        expected_inputs: Vec<AudioChunk<S>>,
        provided_outputs: Vec<AudioChunk<S>>,
        expected_sample_rate: f64,
        meta: M,
    ) -> Self {
        assert_eq!(expected_inputs.len(), provided_outputs.len());
        TestPlugin {
            expected_inputs,
            provided_outputs,
            expected_sample_rate,
            meta,
            buffer_index: 0,
        }
    }

    pub fn check_last(&self) {
        assert_eq!(self.buffer_index, self.expected_inputs.len());
    }
}

impl<S, M> AudioHandlerMeta for TestPlugin<S, M>
where
    M: AudioHandlerMeta,
{
    fn max_number_of_audio_inputs(&self) -> usize {
        self.meta.max_number_of_audio_inputs()
    }
    fn max_number_of_audio_outputs(&self) -> usize {
        self.meta.max_number_of_audio_outputs()
    }
}

impl<S, M> AudioHandler for TestPlugin<S, M>
where
    M: AudioHandlerMeta,
{
    fn set_sample_rate(&mut self, sample_rate: f64) {
        assert_eq!(sample_rate, self.expected_sample_rate);
    }
}

impl<S, M, C> ContextualAudioRenderer<S, C> for TestPlugin<S, M>
where
    M: AudioHandlerMeta,
    S: PartialEq + Debug + Copy,
    C: HostInterface,
{
    fn render_buffer(&mut self, buffer: &mut AudioBufferInOut<S>, context: &mut C) {
        assert!(
            self.buffer_index < self.expected_inputs.len(),
            "`render_buffer` called more often than expected: expected only {} times",
            self.expected_inputs.len()
        );

        let (inputs, outputs) = buffer.separate();
        let expected_input_channels = self.expected_inputs[self.buffer_index].channels();
        assert_eq!(inputs.number_of_channels(), expected_input_channels.len());
        for (input_channel_index, input_channel) in inputs.channels().iter().enumerate() {
            assert_eq!(
                *input_channel,
                expected_input_channels[input_channel_index].as_slice(),
                "mismatch in input channel #{} in buffer #{}",
                input_channel_index,
                self.buffer_index
            );
        }

        let expected_output_channels = self.provided_outputs[self.buffer_index].channels();
        assert_eq!(outputs.number_of_channels(), expected_output_channels.len());
        for (output_channel, expected_output_channel) in outputs
            .channel_iter_mut()
            .zip(expected_output_channels.iter())
        {
            assert_eq!(
                output_channel.len(),
                expected_output_channel.len(),
                "mismatch in output channel length in buffer #{}: \
                 expected {}, but got {}",
                self.buffer_index,
                expected_output_channel.len(),
                output_channel.len()
            );
            output_channel.copy_from_slice(expected_output_channel);
        }

        self.buffer_index += 1;
        if self.buffer_index == self.expected_inputs.len() {
            context.stop();
        }
    }
}

/// Meta-data for a [`TestPlugin`] with a fixed number of inputs and outputs.
///
/// [`TestPlugin`]: ./struct.TestPlugin.html
pub struct TestMeta {
    pub inputs: usize,
    pub outputs: usize,
}

impl AudioHandlerMeta for TestMeta {
    fn max_number_of_audio_inputs(&self) -> usize {
        self.inputs
    }

    fn max_number_of_audio_outputs(&self) -> usize {
        self.outputs
    }
}

/// A plugin that copies its inputs to its outputs.
pub struct Identity;

impl AudioHandler for Identity {
    fn set_sample_rate(&mut self, _sample_rate: f64) {}
}

impl<S, C> ContextualAudioRenderer<S, C> for Identity
where
    S: Copy,
{
    fn render_buffer(&mut self, buffer: &mut AudioBufferInOut<S>, _context: &mut C) {
        buffer.pass_through();
    }
}
