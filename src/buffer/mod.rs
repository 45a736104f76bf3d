//! Audio buffers.
//!
//! ## Some audio concepts
//! A *sample* is a single number representing the air pressure at a given time.
//! Hosts usually hand over `f32` samples, some (VST) also `f64` samples.
//!
//! A *channel* corresponds with a speaker. The autopanner works on a stereo signal:
//! a "left" channel and a "right" channel.
//!
//! A *frame* consists of the samples for all the channels at a given time.
//!
//! A *buffer* consists of subsequent samples for a given channel and corresponds
//! to a certain time period.
//! (Non-standard terminology.)
//!
//! A *chunk* consists of the buffers for all channels for a given time period.
//! (Non-standard terminology.)
//!
//!```text
//!                         ┌ chunk     ┌ frame
//!             ┌ sample    ↓           ↓
//!             │      ┌─────────┐     ┌─┐
//!          ┌──↓──────┼─────────┼─────┼─┼───────────────────┐
//!   left  →│• • • • •│• • • • •│• • •│•│• • • • • • • • • •│
//!          └─────────┼─────────┼─────┼─┼───────────────────┘
//!   right   • • • • •│• • • • •│• • •│•│• •┌───────┐• • • •
//!                    └─────────┘     └─┘   └───────┘
//!                                            ↑
//!                                            └ buffer
//! ```
//!
//! [`AudioChunk`] owns its samples and is meant for offline use and tests.
//! [`AudioBufferIn`], [`AudioBufferOut`] and [`AudioBufferInOut`] borrow the samples
//! from the host for the duration of one call to `render_buffer` and never allocate.
use num_traits::Zero;
use std::mem;
use std::slice::IterMut;

/// Owned audio, one `Vec` per channel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AudioChunk<S> {
    // Invariant: all channels have the same length.
    channels: Vec<Vec<S>>,
}

impl<S> AudioChunk<S> {
    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn zero(number_of_channels: usize, number_of_frames: usize) -> Self
    where
        S: Zero + Clone,
    {
        let channels = (0..number_of_channels)
            .map(|_| vec![S::zero(); number_of_frames])
            .collect();
        Self { channels }
    }

    /// # Panics
    /// Panics if `channels` is empty or if the channels do not have the same length.
    pub fn from_channels(channels: Vec<Vec<S>>) -> Self {
        assert!(!channels.is_empty());
        let len = channels[0].len();
        for channel in channels.iter() {
            assert_eq!(len, channel.len());
        }

        Self { channels }
    }

    /// Create an `AudioChunk` with the given number of channels, each empty.
    ///
    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn new(number_of_channels: usize) -> Self {
        assert!(number_of_channels > 0);
        Self {
            channels: (0..number_of_channels).map(|_| Vec::new()).collect(),
        }
    }

    /// Build an `AudioChunk` from samples in which the channels are interleaved
    /// (the way `.wav` files store them).
    ///
    /// # Panics
    /// Panics if `number_of_channels == 0`.
    pub fn from_interleaved_iterator<I>(iterator: I, number_of_channels: usize) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut result = Self::new(number_of_channels);
        for (index, sample) in iterator.into_iter().enumerate() {
            result.channels[index % number_of_channels].push(sample);
        }
        // Drop an incomplete trailing frame.
        let len = result.number_of_frames();
        for channel in result.channels.iter_mut() {
            channel.truncate(len);
        }
        result
    }

    pub fn channels(&self) -> &Vec<Vec<S>> {
        &self.channels
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn number_of_frames(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Note about using in a real-time context
    /// ---------------------------------------
    /// This method will allocate memory if the capacity of the chunk is exceeded and cannot
    /// be used in a real-time context in that case.
    pub fn append_sliced_chunk(&mut self, chunk: &[&[S]])
    where
        S: Clone,
    {
        assert_eq!(self.channels.len(), chunk.len());
        let len = chunk[0].len();
        for channel in chunk.iter() {
            assert_eq!(len, channel.len());
        }
        for (output_channel, input_channel) in self.channels.iter_mut().zip(chunk.iter()) {
            output_channel.extend_from_slice(input_channel);
        }
    }

    pub fn inner(self) -> Vec<Vec<S>> {
        self.channels
    }

    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn as_slices(&self) -> Vec<&[S]> {
        self.channels.iter().map(Vec::as_slice).collect()
    }

    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn as_mut_slices(&mut self) -> Vec<&mut [S]> {
        self.channels.iter_mut().map(Vec::as_mut_slice).collect()
    }

    /// Split into chunks of `number_of_frames_per_chunk` frames.
    /// The last chunk may be shorter.
    ///
    /// Note: cannot be used in a real-time context
    /// -------------------------------------
    /// This method allocates memory and cannot be used in a real-time context.
    pub fn split(mut self, number_of_frames_per_chunk: usize) -> Vec<Self> {
        assert!(number_of_frames_per_chunk > 0);

        let number_of_frames = self.number_of_frames();
        let number_of_chunks = (number_of_frames + number_of_frames_per_chunk - 1)
            / number_of_frames_per_chunk;

        let mut result: Vec<Vec<Vec<S>>> = (0..number_of_chunks).map(|_| Vec::new()).collect();
        for mut channel in self.channels.drain(..) {
            let mut chunk_index = 0;
            let mut piece = Vec::with_capacity(number_of_frames_per_chunk);
            for sample in channel.drain(..) {
                piece.push(sample);
                if piece.len() == number_of_frames_per_chunk {
                    result[chunk_index].push(mem::replace(&mut piece, Vec::new()));
                    chunk_index += 1;
                }
            }
            if !piece.is_empty() {
                result[chunk_index].push(piece);
            }
        }
        result.into_iter().map(AudioChunk::from_channels).collect()
    }
}

/// Create an [`AudioChunk`] from a list of channels, e.g.
/// `audio_chunk![[1.0, 2.0], [3.0, 4.0]]` has two channels of two frames each.
#[macro_export]
macro_rules! audio_chunk {
    [
        $(
            [
                $($sample:expr),* $(,)?
            ]
        ),+ $(,)?
    ] => {
        $crate::buffer::AudioChunk::from_channels(
            vec![
                $(
                    vec![$($sample),*]
                ),+
            ]
        )
    };
}

/// Return a slice of `slice_len` frames of each buffer.
pub fn buffers_as_slice<'a, S>(buffers: &'a [Vec<S>], slice_len: usize) -> Vec<&'a [S]> {
    buffers.iter().map(|b| &b[0..slice_len]).collect()
}

/// Return a mutable slice of `slice_len` frames of each buffer.
pub fn buffers_as_mut_slice<'a, S>(
    buffers: &'a mut [Vec<S>],
    slice_len: usize,
) -> Vec<&'a mut [S]> {
    buffers.iter_mut().map(|b| &mut b[0..slice_len]).collect()
}

/// Audio input channels, borrowed from the host.
pub struct AudioBufferIn<'in_channels, 'in_samples, S> {
    channels: &'in_channels [&'in_samples [S]],
    length: usize,
}

impl<'in_channels, 'in_samples, S> AudioBufferIn<'in_channels, 'in_samples, S> {
    /// # Panics
    /// Panics if one of the channels does not have length `length`.
    pub fn new(channels: &'in_channels [&'in_samples [S]], length: usize) -> Self {
        for channel in channels.iter() {
            assert_eq!(channel.len(), length);
        }
        Self { channels, length }
    }

    pub fn channels(&self) -> &'in_channels [&'in_samples [S]] {
        self.channels
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn number_of_frames(&self) -> usize {
        self.length
    }
}

/// Audio output channels, borrowed from the host.
pub struct AudioBufferOut<'out_channels, 'out_samples, S> {
    channels: &'out_channels mut [&'out_samples mut [S]],
    length: usize,
}

impl<'out_channels, 'out_samples, S> AudioBufferOut<'out_channels, 'out_samples, S> {
    /// # Panics
    /// Panics if one of the channels does not have length `length`.
    pub fn new(channels: &'out_channels mut [&'out_samples mut [S]], length: usize) -> Self {
        for channel in channels.iter() {
            assert_eq!(channel.len(), length);
        }
        Self { channels, length }
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn number_of_frames(&self) -> usize {
        self.length
    }

    pub fn index_channel(&mut self, index: usize) -> &mut [S] {
        &mut *self.channels[index]
    }

    pub fn channel_iter_mut<'a>(&'a mut self) -> IterMut<'a, &'out_samples mut [S]> {
        self.channels.iter_mut()
    }

    /// Set every sample of every channel to `value`.
    pub fn set(&mut self, value: S)
    where
        S: Copy,
    {
        for channel in self.channel_iter_mut() {
            for sample in channel.iter_mut() {
                *sample = value;
            }
        }
    }

    /// The left and the right channel, or `None` when there are fewer than two channels.
    /// Channels beyond the second one are ignored.
    pub fn split_stereo(&mut self) -> Option<(&mut [S], &mut [S])> {
        match &mut *self.channels {
            [left, right, ..] => Some((&mut **left, &mut **right)),
            _ => None,
        }
    }
}

/// Audio input and output channels for one call to `render_buffer`.
/// All channels, inputs and outputs, have the same number of frames.
pub struct AudioBufferInOut<'in_channels, 'in_samples, 'out_channels, 'out_samples, S> {
    inputs: AudioBufferIn<'in_channels, 'in_samples, S>,
    outputs: AudioBufferOut<'out_channels, 'out_samples, S>,
    length: usize,
}

impl<'in_channels, 'in_samples, 'out_channels, 'out_samples, S>
    AudioBufferInOut<'in_channels, 'in_samples, 'out_channels, 'out_samples, S>
{
    /// # Panics
    /// Panics if the inputs or the outputs do not have `length` frames.
    pub fn new(
        inputs: &'in_channels [&'in_samples [S]],
        outputs: &'out_channels mut [&'out_samples mut [S]],
        length: usize,
    ) -> Self {
        Self {
            inputs: AudioBufferIn::new(inputs, length),
            outputs: AudioBufferOut::new(outputs, length),
            length,
        }
    }

    pub fn number_of_frames(&self) -> usize {
        self.length
    }

    pub fn number_of_input_channels(&self) -> usize {
        self.inputs.number_of_channels()
    }

    pub fn number_of_output_channels(&self) -> usize {
        self.outputs.number_of_channels()
    }

    pub fn inputs(&self) -> &AudioBufferIn<'in_channels, 'in_samples, S> {
        &self.inputs
    }

    pub fn outputs(&mut self) -> &mut AudioBufferOut<'out_channels, 'out_samples, S> {
        &mut self.outputs
    }

    pub fn separate<'a>(
        &'a mut self,
    ) -> (
        &'a AudioBufferIn<'in_channels, 'in_samples, S>,
        &'a mut AudioBufferOut<'out_channels, 'out_samples, S>,
    ) {
        (&self.inputs, &mut self.outputs)
    }

    /// Copy each input channel to the output channel with the same index.
    /// Output channels without a corresponding input channel are left untouched.
    pub fn pass_through(&mut self)
    where
        S: Copy,
    {
        let (inputs, outputs) = self.separate();
        for (output_channel, input_channel) in
            outputs.channel_iter_mut().zip(inputs.channels().iter())
        {
            output_channel.copy_from_slice(input_channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_works_as_expected() {
        let mut audio_buffer = AudioChunk::new(3);
        let input = audio_chunk![[1, 2], [3, 4], [5, 6]];
        audio_buffer.append_sliced_chunk(input.as_slices().as_ref());
        assert_eq!(audio_buffer.channels()[0], vec![1, 2]);
        assert_eq!(audio_buffer.channels()[1], vec![3, 4]);
        assert_eq!(audio_buffer.channels()[2], vec![5, 6]);
    }

    #[test]
    fn split_works_with_non_dividing_input_length() {
        let input = audio_chunk![[0, 1, 2, 3, 4], [5, 6, 7, 8, 9]];
        let observed = input.split(2);
        assert_eq!(
            observed,
            vec![
                audio_chunk![[0, 1], [5, 6]],
                audio_chunk![[2, 3], [7, 8]],
                audio_chunk![[4], [9]]
            ]
        )
    }

    #[test]
    fn from_interleaved_iterator_deinterleaves() {
        let chunk = AudioChunk::from_interleaved_iterator(vec![1, 2, 3, 4, 5, 6, 7], 2);
        assert_eq!(chunk, audio_chunk![[1, 3, 5], [2, 4, 6]]);
    }

    #[test]
    fn split_stereo_needs_two_channels() {
        let mut mono = vec![1.0_f32, 2.0];
        let mut channels = [mono.as_mut_slice()];
        let mut outputs = AudioBufferOut::new(&mut channels, 2);
        assert!(outputs.split_stereo().is_none());
    }

    #[test]
    fn split_stereo_ignores_extra_channels() {
        let mut chunk = audio_chunk![[1.0_f32], [2.0], [3.0]];
        let mut slices = chunk.as_mut_slices();
        let mut outputs = AudioBufferOut::new(&mut slices, 1);
        let (left, right) = outputs.split_stereo().expect("three channels");
        assert_eq!(left, &[1.0]);
        assert_eq!(right, &[2.0]);
    }

    #[test]
    fn pass_through_copies_inputs_and_leaves_extra_outputs() {
        let input = audio_chunk![[1.0_f32, 2.0]];
        let mut output = audio_chunk![[9.0_f32, 9.0], [9.0, 9.0]];
        let input_slices = input.as_slices();
        {
            let mut output_slices = output.as_mut_slices();
            let mut buffer = AudioBufferInOut::new(&input_slices, &mut output_slices, 2);
            buffer.pass_through();
        }
        assert_eq!(output, audio_chunk![[1.0, 2.0], [9.0, 9.0]]);
    }
}
