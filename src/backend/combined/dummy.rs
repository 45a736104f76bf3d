//! Audio input that is immediately exhausted and audio output that discards everything.
use super::{AudioReader, AudioWriter};
use crate::buffer::{AudioBufferIn, AudioBufferOut};
use std::marker::PhantomData;

pub struct AudioDummy<S> {
    frames_per_second: u64,
    _phantom: PhantomData<S>,
}

impl<S> AudioDummy<S> {
    pub fn new() -> Self {
        Self::with_frames_per_second(44100)
    }

    pub fn with_frames_per_second(frames_per_second: u64) -> Self {
        AudioDummy {
            frames_per_second,
            _phantom: PhantomData,
        }
    }
}

impl<S> Default for AudioDummy<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> AudioReader<S> for AudioDummy<S> {
    type Err = std::convert::Infallible;
    fn number_of_channels(&self) -> usize {
        0
    }

    fn frames_per_second(&self) -> u64 {
        self.frames_per_second
    }

    fn fill_buffer(&mut self, _output: &mut AudioBufferOut<S>) -> Result<usize, Self::Err> {
        Ok(0)
    }
}

impl<S> AudioWriter<S> for AudioDummy<S> {
    type Err = std::convert::Infallible;
    fn write_buffer(&mut self, _buffer: &AudioBufferIn<S>) -> Result<(), Self::Err> {
        Ok(())
    }
}
