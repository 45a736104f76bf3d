//! Read and write `.wav` files with the `hound` crate.
use super::{AudioReader, AudioWriter};
use crate::buffer::{AudioBufferIn, AudioBufferOut};
use dasp_sample::{FromSample, ToSample, I24};
use hound::{SampleFormat, WavReader, WavWriter};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{Read, Seek, Write};

#[derive(Debug)]
pub enum HoundAudioError {
    UnsupportedAudioFormat {
        sample_format: SampleFormat,
        bits_per_sample: u16,
    },
    Hound(hound::Error),
}

impl Display for HoundAudioError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            HoundAudioError::UnsupportedAudioFormat {
                sample_format,
                bits_per_sample,
            } => write!(
                f,
                "Unsupported audio format: {:?} with {} bits per sample",
                sample_format, bits_per_sample
            ),
            HoundAudioError::Hound(e) => write!(f, "{}", e),
        }
    }
}

impl Error for HoundAudioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HoundAudioError::Hound(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hound::Error> for HoundAudioError {
    fn from(e: hound::Error) -> Self {
        HoundAudioError::Hound(e)
    }
}

type Samples<'wr, S> = Box<dyn Iterator<Item = Result<S, hound::Error>> + 'wr>;

/// An [`AudioReader`] that reads the samples of a `.wav` file, converted to `S`.
///
/// Supported are 32 bit float and 8, 16, 24 and 32 bit integer samples.
///
/// [`AudioReader`]: ../trait.AudioReader.html
pub struct HoundAudioReader<'wr, S> {
    samples: Samples<'wr, S>,
    number_of_channels: usize,
    frames_per_second: u64,
}

impl<'wr, S> HoundAudioReader<'wr, S>
where
    S: FromSample<f32>
        + FromSample<i8>
        + FromSample<i16>
        + FromSample<I24>
        + FromSample<i32>
        + 'wr,
{
    pub fn new<R: Read>(reader: &'wr mut WavReader<R>) -> Result<Self, HoundAudioError> {
        let spec = reader.spec();
        let samples: Samples<'wr, S> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => {
                Box::new(reader.samples::<f32>().map(|s| s.map(S::from_sample_)))
            }
            (SampleFormat::Int, 8) => {
                Box::new(reader.samples::<i8>().map(|s| s.map(S::from_sample_)))
            }
            (SampleFormat::Int, 16) => {
                Box::new(reader.samples::<i16>().map(|s| s.map(S::from_sample_)))
            }
            (SampleFormat::Int, 24) => Box::new(
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| S::from_sample_(I24::new_unchecked(v)))),
            ),
            (SampleFormat::Int, 32) => {
                Box::new(reader.samples::<i32>().map(|s| s.map(S::from_sample_)))
            }
            (sample_format, bits_per_sample) => {
                return Err(HoundAudioError::UnsupportedAudioFormat {
                    sample_format,
                    bits_per_sample,
                });
            }
        };
        debug!(
            "Reading {} channels at {} Hz, {:?} with {} bits per sample",
            spec.channels, spec.sample_rate, spec.sample_format, spec.bits_per_sample
        );
        Ok(Self {
            samples,
            number_of_channels: spec.channels as usize,
            frames_per_second: spec.sample_rate as u64,
        })
    }
}

impl<'wr, S> AudioReader<S> for HoundAudioReader<'wr, S> {
    type Err = HoundAudioError;

    fn number_of_channels(&self) -> usize {
        self.number_of_channels
    }

    fn frames_per_second(&self) -> u64 {
        self.frames_per_second
    }

    fn fill_buffer(&mut self, output: &mut AudioBufferOut<S>) -> Result<usize, Self::Err> {
        assert_eq!(output.number_of_channels(), self.number_of_channels);
        for frame in 0..output.number_of_frames() {
            for channel in 0..self.number_of_channels {
                match self.samples.next() {
                    Some(sample) => output.index_channel(channel)[frame] = sample?,
                    // An incomplete last frame is dropped.
                    None => return Ok(frame),
                }
            }
        }
        Ok(output.number_of_frames())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Float32,
    Int16,
    Int24,
    Int32,
}

/// An [`AudioWriter`] that writes to a `.wav` file.
///
/// Supported are 32 bit float and 16, 24 and 32 bit integer samples.
/// The caller is responsible for calling `finalize` on the `WavWriter`.
///
/// [`AudioWriter`]: ../trait.AudioWriter.html
pub struct HoundAudioWriter<'ww, W>
where
    W: Write + Seek,
{
    writer: &'ww mut WavWriter<W>,
    format: OutputFormat,
    number_of_channels: usize,
}

impl<'ww, W> HoundAudioWriter<'ww, W>
where
    W: Write + Seek,
{
    pub fn new(writer: &'ww mut WavWriter<W>) -> Result<Self, HoundAudioError> {
        let spec = writer.spec();
        let format = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => OutputFormat::Float32,
            (SampleFormat::Int, 16) => OutputFormat::Int16,
            (SampleFormat::Int, 24) => OutputFormat::Int24,
            (SampleFormat::Int, 32) => OutputFormat::Int32,
            (sample_format, bits_per_sample) => {
                return Err(HoundAudioError::UnsupportedAudioFormat {
                    sample_format,
                    bits_per_sample,
                });
            }
        };
        Ok(Self {
            writer,
            format,
            number_of_channels: spec.channels as usize,
        })
    }

    fn write_sample<S>(&mut self, sample: S) -> Result<(), hound::Error>
    where
        S: ToSample<f32> + ToSample<i16> + ToSample<I24> + ToSample<i32>,
    {
        match self.format {
            OutputFormat::Float32 => self.writer.write_sample::<f32>(sample.to_sample_()),
            OutputFormat::Int16 => self.writer.write_sample::<i16>(sample.to_sample_()),
            OutputFormat::Int24 => {
                let value: I24 = sample.to_sample_();
                self.writer.write_sample::<i32>(value.inner())
            }
            OutputFormat::Int32 => self.writer.write_sample::<i32>(sample.to_sample_()),
        }
    }
}

impl<'ww, W, S> AudioWriter<S> for HoundAudioWriter<'ww, W>
where
    W: Write + Seek,
    S: ToSample<f32> + ToSample<i16> + ToSample<I24> + ToSample<i32> + Copy,
{
    type Err = HoundAudioError;

    fn write_buffer(&mut self, buffer: &AudioBufferIn<S>) -> Result<(), Self::Err> {
        assert_eq!(buffer.number_of_channels(), self.number_of_channels);
        for frame in 0..buffer.number_of_frames() {
            for channel in buffer.channels().iter() {
                self.write_sample(channel[frame])?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::combined::memory::{AudioBufferReader, AudioBufferWriter};
    use crate::backend::combined::run;
    use crate::buffer::AudioChunk;
    use crate::Autopanner;
    use hound::WavSpec;
    use std::io::Cursor;

    fn spec(sample_format: SampleFormat, bits_per_sample: u16, channels: u16) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample,
            sample_format,
        }
    }

    fn write_wav(chunk: &AudioChunk<f32>, spec: WavSpec) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut wav_writer = WavWriter::new(&mut cursor, spec).unwrap();
            {
                let writer = HoundAudioWriter::new(&mut wav_writer).unwrap();
                run(
                    &mut crate::test_utilities::Identity,
                    3,
                    AudioBufferReader::new(chunk, 44100),
                    writer,
                )
                .unwrap();
            }
            wav_writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn read_wav(bytes: Vec<u8>) -> AudioChunk<f32> {
        let mut wav_reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let channels = wav_reader.spec().channels as usize;
        let reader = HoundAudioReader::<f32>::new(&mut wav_reader).unwrap();
        let mut chunk = AudioChunk::new(channels);
        run(
            &mut crate::test_utilities::Identity,
            4,
            reader,
            AudioBufferWriter::new(&mut chunk),
        )
        .unwrap();
        chunk
    }

    #[test]
    fn float_samples_survive_a_file() {
        let chunk = audio_chunk![[0.5_f32, -0.25, 0.125, 1.0, -1.0], [0.0, 0.1, 0.2, 0.3, 0.4]];
        let bytes = write_wav(&chunk, spec(SampleFormat::Float, 32, 2));
        assert_eq!(read_wav(bytes), chunk);
    }

    #[test]
    fn integer_samples_are_scaled() {
        let chunk = audio_chunk![[0.5_f32, -0.5, 0.0, -1.0]];
        for bits in &[16, 24, 32] {
            let bytes = write_wav(&chunk, spec(SampleFormat::Int, *bits, 1));
            let read = read_wav(bytes);
            for (actual, expected) in read.channels()[0].iter().zip(chunk.channels()[0].iter()) {
                assert!(
                    (actual - expected).abs() < 1e-4,
                    "{} bits: expected {}, got {}",
                    bits,
                    expected,
                    actual
                );
            }
        }
    }

    #[test]
    fn unsupported_output_format_is_rejected() {
        let mut cursor = Cursor::new(Vec::new());
        let mut wav_writer = WavWriter::new(&mut cursor, spec(SampleFormat::Int, 8, 1)).unwrap();
        match HoundAudioWriter::new(&mut wav_writer) {
            Err(HoundAudioError::UnsupportedAudioFormat {
                sample_format: SampleFormat::Int,
                bits_per_sample: 8,
            }) => {}
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("8 bit output should be rejected"),
        }
    }

    #[test]
    fn autopanner_processes_a_wav_file() {
        let input = AudioChunk::from_channels(vec![vec![0.5_f32; 100]; 2]);
        let bytes = write_wav(&input, spec(SampleFormat::Float, 32, 2));
        let mut wav_reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let reader = HoundAudioReader::<f32>::new(&mut wav_reader).unwrap();

        let mut plugin = Autopanner::new();
        let mut output = AudioChunk::new(2);
        run(&mut plugin, 32, reader, AudioBufferWriter::new(&mut output)).unwrap();
        assert_eq!(output.number_of_frames(), 100);
        for frame in 0..100 {
            let left = output.channels()[0][frame];
            let right = output.channels()[1][frame];
            assert!((left * left + right * right - 0.25).abs() < 1e-5);
        }
    }
}
