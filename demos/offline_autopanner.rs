// Run the autopanner over a `.wav` file.
//
// ```
// cargo run --example offline_autopanner -- input.wav output.wav [period in ms]
// ```
//
// The output is written as 32 bit float samples.
// See `vst_autopanner.rs` for the environment variables for logging and configuration.
#[cfg(feature = "backend-combined-hound")]
use autopanner::{
    backend::combined::{
        self,
        hound::{HoundAudioReader, HoundAudioWriter},
        AudioReader,
    },
    config::Settings,
    Autopanner,
};
#[cfg(feature = "backend-combined-hound")]
use std::error::Error;

#[cfg(feature = "backend-combined-hound")]
const BUFFER_SIZE_IN_FRAMES: usize = 256;

#[cfg(feature = "backend-combined-hound")]
fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;
    settings.initialize_logging()?;

    let arguments: Vec<String> = std::env::args().collect();
    if arguments.len() < 3 || arguments.len() > 4 {
        eprintln!(
            "Usage: {} <input.wav> <output.wav> [period in ms]",
            arguments[0]
        );
        std::process::exit(1);
    }

    let mut plugin = Autopanner::with_settings(settings.oscillator);
    if let Some(period) = arguments.get(3) {
        if !plugin.parameters().period_ms.set_from_text(period) {
            return Err(format!("Not a period in milliseconds: {}", period).into());
        }
    }

    let mut wav_reader = hound::WavReader::open(&arguments[1])?;
    let reader = HoundAudioReader::<f32>::new(&mut wav_reader)?;
    let spec = hound::WavSpec {
        channels: reader.number_of_channels() as u16,
        sample_rate: reader.frames_per_second() as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut wav_writer = hound::WavWriter::create(&arguments[2], spec)?;
    {
        let writer = HoundAudioWriter::new(&mut wav_writer)?;
        combined::run(&mut plugin, BUFFER_SIZE_IN_FRAMES, reader, writer)?;
    }
    wav_writer.finalize()?;
    Ok(())
}

#[cfg(not(feature = "backend-combined-hound"))]
fn main() {
    println!("This demo was compiled without support for reading and writing wav files.");
    println!("Compile with passing `--features backend-combined-hound`");
    println!("as parameter to `cargo`.");
}
