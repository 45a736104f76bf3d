// The autopanner as a standalone JACK client.
//
// Compiling
// =========
// You can compile this demo with
// ```
// cargo build --release --example jack_autopanner --features backend-jack
// ```
//
// Running
// =======
// 1. Start the `jack` daemon, e.g. with `qjackctl`.
// 2. Start `target/release/examples/jack_autopanner`.
// 3. Connect a stereo source to "left in" and "right in" and connect
//    "left out" and "right out" to the system playback ports.
//
// See `vst_autopanner.rs` for the environment variables for logging and configuration.
#[cfg(feature = "backend-jack")]
use autopanner::{backend::jack_backend, config::Settings, Autopanner};
#[cfg(feature = "backend-jack")]
use std::error::Error;

#[cfg(feature = "backend-jack")]
fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;
    settings.initialize_logging()?;
    jack_backend::run(Autopanner::with_settings(settings.oscillator))?;
    Ok(())
}

#[cfg(not(feature = "backend-jack"))]
fn main() {
    println!("This demo was compiled without support for jack.");
    println!("Compile with passing `--features backend-jack`");
    println!("as parameter to `cargo`.");
}
