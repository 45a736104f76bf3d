// The autopanner as a VST 2.4 plugin.
//
// Compiling
// =========
// You can compile this demo with
// ```
// cargo build --release --example vst_autopanner --features backend-vst
// ```
// This generates a library that you can find
//
// * as `target/release/examples/libvst_autopanner.so` when you're using Linux
// * under the `target/release/examples/` folder when you're using Windows or MacOs
//
// Copy the library to the folder where your host looks for VST plugins.
//
// Logging and configuration
// =========================
// Set `AUTOPANNER_LOG_LEVEL` to one of 'off', 'error', 'warning', 'info', 'debug' or 'trace'
// and, optionally, `AUTOPANNER_LOG_FILE` to the file you want to log to.
// Set `AUTOPANNER_COMPATIBILITY` to 'corrected' for the corrected oscillator.
// Note that these environment variables need to be visible to the host.
use autopanner::config::Settings;
use autopanner::Autopanner;

autopanner::vst_init!(
    fn init() -> Autopanner {
        let settings = match Settings::from_env() {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{}. Using the default settings.", e);
                Settings::default()
            }
        };
        if let Err(e) = settings.initialize_logging() {
            eprintln!("{}", e);
        }
        Autopanner::with_settings(settings.oscillator)
    }
);
