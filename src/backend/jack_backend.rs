//! Wrapper for the [JACK] backend.
//!
//! Support is only enabled if you compile with the "backend-jack" feature, see
//! [the cargo reference] for more information on setting cargo features.
//!
//! The plugin runs as a standalone JACK client with two audio input ports and two
//! audio output ports. For an example, see `jack_autopanner.rs` in the `demos` folder.
//!
//! [JACK]: http://www.jackaudio.org/
//! [the cargo reference]: https://doc.rust-lang.org/cargo/reference/manifest.html#the-features-section
use crate::backend::{HostInterface, Stop};
use crate::buffer::AudioBufferInOut;
use crate::{
    AudioHandler, AudioHandlerMeta, CommonAudioPortMeta, CommonPluginMeta, ContextualAudioRenderer,
};
use jack::{AudioIn, AudioOut, Client, ClientOptions, Control, Port, ProcessHandler, ProcessScope};
use std::io;

pub use jack;

/// The context passed to the plugin by the JACK backend.
#[derive(Debug, Default)]
pub struct JackHost {
    stop_requested: bool,
}

impl HostInterface for JackHost {
    fn output_initialized(&self) -> bool {
        false
    }

    fn stop(&mut self) {
        self.stop_requested = true;
    }
}

impl Stop for JackHost {}

/// The audio ports of a stereo effect.
pub struct StereoPorts {
    left_in: Port<AudioIn>,
    right_in: Port<AudioIn>,
    left_out: Port<AudioOut>,
    right_out: Port<AudioOut>,
}

impl StereoPorts {
    /// Register the ports, named after the audio ports of the plugin.
    pub fn register<P>(client: &Client, plugin: &P) -> Result<Self, jack::Error>
    where
        P: CommonAudioPortMeta,
    {
        let input_name = |index: usize| {
            let mut name = String::new();
            if index >= plugin.max_number_of_audio_inputs()
                || plugin.input_name(&mut name, index).is_err()
                || name.is_empty()
            {
                name = format!("audio in {}", index);
            }
            name
        };
        let output_name = |index: usize| {
            let mut name = String::new();
            if index >= plugin.max_number_of_audio_outputs()
                || plugin.output_name(&mut name, index).is_err()
                || name.is_empty()
            {
                name = format!("audio out {}", index);
            }
            name
        };
        let register_in = |name: String| {
            info!("Registering audio input port with name {}", name);
            client.register_port(&name, AudioIn::default())
        };
        let register_out = |name: String| {
            info!("Registering audio output port with name {}", name);
            client.register_port(&name, AudioOut::default())
        };
        Ok(StereoPorts {
            left_in: register_in(input_name(0))?,
            right_in: register_in(input_name(1))?,
            left_out: register_out(output_name(0))?,
            right_out: register_out(output_name(1))?,
        })
    }
}

/// Implements `jack::ProcessHandler` for a plugin.
pub struct JackHandler<P> {
    pub plugin: P,
    pub ports: StereoPorts,
}

impl<P> ProcessHandler for JackHandler<P>
where
    P: ContextualAudioRenderer<f32, JackHost> + Send,
{
    fn process(&mut self, _client: &Client, process_scope: &ProcessScope) -> Control {
        let number_of_frames = process_scope.n_frames() as usize;
        let inputs = [
            self.ports.left_in.as_slice(process_scope),
            self.ports.right_in.as_slice(process_scope),
        ];
        let mut outputs = [
            self.ports.left_out.as_mut_slice(process_scope),
            self.ports.right_out.as_mut_slice(process_scope),
        ];
        let mut buffer = AudioBufferInOut::new(&inputs, &mut outputs, number_of_frames);
        let mut host = JackHost::default();
        self.plugin.render_buffer(&mut buffer, &mut host);
        if host.stop_requested {
            Control::Quit
        } else {
            Control::Continue
        }
    }
}

/// Run the plugin until the user presses enter on the computer keyboard.
pub fn run<P>(mut plugin: P) -> Result<(), jack::Error>
where
    P: CommonPluginMeta
        + CommonAudioPortMeta
        + AudioHandler
        + ContextualAudioRenderer<f32, JackHost>
        + Send
        + 'static,
{
    let mut name = String::new();
    if plugin.plugin_name(&mut name).is_err() || name.is_empty() {
        name = "autopanner".to_string();
    }
    let (client, _status) = Client::new(&name, ClientOptions::NO_START_SERVER)?;

    let sample_rate = client.sample_rate();
    plugin.set_sample_rate(sample_rate as f64);

    let ports = StereoPorts::register(&client, &plugin)?;
    let active_client = client.activate_async((), JackHandler { plugin, ports })?;

    println!("Press enter to quit");
    let mut user_input = String::new();
    io::stdin().read_line(&mut user_input).ok();

    info!("Deactivating client...");
    active_client.deactivate()?;
    info!("Client deactivated.");
    Ok(())
}
