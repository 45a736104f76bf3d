//! Back-ends: the glue between the host and the plugin.
//!
//! Each back-end calls [`AudioHandler::set_sample_rate`] before rendering and then
//! [`ContextualAudioRenderer::render_buffer`] once per buffer, from a single thread.
//! The back-end passes itself (or a type representing the host) as the "context",
//! which implements [`HostInterface`].
//!
//! [`AudioHandler::set_sample_rate`]: ../trait.AudioHandler.html#tymethod.set_sample_rate
//! [`ContextualAudioRenderer::render_buffer`]: ../trait.ContextualAudioRenderer.html#tymethod.render_buffer
//! [`HostInterface`]: ./trait.HostInterface.html
pub mod combined;
#[cfg(feature = "backend-jack")]
pub mod jack_backend;
#[cfg(feature = "backend-vst")]
pub mod vst_backend;

/// Defines an interface for communicating with the host or server.
pub trait HostInterface {
    /// Return whether the output buffers are zero-initialized.
    /// Returns `false` when in doubt.
    fn output_initialized(&self) -> bool;

    /// Stop processing.
    /// This only does something for back-ends that implement the [`Stop`] trait.
    ///
    /// [`Stop`]: ./trait.Stop.html
    fn stop(&mut self) {}
}

/// A marker trait that indicates that the back-end can be stopped from the plugin.
pub trait Stop: HostInterface {}
