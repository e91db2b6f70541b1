//! Build capability descriptor.
//!
//! The full, headless and server-only builds share one pipeline. Every stage
//! branches on these fields instead of on `cfg` attributes, so all variants
//! can be exercised from the same test binary.

/// What the running build is able to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// An interactive front end is compiled in.
    pub interactive_ui: bool,
    /// Client mode is not available at all.
    pub server_only: bool,
    /// Start in server mode when no mode flag is given.
    pub server_by_default: bool,
    /// Unknown tokens are reported but do not end the process.
    ///
    /// The macOS application bundle launcher passes extra arguments
    /// the pipeline cannot know about.
    pub tolerate_unknown_args: bool,
}

impl Capabilities {
    /// Full build: GUI available, client by default, strict argument checking.
    pub const fn full() -> Self {
        Self {
            interactive_ui: true,
            server_only: false,
            server_by_default: false,
            tolerate_unknown_args: false,
        }
    }

    /// Build without an interactive front end.
    pub const fn headless() -> Self {
        Self {
            interactive_ui: false,
            ..Self::full()
        }
    }

    /// Server-only build.
    pub const fn server_only() -> Self {
        Self {
            server_only: true,
            server_by_default: true,
            ..Self::full()
        }
    }

    /// Descriptor for the binary that is currently running.
    pub fn current() -> Self {
        let server_only = cfg!(feature = "server-only");
        Self {
            interactive_ui: !cfg!(feature = "headless"),
            server_only,
            server_by_default: server_only
                || cfg!(all(feature = "server-bundle", target_os = "macos")),
            tolerate_unknown_args: cfg!(target_os = "macos"),
        }
    }

    /// Same descriptor with unknown-argument tolerance switched on.
    pub const fn tolerating_unknown_args(mut self) -> Self {
        self.tolerate_unknown_args = true;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::current()
    }
}
