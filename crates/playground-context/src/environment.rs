//! Host environment descriptors embedded in session bootstrap entries.

/// Read-only descriptors supplied by the hosting runtime.
pub trait Environment: Send + Sync {
    /// Client descriptor, the equivalent of a browser user agent.
    fn user_agent(&self) -> String;

    /// Display resolution as `<width>x<height>`, if the host has a display.
    fn screen_resolution(&self) -> Option<String>;
}

/// Fixed descriptors, for hosts that know them up front and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub user_agent: String,
    pub screen_resolution: Option<String>,
}

impl StaticEnvironment {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            screen_resolution: None,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.screen_resolution = Some(format!("{width}x{height}"));
        self
    }
}

impl Default for StaticEnvironment {
    /// Describes the current process: crate name, version, OS and architecture.
    fn default() -> Self {
        Self::new(format!(
            "{}/{} ({}; {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }
}

impl Environment for StaticEnvironment {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn screen_resolution(&self) -> Option<String> {
        self.screen_resolution.clone()
    }
}
