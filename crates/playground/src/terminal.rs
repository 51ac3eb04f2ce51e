//! Environment descriptors for a terminal host.

use console::Term;
use playground_context::Environment;

/// Describes the terminal the CLI runs in.
///
/// The "screen resolution" of a terminal is its size in columns x rows.
#[derive(Debug, Clone)]
pub struct TerminalEnvironment {
    user_agent: String,
    size: Option<(u16, u16)>,
}

impl TerminalEnvironment {
    pub fn detect() -> Self {
        let term = std::env::var("TERM").unwrap_or_else(|_| "unknown".to_string());
        Self {
            user_agent: format!(
                "playground/{} ({}; {}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH,
                term
            ),
            size: Term::stdout().size_checked(),
        }
    }
}

impl Environment for TerminalEnvironment {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn screen_resolution(&self) -> Option<String> {
        self.size.map(|(rows, cols)| format!("{cols}x{rows}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_is_columns_by_rows() {
        let env = TerminalEnvironment {
            user_agent: "playground/test".into(),
            size: Some((24, 80)),
        };
        assert_eq!(env.screen_resolution().as_deref(), Some("80x24"));
    }

    #[test]
    fn test_detect_user_agent() {
        let env = TerminalEnvironment::detect();
        assert!(env.user_agent().starts_with("playground/"));
    }
}
