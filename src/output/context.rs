use super::Theme;
use crate::cli::Cli;
use crate::error::Result;
use rich_rust::prelude::*;
use rich_rust::renderables::Renderable;
use std::io::IsTerminal;

/// Central output coordinator that respects rich/plain/json/quiet modes.
pub struct OutputContext {
    /// Rich console for human-readable output
    console: Console,
    theme: Theme,
    mode: OutputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Full rich formatting (tables, colors, rules)
    Rich,
    /// Plain text, no ANSI codes (for piping)
    Plain,
    /// JSON output only
    Json,
    /// Minimal output (quiet mode)
    Quiet,
}

impl OutputContext {
    /// Create from CLI global args
    #[must_use]
    pub fn from_args(args: &Cli) -> Self {
        Self::from_flags(args.json, args.quiet, args.no_color)
    }

    /// Create from CLI-style flags.
    #[must_use]
    pub fn from_flags(json: bool, quiet: bool, no_color: bool) -> Self {
        let mode = Self::detect_mode(
            json,
            quiet,
            no_color || std::env::var_os("NO_COLOR").is_some(),
            std::io::stdout().is_terminal(),
        );
        Self::with_mode(mode)
    }

    #[must_use]
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            console: Self::create_console(mode),
            theme: Theme::default(),
            mode,
        }
    }

    const fn detect_mode(json: bool, quiet: bool, no_color: bool, tty: bool) -> OutputMode {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else if no_color || !tty {
            OutputMode::Plain
        } else {
            OutputMode::Rich
        }
    }

    fn create_console(mode: OutputMode) -> Console {
        match mode {
            OutputMode::Rich => Console::new(),
            OutputMode::Plain | OutputMode::Quiet | OutputMode::Json => {
                Console::builder().no_color().force_terminal(false).build()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Mode Checks
    // ─────────────────────────────────────────────────────────────

    pub fn mode(&self) -> OutputMode {
        self.mode
    }
    pub fn is_rich(&self) -> bool {
        self.mode == OutputMode::Rich
    }
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Progress bars only make sense next to human-readable output.
    pub fn wants_progress(&self) -> bool {
        matches!(self.mode, OutputMode::Rich | OutputMode::Plain)
    }

    // ─────────────────────────────────────────────────────────────
    // Output Methods
    // ─────────────────────────────────────────────────────────────

    /// Markup in rich mode, verbatim text in plain mode.
    pub fn print(&self, content: &str) {
        match self.mode {
            OutputMode::Rich => self.console.print(content),
            OutputMode::Plain => println!("{content}"),
            OutputMode::Quiet | OutputMode::Json => {}
        }
    }

    pub fn render<R: Renderable>(&self, renderable: &R) {
        if self.is_rich() {
            self.console.print_renderable(renderable);
        }
    }

    /// Emit `value` as a single JSON line in json mode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        if self.is_json() {
            println!("{}", serde_json::to_string(value)?);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // Semantic Output Methods
    // ─────────────────────────────────────────────────────────────

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Rich => {
                self.console.print(&format!("[bold green]✓[/] {message}"));
            }
            OutputMode::Plain => println!("✓ {message}"),
            OutputMode::Quiet | OutputMode::Json => {}
        }
    }

    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Rich => {
                self.console.print(&format!("[blue]ℹ[/] {message}"));
            }
            OutputMode::Plain => println!("{message}"),
            OutputMode::Quiet | OutputMode::Json => {}
        }
    }
}
