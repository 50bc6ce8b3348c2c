use crate::error::{AppError, AppResult};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::io::{IsTerminal, Write};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub quiet: bool,
    pub no_color: bool,
    pub verbose: bool,
}

/// Output sink for command text. Direct mode writes straight through to the
/// process stdout/stderr; buffered mode accumulates everything for the
/// notification wrapper, which replays it exactly once afterwards. The
/// buffer lives only for the dynamic extent of one wrapped invocation.
pub struct Console {
    buffer: Option<RefCell<String>>,
}

impl Console {
    pub fn direct() -> Self {
        Self { buffer: None }
    }

    pub fn buffered() -> Self {
        Self {
            buffer: Some(RefCell::new(String::new())),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn line(&self, text: impl AsRef<str>) {
        match &self.buffer {
            Some(buf) => {
                let mut buf = buf.borrow_mut();
                buf.push_str(text.as_ref());
                buf.push('\n');
            }
            None => println!("{}", text.as_ref()),
        }
    }

    pub fn warning(&self, text: impl AsRef<str>) {
        self.stderr_line(format!("[WARNING] {}", text.as_ref()));
    }

    pub fn error(&self, text: impl AsRef<str>) {
        self.stderr_line(format!("[ERROR] {}", text.as_ref()));
    }

    pub fn stderr_line(&self, text: String) {
        match &self.buffer {
            Some(buf) => {
                let mut buf = buf.borrow_mut();
                buf.push_str(&text);
                buf.push('\n');
            }
            None => eprintln!("{text}"),
        }
    }

    /// Consume the console and return whatever was captured. Empty for a
    /// direct console.
    pub fn into_captured(self) -> String {
        match self.buffer {
            Some(buf) => buf.into_inner(),
            None => String::new(),
        }
    }
}

#[derive(Debug)]
pub struct CommandOutput {
    pub data: Value,
    pub text: String,
}

impl CommandOutput {
    pub fn new(data: Value, text: impl Into<String>) -> Self {
        Self {
            data,
            text: text.into(),
        }
    }
}

pub fn emit_ok(cfg: OutputConfig, console: &Console, output: CommandOutput) {
    match cfg.mode {
        OutputMode::Json => {
            let body = json!({
                "ok": true,
                "data": output.data,
            });
            console.line(body.to_string());
        }
        OutputMode::Text => {
            if !output.text.is_empty() {
                console.line(&output.text);
            } else if !cfg.quiet {
                console.line("OK");
            }
        }
    }
}

pub fn emit_err(cfg: OutputConfig, console: &Console, err: &AppError) {
    match cfg.mode {
        OutputMode::Json => {
            console.line(err.as_json().to_string());
        }
        OutputMode::Text => {
            let prefix = if cfg.verbose {
                format!("[{}] ", err.code())
            } else {
                String::new()
            };
            if cfg.no_color || console.is_capturing() {
                console.stderr_line(format!("[ERROR] {}{}", prefix, err));
            } else {
                console.stderr_line(format!("\u{1b}[31m[ERROR] {}{}\u{1b}[0m", prefix, err));
            }
        }
    }
}

/// Interactive yes/no gate for destructive commands. Capturing consoles and
/// non-terminal stdin cannot answer, so those runs must pass --force.
pub fn confirm(console: &Console, prompt: &str) -> AppResult<bool> {
    if console.is_capturing() || !std::io::stdin().is_terminal() {
        return Err(AppError::usage(
            "confirmation required; re-run with --force in non-interactive use",
        ));
    }
    eprint!("{prompt} [y/N]: ");
    std::io::stderr()
        .flush()
        .map_err(|e| AppError::internal(format!("failed to flush stderr: {e}")))?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(|e| AppError::internal(format!("failed to read confirmation: {e}")))?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
