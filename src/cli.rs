//! Command-line argument parsing for the editor

use clap::Parser;
use std::path::PathBuf;

/// A small scriptable terminal text editor
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "A small scriptable terminal text editor")]
pub struct CliArgs {
    /// File to load into the buffer
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Startup script to run instead of the user or system quillrc
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub rc: Option<PathBuf>,

    /// Go to line N after loading
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Go to column N (used with --line)
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,
}

impl CliArgs {
    /// Initial cursor position, converted from 1-indexed user input
    pub fn initial_position(&self) -> Option<(usize, usize)> {
        self.line.map(|line| {
            let line_0 = line.saturating_sub(1);
            let col_0 = self.column.unwrap_or(1).saturating_sub(1);
            (line_0, col_0)
        })
    }
}
