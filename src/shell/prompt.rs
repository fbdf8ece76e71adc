use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented stdin reader shared by every interactive command.
pub(crate) struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and read one line. `None` on end of input.
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Like [`Prompt::ask`] but end of input is an error.
    pub async fn require(&mut self, label: &str) -> Result<String> {
        self.ask(label)
            .await?
            .ok_or_else(|| anyhow::anyhow!("input closed"))
    }
}
