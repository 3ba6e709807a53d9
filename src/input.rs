use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::types::{SearchCriteria, TimeWindow, parse_timestamp};

pub const START_PROMPT: &str = "Enter the start timestamp (YYYY-MM-DDTHH:MM:SSZ): ";
pub const END_PROMPT: &str = "Enter the end timestamp (YYYY-MM-DDTHH:MM:SSZ): ";
pub const INSTANCE_PROMPT: &str = "Enter the instance ID: ";
pub const PROJECT_PROMPT: &str = "Enter the project ID (leave blank to search all projects): ";
pub const INVALID_TIMESTAMP: &str =
    "Invalid format. Please enter the timestamp in the format YYYY-MM-DDTHH:MM:SSZ";

/// Source of answers to console questions.
pub trait Prompter {
    fn ask(&mut self, message: &str) -> anyhow::Result<String>;
    fn notify(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Interactive prompter for terminals.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, message: &str) -> anyhow::Result<String> {
        Ok(inquire::Text::new(message.trim_end()).prompt()?)
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        println!("{}", message);
        Ok(())
    }
}

/// Line based prompter used when stdin is piped.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, message: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("stdin closed while waiting for input");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

fn ask_timestamp<P: Prompter>(prompter: &mut P, message: &str) -> anyhow::Result<DateTime<Utc>> {
    loop {
        let answer = prompter.ask(message)?;
        match parse_timestamp(&answer) {
            Ok(t) => return Ok(t),
            Err(e) => {
                tracing::debug!("Rejected timestamp {:?}: {}", answer, e);
                prompter.notify(INVALID_TIMESTAMP)?;
            }
        }
    }
}

/// Ask for the time window, instance and optional project.
///
/// Timestamps are asked again until they parse. Start is not required to
/// precede end.
pub fn collect_criteria<P: Prompter>(prompter: &mut P) -> anyhow::Result<SearchCriteria> {
    let start = ask_timestamp(prompter, START_PROMPT)?;
    let end = ask_timestamp(prompter, END_PROMPT)?;
    let instance_id = prompter.ask(INSTANCE_PROMPT)?;
    let project_id = prompter.ask(PROJECT_PROMPT)?;

    Ok(SearchCriteria {
        window: TimeWindow { start, end },
        instance_id,
        project_id: Some(project_id).filter(|p| !p.trim().is_empty()),
    })
}
