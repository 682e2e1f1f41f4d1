//! Operator prompts behind a small capability trait, so the engine can be
//! driven by a terminal, a script, or a fixed policy.

use colored::Colorize;
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin, Stderr, Write};
use tracing::debug;

/// A question put to the operator: pick one of `count` listed options.
///
/// Besides an index, `y` picks the first (newest) option and `n` or an empty
/// reply skips the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Text shown before the input cursor
    pub text: String,
    /// Number of options listed
    pub count: usize,
}

impl Prompt {
    /// A question answered by picking one of `count` options
    #[must_use]
    pub fn choice(text: impl Into<String>, count: usize) -> Self {
        Self {
            text: text.into(),
            count,
        }
    }

    /// The accepted answers, for error messages
    #[must_use]
    pub fn expected(&self) -> String {
        format!("1-{}", self.count)
    }

    fn hint(&self) -> String {
        format!("[1-{}, y = newest, Enter to skip]", self.count)
    }
}

/// Typed operator answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// `y` keeps the newest option; `n`, an empty reply or closed input skips
    YesNo(bool),
    /// 1-based option index, already range-checked
    Index(usize),
    /// Anything that did not parse or was out of range, verbatim
    Invalid(String),
}

/// Parse a raw reply to a question with `count` options
#[must_use]
pub fn parse_answer(count: usize, input: &str) -> Answer {
    let reply = input.trim();

    match reply.to_lowercase().as_str() {
        "y" | "yes" => Answer::YesNo(true),
        "" | "n" | "no" => Answer::YesNo(false),
        _ => match reply.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Answer::Index(n),
            _ => Answer::Invalid(reply.to_string()),
        },
    }
}

/// Source of operator decisions
pub trait Prompter {
    /// Put `prompt` to the operator and return the parsed reply
    fn ask(&mut self, prompt: &Prompt) -> Answer;

    /// Show context (for example the numbered list of copies) before asking
    fn show(&mut self, _line: &str) {}
}

/// Line-oriented prompter over any reader/writer pair
pub struct LinePrompter<R, W> {
    /// Where replies are read from
    reader: R,
    /// Where questions are written
    writer: W,
}

/// Prompter bound to the process terminal
pub type StdinPrompter = LinePrompter<BufReader<Stdin>, Stderr>;

impl StdinPrompter {
    /// Prompt on stderr and read replies from stdin
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    /// Create a prompter over explicit streams
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, prompt: &Prompt) -> Answer {
        let _ = write!(
            self.writer,
            "{} {} ",
            prompt.text.bold(),
            prompt.hint().dimmed()
        );
        let _ = self.writer.flush();

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                debug!("Prompt input closed, treating as no");
                Answer::YesNo(false)
            }
            Ok(_) => parse_answer(prompt.count, &line),
            Err(e) => {
                debug!(error = %e, "Failed to read prompt reply");
                Answer::Invalid(String::new())
            }
        }
    }

    fn show(&mut self, line: &str) {
        let _ = writeln!(self.writer, "{line}");
    }
}

/// Replays canned replies; answers "no" once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    /// Remaining raw replies
    replies: VecDeque<String>,
    /// Every prompt text asked so far
    asked: Vec<String>,
}

impl ScriptedPrompter {
    /// Script the given raw replies, in order
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts asked so far
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &Prompt) -> Answer {
        self.asked.push(prompt.text.clone());
        self.replies
            .pop_front()
            .map_or(Answer::YesNo(false), |reply| parse_answer(prompt.count, &reply))
    }
}

/// Always accepts the newest copy; backs `--yes`
#[derive(Debug, Default, Clone, Copy)]
pub struct NewestPrompter;

impl Prompter for NewestPrompter {
    fn ask(&mut self, _prompt: &Prompt) -> Answer {
        Answer::Index(1)
    }
}
