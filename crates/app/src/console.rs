//! Line-oriented presentation layer for a quiz session.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::str::FromStr;

use quiz_core::model::{ChoiceKey, GradingReport, QuestionIndex};
use services::{QuizSession, SessionError, SessionEvent};
use thiserror::Error;

pub const CONFIRM_PROMPT: &str =
    "Submit your answers? They cannot be changed afterwards. [y/N] ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show(Option<usize>),
    Next,
    Prev,
    Answer { number: usize, key: ChoiceKey },
    Status,
    Submit,
    Report,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("expected a question number, got {0:?}")]
    BadNumber(String),
    #[error("expected a choice letter A-E, got {0:?}")]
    BadKey(String),
    #[error("usage: <number> <letter>, e.g. `3 b`")]
    MissingKey,
}

fn parse_number(raw: &str) -> Result<usize, CommandError> {
    raw.trim_start_matches(['q', 'Q'])
        .parse()
        .map_err(|_| CommandError::BadNumber(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Help);
        };

        match head.to_ascii_lowercase().as_str() {
            "show" | "s" => Ok(Command::Show(words.next().map(parse_number).transpose()?)),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "status" => Ok(Command::Status),
            "submit" => Ok(Command::Submit),
            "report" | "r" => Ok(Command::Report),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "answer" | "a" => {
                let number = words.next().ok_or(CommandError::MissingKey)?;
                let key = words.next().ok_or(CommandError::MissingKey)?;
                answer(number, key)
            }
            _ if head.chars().next().is_some_and(|c| c.is_ascii_digit() || c == 'q' || c == 'Q') => {
                let key = words.next().ok_or(CommandError::MissingKey)?;
                answer(head, key)
            }
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}

fn answer(number: &str, key: &str) -> Result<Command, CommandError> {
    let number = parse_number(number)?;
    let key = key
        .parse::<ChoiceKey>()
        .map_err(|_| CommandError::BadKey(key.to_string()))?;
    Ok(Command::Answer { number, key })
}

/// Drives a session from line input and mirrors its state as text.
pub struct Console<R, W> {
    input: R,
    out: W,
    session: QuizSession,
    current: usize,
    indicators: Rc<RefCell<Vec<Option<char>>>>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(mut session: QuizSession, input: R, out: W) -> Self {
        let indicators = Rc::new(RefCell::new(vec![None; session.bank().len()]));
        let sink = Rc::clone(&indicators);
        session.subscribe(move |event: &SessionEvent| {
            if let SessionEvent::SelectionChanged { index, key } = event {
                if let Some(slot) = sink.borrow_mut().get_mut(index.value()) {
                    *slot = Some(key.glyph());
                }
            }
        });

        Self {
            input,
            out,
            session,
            current: 0,
            indicators,
        }
    }

    #[cfg(test)]
    fn into_session(self) -> QuizSession {
        self.session
    }

    /// Read commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from the input or output streams.
    pub fn run(&mut self, title: Option<&str>) -> io::Result<()> {
        if let Some(title) = title {
            writeln!(self.out, "== {title} ==")?;
        }
        writeln!(
            self.out,
            "{} questions. Type `help` for commands.",
            self.session.bank().len()
        )?;
        if !self.session.bank().is_empty() {
            self.show(self.current)?;
        }

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };

            match line.parse::<Command>() {
                Ok(Command::Quit) => return Ok(()),
                Ok(command) => self.dispatch(command)?,
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn dispatch(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Show(None) => self.show(self.current),
            Command::Show(Some(number)) => match QuestionIndex::from_display_number(number) {
                Some(index) if index.value() < self.session.bank().len() => {
                    self.current = index.value();
                    self.show(self.current)
                }
                _ => writeln!(self.out, "no question {number}"),
            },
            Command::Next => {
                if self.current + 1 < self.session.bank().len() {
                    self.current += 1;
                }
                self.show(self.current)
            }
            Command::Prev => {
                self.current = self.current.saturating_sub(1);
                self.show(self.current)
            }
            Command::Answer { number, key } => self.answer(number, key),
            Command::Status => self.status(),
            Command::Submit => self.submit(),
            Command::Report => match self.session.report() {
                Ok(report) => {
                    let report = report.clone();
                    self.print_report(&report)
                }
                Err(err) => writeln!(self.out, "{err}"),
            },
            Command::Help => self.help(),
            Command::Quit => Ok(()),
        }
    }

    fn show(&mut self, position: usize) -> io::Result<()> {
        let Ok(question) = self.session.question(QuestionIndex::new(position)) else {
            return writeln!(self.out, "no question {}", position + 1);
        };
        let selected = self.session.selection(question.index()).ok().flatten();

        writeln!(self.out)?;
        writeln!(self.out, "Q{}. {}", question.index().display_number(), question.text())?;
        if let Some(image) = question.image() {
            writeln!(self.out, "   [image: {image}]")?;
        }
        if let Some(passage) = question.passage() {
            writeln!(self.out, "   | {passage}")?;
        }
        for choice in question.choices() {
            let marker = if selected == Some(choice.key()) { '*' } else { ' ' };
            writeln!(self.out, " {marker} {} {}", choice.key().glyph(), choice.text())?;
        }
        Ok(())
    }

    fn answer(&mut self, number: usize, key: ChoiceKey) -> io::Result<()> {
        let Some(index) = QuestionIndex::from_display_number(number) else {
            return writeln!(self.out, "no question {number}");
        };
        match self.session.select_answer(index, key) {
            Ok(()) => {
                self.current = index.value();
                writeln!(self.out, "Q{number}: {}", key.glyph())
            }
            Err(SessionError::SessionAlreadyGraded) => {
                writeln!(self.out, "Answers were submitted and can no longer be changed.")
            }
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    fn status(&mut self) -> io::Result<()> {
        let row: Vec<String> = self
            .indicators
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, glyph)| format!("Q{}[{}]", i + 1, glyph.unwrap_or(' ')))
            .collect();
        writeln!(self.out, "{}", row.join(" "))?;

        let progress = self.session.progress();
        writeln!(
            self.out,
            "{}/{} answered{}",
            progress.answered,
            progress.total,
            if progress.is_graded { ", submitted" } else { "" }
        )
    }

    fn submit(&mut self) -> io::Result<()> {
        let pending = match self.session.request_submission() {
            Ok(pending) => pending,
            Err(SessionError::AlreadySubmitted) => {
                return writeln!(self.out, "You have already submitted your answers.");
            }
            Err(SessionError::IncompleteAnswers { unanswered }) => {
                let numbers: Vec<String> = unanswered
                    .iter()
                    .map(|i| i.display_number().to_string())
                    .collect();
                return writeln!(
                    self.out,
                    "All questions must be answered first. Unanswered: {}",
                    numbers.join(", ")
                );
            }
            Err(err) => return writeln!(self.out, "{err}"),
        };

        write!(self.out, "{CONFIRM_PROMPT}")?;
        self.out.flush()?;
        let confirmed = self
            .read_line()?
            .is_some_and(|reply| matches!(reply.to_ascii_lowercase().as_str(), "y" | "yes"));

        if !confirmed {
            self.session.cancel(pending);
            return writeln!(self.out, "Submission cancelled.");
        }

        match self.session.confirm(pending) {
            Ok(report) => {
                let report = report.clone();
                self.print_report(&report)
            }
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    fn print_report(&mut self, report: &GradingReport) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Correct: {}    Incorrect: {}    ({:.0}%)",
            report.correct_count(),
            report.incorrect_count(),
            report.score_percent()
        )?;
        if report.incorrect().is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{:>4}  {:>7}  {:>7}", "No.", "Yours", "Correct")?;
        for miss in report.incorrect() {
            let given = miss.given.map_or_else(|| "-".to_string(), |k| k.to_string());
            writeln!(
                self.out,
                "{:>4}  {:>7}  {:>7}",
                miss.index.display_number(),
                given,
                miss.expected
            )?;
        }
        Ok(())
    }

    fn help(&mut self) -> io::Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  <n> <letter>     answer question n, e.g. `2 c`")?;
        writeln!(self.out, "  show [n]         show the current question or question n")?;
        writeln!(self.out, "  next | prev      move between questions")?;
        writeln!(self.out, "  status           answered/unanswered overview")?;
        writeln!(self.out, "  submit           grade your answers (asks for confirmation)")?;
        writeln!(self.out, "  report           show the result again")?;
        writeln!(self.out, "  quit")
    }
}
