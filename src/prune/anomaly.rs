// src/prune/anomaly.rs

use std::{
    fmt,
    io::{BufRead, Write},
    str::FromStr,
};

use tracing::warn;

/// A data line whose cell count could not be reconciled with the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    /// 1-based position among the anomalies of this run.
    pub ordinal: usize,
    /// 1-based physical line number in the input.
    pub line_number: usize,
    pub found: usize,
    pub expected: usize,
    /// Key column name and value, when a key column is configured.
    pub key: Option<(String, String)>,
    /// Line content after quoted delimiter substitution.
    pub line: String,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - incorrect column count on line : {}, columns count : {} / {}",
            self.ordinal, self.line_number, self.found, self.expected
        )?;
        if let Some((name, value)) = &self.key {
            write!(f, ", key {} = {}", name, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Abort,
}

/// Decides whether a run keeps scanning after an anomaly.
///
/// Whatever the decision, a run with anomalies never writes output; the
/// policy only controls how many of them get collected first.
pub trait AnomalyPolicy {
    fn on_anomaly(&mut self, anomaly: &Anomaly) -> Decision;
}

/// Collect every anomaly in the file.
#[derive(Debug, Default)]
pub struct ContinueAll;

impl AnomalyPolicy for ContinueAll {
    fn on_anomaly(&mut self, _anomaly: &Anomaly) -> Decision {
        Decision::Continue
    }
}

/// Stop once `limit` anomalies have been seen.
#[derive(Debug)]
pub struct AbortAfter {
    limit: usize,
    seen: usize,
}

impl AbortAfter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            seen: 0,
        }
    }
}

impl AnomalyPolicy for AbortAfter {
    fn on_anomaly(&mut self, _anomaly: &Anomaly) -> Decision {
        self.seen += 1;
        if self.seen >= self.limit {
            Decision::Abort
        } else {
            Decision::Continue
        }
    }
}

/// Ask the operator on every anomaly: `q` quits, anything else continues.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, anomaly: &Anomaly) -> std::io::Result<Decision> {
        writeln!(self.output, "{}\n\n{}\n", anomaly, anomaly.line)?;
        write!(self.output, "press [Enter] to continue or [q] to quit : ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        if answer.trim().eq_ignore_ascii_case("q") {
            Ok(Decision::Abort)
        } else {
            Ok(Decision::Continue)
        }
    }
}

impl ConsolePrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> AnomalyPolicy for ConsolePrompt<R, W> {
    fn on_anomaly(&mut self, anomaly: &Anomaly) -> Decision {
        match self.ask(anomaly) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("console prompt failed ({}), continuing", e);
                Decision::Continue
            }
        }
    }
}

/// Policy selection as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    Prompt,
    Continue,
    Abort,
    AbortAfter(usize),
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn AnomalyPolicy> {
        match self {
            PolicyKind::Prompt => Box::new(ConsolePrompt::stdio()),
            PolicyKind::Continue => Box::new(ContinueAll),
            PolicyKind::Abort => Box::new(AbortAfter::new(1)),
            PolicyKind::AbortAfter(n) => Box::new(AbortAfter::new(n)),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prompt" => Ok(PolicyKind::Prompt),
            "continue" => Ok(PolicyKind::Continue),
            "abort" => Ok(PolicyKind::Abort),
            _ => {
                let n = s
                    .strip_prefix("abort-after=")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|&n| n > 0)
                    .ok_or_else(|| {
                        format!(
                            "unknown anomaly policy `{}` (prompt, continue, abort, abort-after=N)",
                            s
                        )
                    })?;
                Ok(PolicyKind::AbortAfter(n))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn anomaly(ordinal: usize) -> Anomaly {
        Anomaly {
            ordinal,
            line_number: 7,
            found: 4,
            expected: 3,
            key: Some(("ID".into(), "42".into())),
            line: "a#b#c#d".into(),
        }
    }

    #[test]
    fn test_display_includes_line_and_key() {
        assert_eq!(
            anomaly(2).to_string(),
            "2 - incorrect column count on line : 7, columns count : 4 / 3, key ID = 42"
        );
        let mut no_key = anomaly(1);
        no_key.key = None;
        assert!(no_key.to_string().ends_with("columns count : 4 / 3"));
    }

    #[test]
    fn test_abort_after_counts_anomalies() {
        let mut policy = AbortAfter::new(3);
        assert_eq!(policy.on_anomaly(&anomaly(1)), Decision::Continue);
        assert_eq!(policy.on_anomaly(&anomaly(2)), Decision::Continue);
        assert_eq!(policy.on_anomaly(&anomaly(3)), Decision::Abort);
    }

    #[test]
    fn test_console_prompt_answers() {
        let mut out = Vec::new();
        let mut prompt = ConsolePrompt::new(Cursor::new("\nQ\n"), &mut out);
        assert_eq!(prompt.on_anomaly(&anomaly(1)), Decision::Continue);
        assert_eq!(prompt.on_anomaly(&anomaly(2)), Decision::Abort);
        // end of input behaves like Enter
        assert_eq!(prompt.on_anomaly(&anomaly(3)), Decision::Continue);
        drop(prompt);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("incorrect column count on line : 7"));
        assert!(shown.contains("a#b#c#d"));
        assert!(shown.contains("press [Enter] to continue or [q] to quit : "));
    }

    #[test]
    fn test_policy_kind_parsing() {
        assert_eq!("prompt".parse::<PolicyKind>(), Ok(PolicyKind::Prompt));
        assert_eq!("continue".parse::<PolicyKind>(), Ok(PolicyKind::Continue));
        assert_eq!(
            "abort-after=5".parse::<PolicyKind>(),
            Ok(PolicyKind::AbortAfter(5))
        );
        assert!("abort-after=0".parse::<PolicyKind>().is_err());
        assert!("retry".parse::<PolicyKind>().is_err());
    }
}
