//! Tokenizing user input into the fixed verb table.
//!
//! A line splits on whitespace into `verb [argument]`; the verb is matched
//! case-sensitively against the strum-derived table below. Direct lookup
//! replaces hash-based dispatch, so collisions cannot arise.
use strum_macros::{Display, EnumString};

/// The fixed set of REPL verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    /// Ask the service for a standing subscription (confirmed, ack-driven).
    Subscribe,
    /// Drop a subscription and forget the symbol locally.
    Unsubscribe,
    /// One-shot spot price request.
    Query,
    /// Render the local price history as an ASCII chart.
    Graph,
    /// Request the stored price series from the service.
    History,
    /// Print every cached symbol with price and change.
    List,
    /// Print the command reference and safety tips.
    Help,
    /// Clear the terminal and reprint the banner.
    Clear,
    /// Set the display currency.
    Currency,
    /// End the session.
    Exit,
}

impl Verb {
    fn takes_argument(self) -> bool {
        !matches!(self, Verb::List | Verb::Help | Verb::Clear | Verb::Exit)
    }

    /// Usage line printed when the argument is missing.
    pub fn usage(self) -> &'static str {
        match self {
            Verb::Subscribe => "Usage: subscribe <symbol>",
            Verb::Unsubscribe => "Usage: unsubscribe <symbol>",
            Verb::Query => "Usage: query <symbol>",
            Verb::Graph => "Usage: graph <symbol>",
            Verb::History => "Usage: history <symbol>",
            Verb::Currency => "Usage: currency <code>",
            Verb::List | Verb::Help | Verb::Clear | Verb::Exit => "",
        }
    }
}

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The matched verb.
    pub verb: Verb,
    /// First token after the verb, if any; further tokens are ignored.
    pub argument: Option<String>,
}

/// What a line of input turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A well-formed command ready for dispatch.
    Command(CommandLine),
    /// Nothing but whitespace.
    Empty,
    /// First token is not in the verb table.
    UnknownVerb(String),
    /// The verb needs an argument that was not given; carries its usage line.
    MissingArgument(&'static str),
}

/// Tokenize one line of user input.
pub fn parse(line: &str) -> ParseOutcome {
    let mut tokens = line.split_whitespace();
    let Some(word) = tokens.next() else {
        return ParseOutcome::Empty;
    };
    let Ok(verb) = word.parse::<Verb>() else {
        return ParseOutcome::UnknownVerb(String::from(word));
    };
    let argument = tokens.next().map(String::from);
    if verb.takes_argument() && argument.is_none() {
        return ParseOutcome::MissingArgument(verb.usage());
    }
    ParseOutcome::Command(CommandLine { verb, argument })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_verb_parses() {
        for (text, verb) in [
            ("subscribe", Verb::Subscribe),
            ("unsubscribe", Verb::Unsubscribe),
            ("query", Verb::Query),
            ("graph", Verb::Graph),
            ("history", Verb::History),
            ("list", Verb::List),
            ("help", Verb::Help),
            ("clear", Verb::Clear),
            ("currency", Verb::Currency),
            ("exit", Verb::Exit),
        ] {
            assert_eq!(text.parse::<Verb>().unwrap(), verb);
        }
    }

    #[test]
    fn verb_match_is_case_sensitive() {
        assert_eq!(
            parse("Subscribe AAPL"),
            ParseOutcome::UnknownVerb(String::from("Subscribe"))
        );
        assert_eq!(parse("EXIT"), ParseOutcome::UnknownVerb(String::from("EXIT")));
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(parse(""), ParseOutcome::Empty);
        assert_eq!(parse("   \t "), ParseOutcome::Empty);
    }

    #[test]
    fn missing_argument_reports_usage() {
        assert_eq!(
            parse("subscribe"),
            ParseOutcome::MissingArgument("Usage: subscribe <symbol>")
        );
        assert_eq!(
            parse("currency"),
            ParseOutcome::MissingArgument("Usage: currency <code>")
        );
    }

    #[test]
    fn argument_and_extra_tokens() {
        assert_eq!(
            parse("query AAPL"),
            ParseOutcome::Command(CommandLine {
                verb: Verb::Query,
                argument: Some(String::from("AAPL")),
            })
        );
        // Extra tokens beyond the argument are ignored.
        assert_eq!(
            parse("query AAPL now please"),
            ParseOutcome::Command(CommandLine {
                verb: Verb::Query,
                argument: Some(String::from("AAPL")),
            })
        );
        // Zero-arity verbs tolerate a stray argument.
        assert_eq!(
            parse("list everything"),
            ParseOutcome::Command(CommandLine {
                verb: Verb::List,
                argument: Some(String::from("everything")),
            })
        );
    }
}
