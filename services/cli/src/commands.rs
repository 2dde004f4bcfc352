use debate_core::{Speaker, Topic, TopicCatalog, Turn};

pub const HELP: &str = "\
Commands:
  /new              start a new debate
  /back             return to the topic list (before the debate starts)
  /search <query>   filter the suggested topics
  /transcript       print the debate so far
  /help             show this help
  /quit             exit
Anything else is your topic, your stance, or your next argument.";

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    NewDebate,
    Back,
    Transcript,
    Help,
    Search(String),
    Text(String),
    Empty,
}

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    match head {
        "/quit" | "/exit" => Command::Quit,
        "/new" => Command::NewDebate,
        "/back" => Command::Back,
        "/transcript" => Command::Transcript,
        "/help" => Command::Help,
        "/search" => Command::Search(rest.to_string()),
        // Keep the user's text as typed; only blank lines are dropped.
        _ => Command::Text(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// What a line typed at the topic prompt refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicChoice {
    Suggestion(Topic),
    Own(String),
}

// A number picks a suggestion (1-based); anything else is a topic of the user's own.
pub fn resolve_topic(catalog: &TopicCatalog, text: &str) -> TopicChoice {
    if let Ok(number) = text.trim().parse::<usize>() {
        if let Some(topic) = number.checked_sub(1).and_then(|i| catalog.get(i)) {
            return TopicChoice::Suggestion(topic.clone());
        }
    }
    TopicChoice::Own(text.to_string())
}

pub fn label(turn: &Turn) -> &'static str {
    match turn.role() {
        Speaker::User => "You",
        Speaker::Assistant => "AI Opponent",
    }
}

pub fn format_turn(turn: &Turn) -> String {
    format!("{}: {}", label(turn), turn.content())
}

pub fn format_catalog(catalog: &TopicCatalog) -> String {
    if !catalog.is_available() {
        return "Suggested topics are unavailable; type your own topic.".to_string();
    }
    catalog
        .topics()
        .iter()
        .enumerate()
        .map(|(i, topic)| format!("  {}. {}", i + 1, topic))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TopicCatalog {
        TopicCatalog::Loaded(vec![
            Topic::from("Free Will vs. Determinism"),
            Topic::from("Climate Policy"),
        ])
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("  /new "), Command::NewDebate);
        assert_eq!(parse("/back"), Command::Back);
        assert_eq!(parse("/search  free will "), Command::Search("free will".to_string()));
        assert_eq!(parse("   "), Command::Empty);
        assert_eq!(
            parse("Markets solve this"),
            Command::Text("Markets solve this".to_string())
        );
    }

    #[test]
    fn test_resolve_topic_by_number() {
        assert_eq!(
            resolve_topic(&catalog(), "2"),
            TopicChoice::Suggestion(Topic::from("Climate Policy"))
        );
        // Out of range numbers are just text.
        assert_eq!(resolve_topic(&catalog(), "0"), TopicChoice::Own("0".to_string()));
        assert_eq!(resolve_topic(&catalog(), "7"), TopicChoice::Own("7".to_string()));
        assert_eq!(
            resolve_topic(&catalog(), "Is math discovered?"),
            TopicChoice::Own("Is math discovered?".to_string())
        );
    }

    #[test]
    fn test_format_turn_labels() {
        assert_eq!(format_turn(&Turn::user("hi")), "You: hi");
        assert_eq!(format_turn(&Turn::assistant("no")), "AI Opponent: no");
    }

    #[test]
    fn test_format_unavailable_catalog() {
        let catalog = TopicCatalog::Unavailable {
            reason: "connection refused".to_string(),
        };
        assert!(format_catalog(&catalog).contains("type your own topic"));
        assert_eq!(format_catalog(&self::catalog()), "  1. Free Will vs. Determinism\n  2. Climate Policy");
    }
}
