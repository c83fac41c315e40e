//! Autocompletion for the statement currently being typed.

use bevy::prelude::*;

use super::{ConsoleRegistry, ParsedSequence, ParsedStatement, Resolved};

/// Candidate list for the last statement of the input line.
///
/// The list is never empty; when nothing matches it holds a single `""`.
#[derive(Debug, Clone)]
pub struct Autocompletion {
    source: String,
    last_token: String,
    candidates: Vec<String>,
    selected: usize,
}

impl Default for Autocompletion {
    fn default() -> Self {
        Self {
            source: String::new(),
            last_token: String::new(),
            candidates: vec![String::new()],
            selected: 0,
        }
    }
}

impl Autocompletion {
    /// Create an empty completion state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the candidates for a new input line.
    ///
    /// The selection sticks to the previously shown candidate when it is
    /// still offered, otherwise it goes back to the first one.
    pub fn refresh(&mut self, sequence: &ParsedSequence, registry: &ConsoleRegistry, world: &World) {
        let previous = self.current().to_string();

        let mut statement = match sequence.last() {
            Some(last) if sequence.is_open() => last.clone(),
            _ => ParsedStatement::default(),
        };
        if sequence.is_open() && sequence.ends_with_whitespace() {
            statement.push("");
        }

        let mut candidates = candidates_for(&statement, registry, world);
        if candidates.is_empty() {
            candidates.push(String::new());
        }

        self.source = sequence.source().to_string();
        self.last_token = statement.last().unwrap_or("").to_string();
        self.selected = candidates
            .iter()
            .position(|candidate| *candidate == previous)
            .unwrap_or(0);
        self.candidates = candidates;
    }

    /// All candidates, in display order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Index of the selected candidate.
    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The selected candidate, `""` if there is none.
    pub fn current(&self) -> &str {
        self.candidates
            .get(self.selected)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Check if there is a non-empty candidate to offer.
    pub fn has_suggestion(&self) -> bool {
        !self.current().is_empty()
    }

    /// Select the next candidate, wrapping around.
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.candidates.len().max(1);
    }

    /// Select the previous candidate, wrapping around.
    pub fn previous(&mut self) {
        let len = self.candidates.len().max(1);
        self.selected = (self.selected + len - 1) % len;
    }

    /// The input line with its trailing token replaced by the selected
    /// candidate. Unchanged when the candidate is empty.
    pub fn current_suggestion(&self) -> String {
        let candidate = self.current();
        if candidate.is_empty() {
            return self.source.clone();
        }

        let head = self
            .source
            .strip_suffix(self.last_token.as_str())
            .unwrap_or(&self.source);
        format!("{}{}", head, candidate)
    }
}

fn candidates_for(statement: &ParsedStatement, registry: &ConsoleRegistry, world: &World) -> Vec<String> {
    let tokens = statement.tokens();
    match tokens {
        [] => Vec::new(),
        [partial] => registry.name_candidates(partial),
        [name, args @ ..] => match registry.resolve(name) {
            Resolved::Command(meta) => registry
                .complete_args(meta.name(), args, world)
                .unwrap_or_default(),
            Resolved::Variable(var) => {
                let value = var.as_str();
                match args {
                    [typed] if value.is_empty() || value.to_lowercase().starts_with(&typed.to_lowercase()) => {
                        vec![value.to_string()]
                    }
                    _ => Vec::new(),
                }
            }
            Resolved::NotFound => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConCommand, ConVar, complete_from, parse};

    fn registry() -> ConsoleRegistry {
        let mut registry = ConsoleRegistry::new();
        registry.register_cmd(
            ConCommand::new("warp", |_, _| true).autocomplete(|args, _| {
                Some(complete_from(args.last()?, ["village", "nature_hub", "villageville_3d"]))
            }),
        );
        registry.register_cmd(ConCommand::new("noclip", |_, _| true));
        registry.register_var(ConVar::new("timescale", "", "1"));
        registry.register_var(ConVar::new("noclip_speed", "", "5"));
        registry
    }

    fn refreshed(line: &str) -> Autocompletion {
        let registry = registry();
        let world = World::new();
        let mut completion = Autocompletion::new();
        completion.refresh(&parse(line), &registry, &world);
        completion
    }

    #[test]
    fn test_empty_line_has_placeholder() {
        let completion = refreshed("");
        assert_eq!(completion.candidates(), [""]);
        assert!(!completion.has_suggestion());
        assert_eq!(completion.current_suggestion(), "");
    }

    #[test]
    fn test_name_prefix_candidates() {
        let completion = refreshed("NO");
        assert_eq!(completion.candidates(), ["noclip", "noclip_speed 5"]);
        assert_eq!(completion.current_suggestion(), "noclip");
    }

    #[test]
    fn test_closed_sequence_has_placeholder() {
        for line in [" ", "noclip; ", "noclip;"] {
            let completion = refreshed(line);
            assert_eq!(completion.candidates(), [""], "line {:?}", line);
            assert_eq!(completion.current_suggestion(), line);
        }
    }

    #[test]
    fn test_no_match_placeholder() {
        assert_eq!(refreshed("zzz").candidates(), [""]);
        assert_eq!(refreshed("zzz arg").candidates(), [""]);
        assert_eq!(refreshed("zzz").current_suggestion(), "zzz");
    }

    #[test]
    fn test_command_argument_delegation() {
        let completion = refreshed("warp vil");
        assert_eq!(completion.candidates(), ["village", "villageville_3d"]);
        assert_eq!(completion.current_suggestion(), "warp village");

        let completion = refreshed("warp ");
        assert_eq!(completion.candidates().len(), 3);
        assert_eq!(completion.current_suggestion(), "warp village");
    }

    #[test]
    fn test_command_without_provider() {
        assert_eq!(refreshed("noclip ").candidates(), [""]);
    }

    #[test]
    fn test_variable_value_candidate() {
        assert_eq!(refreshed("timescale ").candidates(), ["1"]);
        assert_eq!(refreshed("timescale 1").candidates(), ["1"]);
        assert_eq!(refreshed("timescale 2").candidates(), [""]);
        assert_eq!(refreshed("timescale 1 2").candidates(), [""]);
    }

    #[test]
    fn test_only_last_statement_completes() {
        let completion = refreshed("noclip; war");
        assert_eq!(completion.candidates(), ["warp"]);
        assert_eq!(completion.current_suggestion(), "noclip; warp");

        assert_eq!(refreshed("noclip;").candidates(), [""]);
    }

    #[test]
    fn test_cycling_wraps() {
        let mut completion = refreshed("no");
        assert_eq!(completion.current(), "noclip");
        completion.next();
        assert_eq!(completion.current(), "noclip_speed 5");
        completion.next();
        assert_eq!(completion.current(), "noclip");
        completion.previous();
        assert_eq!(completion.current(), "noclip_speed 5");
    }

    #[test]
    fn test_selection_sticks_across_refresh() {
        let registry = registry();
        let world = World::new();
        let mut completion = Autocompletion::new();

        completion.refresh(&parse("n"), &registry, &world);
        completion.next();
        assert_eq!(completion.current(), "noclip_speed 5");

        completion.refresh(&parse("noc"), &registry, &world);
        assert_eq!(completion.current(), "noclip_speed 5");

        completion.refresh(&parse("w"), &registry, &world);
        assert_eq!(completion.selected(), 0);
        assert_eq!(completion.current(), "warp");
    }

    #[test]
    fn test_suggestion_keeps_typed_prefix_when_quoted() {
        let completion = refreshed(r#"warp "vil"#);
        assert_eq!(completion.candidates(), [""]);

        let completion = refreshed("warp VIL");
        assert_eq!(completion.current_suggestion(), "warp village");
    }
}
