//! Terminal command dispatcher.
//!
//! A line of input is first matched against the literal commands (`ls`,
//! `mount`, `cat`, ...). Anything else is handed to the natural-language
//! resolver. The dispatcher also tracks session state: the mounted module,
//! the section being read, and which sections are completed.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `ls` | list modules, unmount |
//! | `mount <n>` | mount module `n` and list its sections |
//! | `cat [id]` | print a section (the current one without an id) |
//! | `next`, `prev` / `previous` | walk sections within the current module |
//! | `complete` / `done` | mark the current section completed |
//! | `progress` | completion overall and per module |
//! | `time` | remaining minutes from section durations |
//! | `help` | command list |
//! | `clear`, `admin`, `showmethemoney` | system actions for the host UI |

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use academy_search_core::models::{Module, Section};
use academy_search_core::resolver::QueryResolver;
use academy_search_core::result::SearchResult;

use crate::format::{format_minutes, format_no_match, format_result, with_hints, EXAMPLE_QUERIES};

/// The command a line of input was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Ls,
    Mount,
    Cat,
    Next,
    Prev,
    Complete,
    Progress,
    Time,
    Help,
    Clear,
    Admin,
    ShowMeTheMoney,
    /// Not a literal command; handed to the resolver.
    Nlp,
}

/// How the host should present a [`CommandResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Output,
    Error,
    Success,
    System,
}

/// Side effects the host UI is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAction {
    ClearScreen,
    OpenAdmin,
    OpenFinancials,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub kind: OutputKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<SystemAction>,
}

impl CommandResult {
    fn output(message: impl Into<String>) -> Self {
        Self::new(OutputKind::Output, message)
    }

    fn error(message: impl Into<String>) -> Self {
        Self::new(OutputKind::Error, message)
    }

    fn success(message: impl Into<String>) -> Self {
        Self::new(OutputKind::Success, message)
    }

    fn system(message: impl Into<String>, action: SystemAction) -> Self {
        Self {
            kind: OutputKind::System,
            message: message.into(),
            action: Some(action),
        }
    }

    fn new(kind: OutputKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
        }
    }
}

/// In-memory reading state for one terminal session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mounted_module: Option<String>,
    pub current_section: Option<String>,
    pub completed: BTreeSet<String>,
}

const LITERAL_COMMANDS: &str =
    "ls, mount, cat, next, prev, complete, progress, time, help, clear, admin, showmethemoney";

const HELP_TEXT: &str = "AVAILABLE COMMANDS:
  ls                    List all curriculum modules
  mount [id]            Expand module details (e.g., 'mount 01')
  cat [section]         View section content (e.g., 'cat 01.2')
  next                  Go to next section
  prev                  Go to previous section
  complete              Mark current section as completed
  progress              Show overall curriculum progress
  time                  Estimate remaining study time
  admin                 Open the admin dashboard
  showmethemoney        Open the business plan
  help                  Show this help message
  clear                 Clear the terminal

NATURAL LANGUAGE QUERIES:
  Ask naturally about the curriculum:";

const NO_ACTIVE_SECTION: &str = "ERROR: No section currently active. Use \"cat [section-id]\" first.";

/// Classify a line. Returns the command and its lower-cased arguments.
pub fn parse_command(input: &str) -> (CommandType, Vec<String>) {
    let lowered = input.trim().to_lowercase();
    if is_financials_request(&lowered) {
        return (CommandType::ShowMeTheMoney, Vec::new());
    }

    let mut parts = lowered.split_whitespace();
    let Some(command) = parts.next() else {
        return (CommandType::Nlp, Vec::new());
    };
    let args: Vec<String> = parts.map(str::to_string).collect();

    let kind = match command {
        "ls" => CommandType::Ls,
        "mount" => CommandType::Mount,
        "cat" => CommandType::Cat,
        "next" => CommandType::Next,
        "prev" | "previous" => CommandType::Prev,
        "complete" | "done" => CommandType::Complete,
        "progress" => CommandType::Progress,
        "time" => CommandType::Time,
        "help" => CommandType::Help,
        "clear" => CommandType::Clear,
        "admin" => CommandType::Admin,
        _ => return (CommandType::Nlp, vec![input.trim().to_string()]),
    };
    (kind, args)
}

fn is_financials_request(lowered: &str) -> bool {
    let squashed: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();
    squashed.contains("showmethemoney")
        || lowered.contains("money")
        || lowered.contains("financial")
        || squashed.contains("businessplan")
}

/// Parse a duration such as `"15 min"` into minutes. Anything else (`"Week
/// 1"`, `"Self-paced"`) has no minute estimate.
pub fn parse_minutes(duration: &str) -> Option<u32> {
    let mut words = duration.split_whitespace();
    let minutes: u32 = words.next()?.parse().ok()?;
    let unit = words.next()?.to_lowercase();
    unit.starts_with("min").then_some(minutes)
}

/// Routes terminal input to literal commands or the resolver.
pub struct CommandHandler {
    resolver: QueryResolver,
    session: Session,
}

impl CommandHandler {
    pub fn new(resolver: QueryResolver) -> Self {
        Self {
            resolver,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn resolver(&self) -> &QueryResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut QueryResolver {
        &mut self.resolver
    }

    /// Handle one line of input.
    pub fn handle(&mut self, input: &str) -> CommandResult {
        let (command, args) = parse_command(input);
        debug!(?command, ?args, "dispatching");

        match command {
            CommandType::Ls => self.list_modules(),
            CommandType::Mount => self.mount(args.first().map(String::as_str)),
            CommandType::Cat => self.cat(args.first().map(String::as_str)),
            CommandType::Next => self.step(1),
            CommandType::Prev => self.step(-1),
            CommandType::Complete => self.complete(),
            CommandType::Progress => self.progress(),
            CommandType::Time => self.time_estimate(),
            CommandType::Help => CommandResult::output(help_text()),
            CommandType::Clear => {
                CommandResult::system("> TERMINAL CLEARED", SystemAction::ClearScreen)
            }
            CommandType::Admin => {
                CommandResult::system("> INITIALIZING_ADMIN_PROTOCOL...", SystemAction::OpenAdmin)
            }
            CommandType::ShowMeTheMoney => CommandResult::system(
                "> ACCESSING FINANCIAL VAULT...",
                SystemAction::OpenFinancials,
            ),
            CommandType::Nlp => self.natural_language(input.trim()),
        }
    }

    /// Resolve `query` and render it. Returns the raw result alongside the
    /// rendered text.
    pub fn process_nlp_query(&mut self, query: &str) -> (Option<SearchResult>, String) {
        match self.resolver.parse_query(query) {
            Some(result) => {
                let formatted = format_result(&result);
                (Some(result), formatted)
            }
            None => {
                let hints = self.resolver.context_aware_suggestions(query);
                (None, with_hints(format_no_match(query), &hints))
            }
        }
    }

    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        self.resolver.get_suggestions(partial)
    }

    fn natural_language(&mut self, query: &str) -> CommandResult {
        if query.is_empty() {
            return CommandResult::error("ERROR: Empty command. Type \"help\" for available commands.");
        }
        match self.process_nlp_query(query) {
            (Some(result), formatted) => {
                if let Some(section) = &result.section {
                    self.session.current_section = Some(section.id.clone());
                }
                if let Some(module) = &result.module {
                    self.session.mounted_module = Some(module.id.clone());
                }
                CommandResult::output(formatted)
            }
            (None, formatted) => CommandResult::error(format!(
                "ERROR: Unknown command \"{}\". Commands: {}.\n\n{}",
                query, LITERAL_COMMANDS, formatted
            )),
        }
    }

    fn list_modules(&mut self) -> CommandResult {
        self.session.mounted_module = None;
        let corpus = self.resolver.corpus();
        if corpus.modules.is_empty() {
            return CommandResult::output("> No modules available.");
        }

        let mut out = String::from("> LISTING MODULES...\n");
        for module in &corpus.modules {
            let done = self.completed_in(module);
            out.push_str(&format!(
                "\n  [{}] {:<28} {:>2}/{} sections  {}",
                module.number,
                module.title,
                done,
                module.sections.len(),
                module.duration
            ));
        }
        out.push_str("\n\nType \"mount <number>\" to open a module.");
        CommandResult::output(out)
    }

    fn mount(&mut self, arg: Option<&str>) -> CommandResult {
        let Some(arg) = arg else {
            return CommandResult::error("ERROR: mount requires module ID (e.g., \"mount 01\")");
        };
        let number = format!("{:0>2}", arg);
        let Some(module) = self.resolver.corpus().module_by_number(&number) else {
            return CommandResult::error(format!("ERROR: Module {} not found", number));
        };

        let mut out = format!(
            "> MOUNTING MODULE {}...\n\n📚 {}\n{}\n\n{}\n",
            module.number, module.title, module.subtitle, module.objective
        );
        for section in &module.sections {
            let mark = if self.session.completed.contains(&section.id) {
                "x"
            } else {
                " "
            };
            out.push_str(&format!("\n  [{}] {}  {}", mark, section.id, section.title));
        }
        let module_id = module.id.clone();
        self.session.mounted_module = Some(module_id);
        CommandResult::output(out)
    }

    fn cat(&mut self, arg: Option<&str>) -> CommandResult {
        let id = match arg {
            Some(id) => id.to_string(),
            None => match &self.session.current_section {
                Some(id) => id.clone(),
                None => {
                    return CommandResult::error(
                        "ERROR: cat requires section ID (e.g., \"cat 01.2\")",
                    )
                }
            },
        };
        self.show_section(&id)
    }

    fn show_section(&mut self, id: &str) -> CommandResult {
        let Some((module, section)) = self.resolver.corpus().section(id) else {
            return CommandResult::error(format!("ERROR: Section {} not found", id));
        };
        let out = render_section(module, section, self.session.completed.contains(id));
        self.session.mounted_module = Some(module.id.clone());
        self.session.current_section = Some(section.id.clone());
        CommandResult::output(out)
    }

    /// Move `delta` sections within the module of the current section.
    fn step(&mut self, delta: isize) -> CommandResult {
        let Some(current) = self.session.current_section.clone() else {
            return CommandResult::error(NO_ACTIVE_SECTION);
        };
        let Some((module, _)) = self.resolver.corpus().section(&current) else {
            return CommandResult::error(NO_ACTIVE_SECTION);
        };
        let target = module
            .sections
            .iter()
            .position(|s| s.id == current)
            .and_then(|i| i.checked_add_signed(delta))
            .and_then(|i| module.sections.get(i))
            .map(|s| s.id.clone());

        match target {
            Some(target) => {
                let mut result = self.show_section(&target);
                let banner = if delta > 0 {
                    "> ADVANCING TO NEXT SECTION..."
                } else {
                    "> RETURNING TO PREVIOUS SECTION..."
                };
                result.message = format!("{}\n\n{}", banner, result.message);
                result
            }
            None if delta > 0 => {
                CommandResult::error("> Already at last section of this module")
            }
            None => CommandResult::error("> Already at first section of this module"),
        }
    }

    fn complete(&mut self) -> CommandResult {
        let Some(id) = self.session.current_section.clone() else {
            return CommandResult::error(NO_ACTIVE_SECTION);
        };
        self.session.completed.insert(id.clone());
        CommandResult::success(format!(
            "> MARKING SECTION {} AS COMPLETED...\n> ✓ PROGRESS SAVED!",
            id
        ))
    }

    fn progress(&self) -> CommandResult {
        let corpus = self.resolver.corpus();
        let total = corpus.section_count();
        let done = corpus
            .sections()
            .filter(|(_, s)| self.session.completed.contains(&s.id))
            .count();
        let percent = if total > 0 { done * 100 / total } else { 0 };

        let cheer = if percent >= 100 {
            "ALL MODULES COMPLETED! 🎉"
        } else if percent > 50 {
            "Halfway there! Keep going! 💪"
        } else {
            "Just getting started! You got this! 🚀"
        };

        let mut out = format!(
            "> OVERALL CURRICULUM PROGRESS: {}% ({}/{} sections)\n> {}\n",
            percent, done, total, cheer
        );
        for module in &corpus.modules {
            out.push_str(&format!(
                "\n  {} {:<28} {}/{}",
                module.number,
                module.title,
                self.completed_in(module),
                module.sections.len()
            ));
        }
        CommandResult::success(out)
    }

    fn time_estimate(&self) -> CommandResult {
        let corpus = self.resolver.corpus();
        let mut minutes = 0u32;
        let mut remaining = 0usize;
        let mut unestimated: Vec<&str> = Vec::new();

        for (_, section) in corpus.sections() {
            if self.session.completed.contains(&section.id) {
                continue;
            }
            remaining += 1;
            match section.duration.as_deref().and_then(parse_minutes) {
                Some(m) => minutes += m,
                None => unestimated.push(section.id.as_str()),
            }
        }

        let mut out = format!(
            "> CALCULATING TIMELINE...\n\n  Remaining sections: {}\n  Estimated time:     {}",
            remaining,
            format_minutes(minutes)
        );
        if !unestimated.is_empty() {
            out.push_str(&format!(
                "\n  Self-paced:         {} (no minute estimate)",
                unestimated.join(", ")
            ));
        }
        CommandResult::output(out)
    }

    fn completed_in(&self, module: &Module) -> usize {
        module
            .sections
            .iter()
            .filter(|s| self.session.completed.contains(&s.id))
            .count()
    }
}

fn render_section(module: &Module, section: &Section, completed: bool) -> String {
    let mut out = format!("> {} / {}\n\n📖 {}", module.title, section.id, section.title);
    if let Some(duration) = &section.duration {
        out.push_str(&format!("  ({})", duration));
    }
    if completed {
        out.push_str("  ✓");
    }
    out.push_str(&format!("\n\n{}", section.content));
    out
}

fn help_text() -> String {
    let mut out = String::from(HELP_TEXT);
    for example in EXAMPLE_QUERIES {
        out.push_str(&format!("\n  • \"{}\"", example));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_search_core::models::Corpus;
    use academy_search_core::vocabulary::Vocabulary;

    fn handler() -> CommandHandler {
        let corpus = Corpus::from_json(include_str!("../data/curriculum.json")).unwrap();
        CommandHandler::new(QueryResolver::new(corpus, Vocabulary::default()))
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse_command("ls").0, CommandType::Ls);
        assert_eq!(parse_command("  MOUNT 1 ").0, CommandType::Mount);
        assert_eq!(parse_command("mount 1").1, vec!["1"]);
        assert_eq!(parse_command("previous").0, CommandType::Prev);
        assert_eq!(parse_command("done").0, CommandType::Complete);
        assert_eq!(parse_command("show me the money").0, CommandType::ShowMeTheMoney);
        assert_eq!(parse_command("business plan").0, CommandType::ShowMeTheMoney);
        assert_eq!(parse_command("Tell me about module 2").0, CommandType::Nlp);
        assert_eq!(parse_command("Tell me about module 2").1, vec!["Tell me about module 2"]);
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("15 min"), Some(15));
        assert_eq!(parse_minutes("40 min hands-on"), Some(40));
        assert_eq!(parse_minutes("Week 1"), None);
        assert_eq!(parse_minutes(""), None);
    }

    #[test]
    fn test_ls_lists_and_unmounts() {
        let mut h = handler();
        h.handle("mount 2");
        assert_eq!(h.session().mounted_module.as_deref(), Some("module-02"));
        let r = h.handle("ls");
        assert_eq!(r.kind, OutputKind::Output);
        assert!(r.message.contains("[05] Practicum"));
        assert!(h.session().mounted_module.is_none());
    }

    #[test]
    fn test_mount_errors() {
        let mut h = handler();
        assert_eq!(h.handle("mount").kind, OutputKind::Error);
        let r = h.handle("mount 9");
        assert_eq!(r.kind, OutputKind::Error);
        assert!(r.message.contains("Module 09 not found"));
    }

    #[test]
    fn test_cat_and_walk() {
        let mut h = handler();
        assert_eq!(h.handle("cat").kind, OutputKind::Error);
        assert_eq!(h.handle("next").kind, OutputKind::Error);

        let r = h.handle("cat 00.3");
        assert!(r.message.contains("📖 The Cost-Quality-Speed Triangle"));
        assert_eq!(h.session().current_section.as_deref(), Some("00.3"));

        // stays inside the module
        let r = h.handle("next");
        assert_eq!(r.kind, OutputKind::Error);
        assert_eq!(r.message, "> Already at last section of this module");
        assert_eq!(h.session().current_section.as_deref(), Some("00.3"));
        let r = h.handle("prev");
        assert!(r.message.starts_with("> RETURNING TO PREVIOUS SECTION..."));
        assert_eq!(h.session().current_section.as_deref(), Some("00.2"));
        h.handle("next");
        assert_eq!(h.session().current_section.as_deref(), Some("00.3"));

        let r = h.handle("cat");
        assert!(r.message.contains("00.3"));

        assert_eq!(h.handle("cat 99.1").kind, OutputKind::Error);
    }

    #[test]
    fn test_walk_bounds() {
        let mut h = handler();
        h.handle("cat 00.1");
        let r = h.handle("prev");
        assert_eq!(r.kind, OutputKind::Error);
        assert_eq!(r.message, "> Already at first section of this module");
        h.handle("cat 01.1");
        assert_eq!(h.handle("prev").kind, OutputKind::Error);
        assert_eq!(h.session().current_section.as_deref(), Some("01.1"));
        h.handle("cat 05.2");
        assert!(h.handle("next").message.contains("last section of this module"));
    }

    #[test]
    fn test_complete_and_progress() {
        let mut h = handler();
        assert_eq!(h.handle("complete").kind, OutputKind::Error);
        h.handle("cat 01.1");
        let r = h.handle("done");
        assert_eq!(r.kind, OutputKind::Success);
        assert!(h.session().completed.contains("01.1"));

        let total = h.resolver().corpus().section_count();
        let r = h.handle("progress");
        assert!(r.message.contains(&format!("(1/{} sections)", total)));
        assert!(r.message.contains("Just getting started"));
    }

    #[test]
    fn test_time_skips_completed() {
        let mut h = handler();
        let before = h.handle("time").message;
        assert!(before.contains("Self-paced:"));
        assert!(before.contains("05.1"));
        h.handle("cat 04.3");
        h.handle("complete");
        let after = h.handle("time").message;
        assert_ne!(before, after);
        assert!(!after.contains("Remaining sections: 20"));
    }

    #[test]
    fn test_system_actions() {
        let mut h = handler();
        assert_eq!(h.handle("clear").action, Some(SystemAction::ClearScreen));
        assert_eq!(h.handle("admin").action, Some(SystemAction::OpenAdmin));
        let r = h.handle("showmethemoney");
        assert_eq!(r.kind, OutputKind::System);
        assert_eq!(r.action, Some(SystemAction::OpenFinancials));
    }

    #[test]
    fn test_help_lists_commands() {
        let mut h = handler();
        let r = h.handle("help");
        assert!(r.message.starts_with("AVAILABLE COMMANDS:"));
        assert!(r.message.contains("\"Explain orchestration\""));
    }

    #[test]
    fn test_natural_language_updates_session() {
        let mut h = handler();
        let r = h.handle("Explain orchestration");
        assert_eq!(r.kind, OutputKind::Output);
        assert!(r.message.contains("cat 02.4"));
        assert_eq!(h.session().current_section.as_deref(), Some("02.4"));
        assert_eq!(h.handle("prev").kind, OutputKind::Output);
        assert_eq!(h.session().current_section.as_deref(), Some("02.3"));
    }

    #[test]
    fn test_unknown_command() {
        let mut h = handler();
        let r = h.handle("asdkfjhaslkdjfh");
        assert_eq!(r.kind, OutputKind::Error);
        assert!(r.message.starts_with("ERROR: Unknown command \"asdkfjhaslkdjfh\""));
        assert!(r.message.contains("mount"));
        assert!(r.message.contains("Try asking naturally"));
        assert!(h.resolver().query_history()[0].result_type.is_none());
    }

    #[test]
    fn test_empty_input() {
        let mut h = handler();
        assert_eq!(h.handle("   ").kind, OutputKind::Error);
    }
}
