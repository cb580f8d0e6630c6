//! Interactive terminal loop.
//!
//! Reads one command per line and prints the dispatcher's answer. The
//! prompt is only shown when stdin is a terminal, so piped input produces
//! clean, script-friendly output. `exit` or `quit` (or EOF) ends the loop.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::dispatch::{CommandHandler, CommandResult, OutputKind, SystemAction};

const PROMPT: &str = "academy> ";
const BANNER: &str = "> VIBE_CURRICULUM_BROWSER\n> READY. Type \"help\" for commands, or just ask.";

/// Options for [`run_shell`].
pub struct ShellOptions {
    /// Print the banner and a prompt before each line.
    pub interactive: bool,
}

impl ShellOptions {
    /// Interactive iff stdin is a TTY.
    pub fn detect() -> Self {
        Self {
            interactive: atty::is(atty::Stream::Stdin),
        }
    }
}

/// Run the loop until EOF or `exit`. Returns the number of lines handled.
pub fn run_shell<R: BufRead, W: Write>(
    handler: &mut CommandHandler,
    input: R,
    output: &mut W,
    options: &ShellOptions,
) -> Result<usize> {
    if options.interactive {
        writeln!(output, "{}\n", BANNER)?;
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if matches!(trimmed, "exit" | "quit") {
            break;
        }
        if !trimmed.is_empty() {
            let result = handler.handle(trimmed);
            write_result(output, &result, options.interactive)?;
            handled += 1;
        }

        if options.interactive {
            write!(output, "{}", PROMPT)?;
            output.flush()?;
        }
    }
    Ok(handled)
}

/// Print one result. `clear` only emits the terminal escape when
/// interactive.
pub fn write_result<W: Write>(
    output: &mut W,
    result: &CommandResult,
    interactive: bool,
) -> Result<()> {
    if result.kind == OutputKind::System
        && result.action == Some(SystemAction::ClearScreen)
        && interactive
    {
        write!(output, "\x1B[2J\x1B[H")?;
        return Ok(());
    }
    writeln!(output, "{}\n", result.message)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_search_core::models::Corpus;
    use academy_search_core::resolver::QueryResolver;
    use academy_search_core::vocabulary::Vocabulary;

    fn handler() -> CommandHandler {
        let corpus = Corpus::from_json(include_str!("../data/curriculum.json")).unwrap();
        CommandHandler::new(QueryResolver::new(corpus, Vocabulary::default()))
    }

    #[test]
    fn test_piped_session() {
        let mut h = handler();
        let input = b"cat 01.1\n\nnext\ncomplete\nprogress\n" as &[u8];
        let mut out = Vec::new();
        let n = run_shell(&mut h, input, &mut out, &ShellOptions { interactive: false }).unwrap();
        assert_eq!(n, 4);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains(PROMPT));
        assert!(text.contains("MARKING SECTION 01.2 AS COMPLETED"));
        assert!(text.contains("(1/"));
    }

    #[test]
    fn test_exit_stops() {
        let mut h = handler();
        let input = b"ls\nexit\nls\n" as &[u8];
        let mut out = Vec::new();
        let n = run_shell(&mut h, input, &mut out, &ShellOptions { interactive: false }).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_interactive_prompt() {
        let mut h = handler();
        let mut out = Vec::new();
        run_shell(&mut h, b"clear\n" as &[u8], &mut out, &ShellOptions { interactive: true })
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("> VIBE_CURRICULUM_BROWSER"));
        assert_eq!(text.matches(PROMPT).count(), 2);
        assert!(text.contains("\x1B[2J"));
    }
}
