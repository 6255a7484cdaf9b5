//! fcsh line tokenizer.
//!
//! The input line is split on whitespace and tokens are classified by their
//! first character only. There is no quoting, escaping, expansion or
//! globbing, and at most one pipe segment; these limits are part of the
//! design, not accidents.

/// Represents all information associated with one user input line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandLine {
    /// Primary argument vector; `argv[0]` is the executable name.
    pub argv: Vec<String>,
    /// Second pipeline stage, collected after a `|` token.
    pub pipe_argv: Vec<String>,
    /// The name of the input file, if one is specified.
    pub infile: Option<String>,
    /// The file to write stdout to, if one is specified.
    pub outfile: Option<String>,
    /// Run the command without waiting for it.
    pub background: bool,
}

impl CommandLine {
    /// Tokenizes `input`. Returns `None` when no command was entered.
    ///
    /// A token starting with `<` or `>` causes the *following* token to be
    /// consumed as the redirection path; the metacharacter token itself is
    /// discarded, including any characters after the metacharacter. A token
    /// starting with `|` switches collection to the second pipeline stage.
    /// When `recognize_background` is set, a token starting with `&` marks
    /// the line as background and stops tokenizing; otherwise `&` is an
    /// ordinary argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use fcsh::core::parser::CommandLine;
    ///
    /// let command_line = CommandLine::parse("ls -la", true).unwrap();
    /// assert_eq!(command_line.argv, vec!["ls", "-la"]);
    /// assert!(command_line.pipe_argv.is_empty());
    /// assert!(!command_line.background);
    /// ```
    pub fn parse(input: &str, recognize_background: bool) -> Option<CommandLine> {
        let mut command_line = CommandLine::default();
        let mut collecting_pipe = false;

        let mut tokens = input.split_whitespace();
        while let Some(token) = tokens.next() {
            match token.chars().next() {
                Some('<') => command_line.infile = tokens.next().map(String::from),
                Some('>') => command_line.outfile = tokens.next().map(String::from),
                Some('|') => collecting_pipe = true,
                Some('&') if recognize_background => {
                    command_line.background = true;
                    break;
                }
                _ => {
                    let destination = if collecting_pipe {
                        &mut command_line.pipe_argv
                    } else {
                        &mut command_line.argv
                    };
                    destination.push(token.to_string());
                }
            }
        }

        if command_line.argv.is_empty() {
            None
        } else {
            Some(command_line)
        }
    }

    /// Is this the reserved command that terminates the interpreter?
    pub fn is_exit(&self) -> bool {
        self.argv.first().map(|arg| arg == "exit").unwrap_or(false)
    }

    pub fn has_pipe(&self) -> bool {
        !self.pipe_argv.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert!(CommandLine::parse("", true).is_none());
        assert!(CommandLine::parse("   \t ", true).is_none());
    }

    #[test]
    fn single_cmd() {
        let command_line = CommandLine::parse("cmd", true).unwrap();
        assert_eq!(command_line.argv, vec!["cmd"]);
        assert!(command_line.pipe_argv.is_empty());
        assert!(command_line.infile.is_none());
        assert!(command_line.outfile.is_none());
        assert!(!command_line.background);
    }

    #[test]
    fn single_cmd_with_args() {
        let command_line = CommandLine::parse("ls -la", true).unwrap();
        assert_eq!(command_line.argv, vec!["ls", "-la"]);
        assert!(command_line.pipe_argv.is_empty());
    }

    #[test]
    fn infile_and_outfile() {
        let command_line = CommandLine::parse("sort < in.txt > out.txt", true).unwrap();
        assert_eq!(command_line.argv, vec!["sort"]);
        assert_eq!(command_line.infile, Some("in.txt".to_string()));
        assert_eq!(command_line.outfile, Some("out.txt".to_string()));
        assert!(command_line.pipe_argv.is_empty());
    }

    #[test]
    fn pipeline() {
        let command_line = CommandLine::parse("ls | wc -l", true).unwrap();
        assert_eq!(command_line.argv, vec!["ls"]);
        assert_eq!(command_line.pipe_argv, vec!["wc", "-l"]);
        assert!(command_line.has_pipe());
    }

    #[test]
    fn background() {
        let command_line = CommandLine::parse("sleep 5 &", true).unwrap();
        assert!(command_line.background);
        assert_eq!(command_line.argv, vec!["sleep", "5"]);
    }

    #[test]
    fn tokens_after_ampersand_are_dropped() {
        let command_line = CommandLine::parse("sleep 5 & > out.txt extra", true).unwrap();
        assert!(command_line.background);
        assert_eq!(command_line.argv, vec!["sleep", "5"]);
        assert!(command_line.outfile.is_none());
    }

    #[test]
    fn ampersand_is_an_argument_when_not_recognized() {
        let command_line = CommandLine::parse("sleep 5 &", false).unwrap();
        assert!(!command_line.background);
        assert_eq!(command_line.argv, vec!["sleep", "5", "&"]);
    }

    // A token is classified by its first character alone, so "<tmp" is the
    // metacharacter and the *next* token becomes the path. Pinned on purpose.
    #[test]
    fn metacharacter_detection_uses_first_character_only() {
        let command_line = CommandLine::parse("cat <tmp next rest", true).unwrap();
        assert_eq!(command_line.argv, vec!["cat", "rest"]);
        assert_eq!(command_line.infile, Some("next".to_string()));
    }

    #[test]
    fn dangling_redirection_leaves_path_unset() {
        let command_line = CommandLine::parse("cat <", true).unwrap();
        assert_eq!(command_line.argv, vec!["cat"]);
        assert!(command_line.infile.is_none());
    }

    #[test]
    fn trailing_pipe_with_no_second_stage() {
        let command_line = CommandLine::parse("ls |", true).unwrap();
        assert_eq!(command_line.argv, vec!["ls"]);
        assert!(!command_line.has_pipe());
    }

    #[test]
    fn redirection_tokens_still_consume_after_pipe() {
        let command_line = CommandLine::parse("ls | wc < in.txt", true).unwrap();
        assert_eq!(command_line.argv, vec!["ls"]);
        assert_eq!(command_line.pipe_argv, vec!["wc"]);
        assert_eq!(command_line.infile, Some("in.txt".to_string()));
    }

    #[test]
    fn exit_detection() {
        assert!(CommandLine::parse("exit", true).unwrap().is_exit());
        assert!(CommandLine::parse("exit now", true).unwrap().is_exit());
        assert!(!CommandLine::parse("ls", true).unwrap().is_exit());
    }
}
