//! Splits a command line into words.
//!
//! Words are separated by blanks. Single quotes keep their contents verbatim,
//! double quotes do the same but honor `\"` and `\\`, and outside quotes a
//! backslash escapes the next character. Quoted pieces glued to unquoted ones
//! form a single word, so `'my docs'/a.txt` is one argument.

use thiserror::Error;

/// Errors that can occur while splitting a line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexingError {
    /// A closing quote (single or double) was not found.
    #[error("unterminated quote")]
    UnfinishedQuote,
    /// The line ended right after a backslash.
    #[error("dangling escape at end of line")]
    DanglingEscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    fn make_words(&mut self) -> Result<Vec<String>, LexingError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Start => self.handle_start(ch)?,
                LexingState::ReadingWord => self.handle_word(ch, &mut out)?,
                LexingState::ReadingSingleQuote => self.handle_single_quote(ch),
                LexingState::ReadingDoubleQuote => self.handle_double_quote(ch)?,
            }
        }

        match self.state {
            LexingState::ReadingSingleQuote | LexingState::ReadingDoubleQuote => {
                return Err(LexingError::UnfinishedQuote);
            }
            LexingState::ReadingWord => out.push(std::mem::take(&mut self.buffer)),
            LexingState::Start => {}
        }

        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn read_escaped(&mut self) -> Result<char, LexingError> {
        self.read_char().ok_or(LexingError::DanglingEscape)
    }

    fn handle_start(&mut self, ch: char) -> Result<(), LexingError> {
        match ch {
            ' ' | '\t' => return Ok(()),
            '\'' => self.state = LexingState::ReadingSingleQuote,
            '"' => self.state = LexingState::ReadingDoubleQuote,
            '\\' => {
                let escaped = self.read_escaped()?;
                self.buffer.push(escaped);
                self.state = LexingState::ReadingWord;
            }
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
        Ok(())
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) -> Result<(), LexingError> {
        match ch {
            ' ' | '\t' => {
                out.push(std::mem::take(&mut self.buffer));
                self.state = LexingState::Start;
            }
            '\'' => self.state = LexingState::ReadingSingleQuote,
            '"' => self.state = LexingState::ReadingDoubleQuote,
            '\\' => {
                let escaped = self.read_escaped()?;
                self.buffer.push(escaped);
            }
            c => self.buffer.push(c),
        }
        Ok(())
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::ReadingWord,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) -> Result<(), LexingError> {
        match ch {
            '"' => self.state = LexingState::ReadingWord,
            '\\' if matches!(self.input.get(self.pos).copied(), Some('"' | '\\')) => {
                let escaped = self.read_escaped()?;
                self.buffer.push(escaped);
            }
            c => self.buffer.push(c),
        }
        Ok(())
    }
}

/// Split `line` into shell words.
pub fn split_into_words(line: &str) -> Result<Vec<String>, LexingError> {
    LexingFSM::new(line).make_words()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_blanks() {
        assert_eq!(
            split_into_words("  head\tdocs/a.txt   3 ").unwrap(),
            ["head", "docs/a.txt", "3"]
        );
        assert!(split_into_words("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quotes_keep_spaces() {
        assert_eq!(
            split_into_words("cd 'my docs'/sub \"two words\"").unwrap(),
            ["cd", "my docs/sub", "two words"]
        );
    }

    #[test]
    fn test_empty_quotes_make_an_empty_word() {
        assert_eq!(split_into_words("cd ''").unwrap(), ["cd", ""]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(split_into_words(r"rev a\ b.txt").unwrap(), ["rev", "a b.txt"]);
        assert_eq!(
            split_into_words(r#"rev "say \"hi\"" 'back\slash'"#).unwrap(),
            ["rev", "say \"hi\"", r"back\slash"]
        );
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        assert_eq!(split_into_words("cd 'docs"), Err(LexingError::UnfinishedQuote));
        assert_eq!(split_into_words("cd \"docs"), Err(LexingError::UnfinishedQuote));
        assert_eq!(split_into_words("cd docs\\"), Err(LexingError::DanglingEscape));
    }
}
