//! This module provides the `ProgramLoader` struct, responsible for feeding program source
//! lines to the parser from files, readers, and strings.

use crate::parser::parse_lines;
use crate::types::{Grammar, Program, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Loads programs using a fixed move-token grammar.
#[derive(Debug, Clone, Default)]
pub struct ProgramLoader {
    grammar: Grammar,
}

impl ProgramLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grammar(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Loads a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read and builds successfully.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be opened or read, or is
    ///   larger than `MAX_PROGRAM_SIZE`.
    /// * `Err(TuringMachineError::Build)` if the program text is invalid.
    pub fn load_program(&self, path: &Path) -> Result<Program, TuringMachineError> {
        let file = fs::File::open(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        self.load_program_from_reader(BufReader::new(file))
            .map_err(|e| match e {
                TuringMachineError::FileError(msg) => {
                    TuringMachineError::FileError(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })
    }

    /// Loads a program line by line from any buffered reader, such as stdin.
    pub fn load_program_from_reader<R: BufRead>(
        &self,
        reader: R,
    ) -> Result<Program, TuringMachineError> {
        // Read one byte past the limit so oversized sources are detected.
        let mut limited = reader.take(MAX_PROGRAM_SIZE as u64 + 1);
        let mut lines = Vec::new();
        let mut size = 0;

        loop {
            let mut line = String::new();
            let read = limited
                .read_line(&mut line)
                .map_err(|e| TuringMachineError::FileError(format!("Failed to read line: {e}")))?;
            if read == 0 {
                break;
            }

            size += read;
            if size > MAX_PROGRAM_SIZE {
                return Err(TuringMachineError::FileError(format!(
                    "Program exceeds the maximum size of {MAX_PROGRAM_SIZE} bytes"
                )));
            }

            lines.push(line);
        }

        Ok(parse_lines(lines, &self.grammar)?)
    }

    /// Loads a single program from string content.
    pub fn load_program_from_string(&self, content: &str) -> Result<Program, TuringMachineError> {
        Ok(parse_lines(content.lines(), &self.grammar)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuildError;
    use std::fs::File;
    use std::io::{Cursor, Write};
    use tempfile::tempdir;

    const VALID: &str = "q0 [start]\n0 -> 1 L q0\n_ -> _ N stop\nstop [halt]\n";

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let program = ProgramLoader::new().load_program(&file_path).unwrap();

        assert_eq!(program.start(), "q0");
        assert_eq!(program.halt(), "stop");
    }

    #[test]
    fn test_load_invalid_program_reports_line() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"q0\n\nthis is not valid\n").unwrap();

        let error = ProgramLoader::new().load_program(&file_path).unwrap_err();

        assert!(matches!(
            error,
            TuringMachineError::Build(BuildError::Syntax { line: 3, .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let error = ProgramLoader::new()
            .load_program(&dir.path().join("missing.tm"))
            .unwrap_err();

        assert!(matches!(error, TuringMachineError::FileError(_)));
    }

    #[test]
    fn test_load_from_reader_handles_crlf() {
        let reader = Cursor::new("q0\r\n0 -> 1 N halt\r\n");
        let program = ProgramLoader::new()
            .load_program_from_reader(reader)
            .unwrap();

        assert_eq!(program.state_count(), 2);
    }

    #[test]
    fn test_load_rejects_oversized_source() {
        let mut source = String::from("q0\n");
        while source.len() <= MAX_PROGRAM_SIZE {
            source.push_str("// padding padding padding padding padding\n");
        }

        let error = ProgramLoader::new()
            .load_program_from_reader(Cursor::new(source))
            .unwrap_err();

        assert!(matches!(error, TuringMachineError::FileError(_)));
    }

    #[test]
    fn test_loader_uses_configured_grammar() {
        let loader = ProgramLoader::with_grammar(Grammar::default().with_stay_tokens(["="]));

        assert!(loader.load_program_from_string("q0\n0 -> 0 = halt\n").is_ok());
        assert!(loader.load_program_from_string("q0\n0 -> 0 N halt\n").is_err());
    }
}
