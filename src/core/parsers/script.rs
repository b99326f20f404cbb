use std::sync::Arc;

use swc_common::{BytePos, FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::Program;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

use crate::core::LocalizeError;

/// A parsed script together with the position its source text starts at.
///
/// Node spans are absolute positions in the source map the script was parsed
/// with; subtract `start_pos` to get byte offsets into the script text.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    pub program: Program,
    pub start_pos: BytePos,
}

impl ParsedScript {
    /// Byte offset into the script text for an absolute position.
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }
}

/// Parse JavaScript source into a [`ParsedScript`].
///
/// Every call uses its own `SourceMap` and swc globals, so scripts can be
/// parsed from several threads at once.
pub fn parse_script(code: &str, identifier: &str) -> Result<ParsedScript, LocalizeError> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Default::default();
        let source_file =
            source_map.new_source_file(FileName::Real(identifier.into()).into(), code.to_string());

        let mut parser = Parser::new(
            Syntax::Es(EsSyntax::default()),
            StringInput::from(&*source_file),
            None,
        );

        let program = parser.parse_program().map_err(|e| LocalizeError::Parse {
            identifier: identifier.to_string(),
            message: format!("{:?}", e.kind()),
        })?;

        Ok(ParsedScript {
            program,
            start_pos: source_file.start_pos,
        })
    })
}
