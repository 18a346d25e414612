//! Textual SIL parser.
//!
//! The grammar is line oriented inside function bodies: every instruction
//! ends at the newline. Labels are written `bb0:` or `bb1(%a : $Int):`
//! with no space before the colon or parenthesis, locations are introduced
//! by `@` followed by whitespace, and symbol operands by `@` directly
//! followed by the symbol.

use super::*;
use hashbrown::{HashMap, HashSet};
use thiserror::Error;

/// Error raised while reading textual SIL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{line}:{column}: unknown opcode '{opcode}'")]
    UnknownOpcode {
        line: usize,
        column: usize,
        opcode: String,
    },

    #[error("undefined label '{label}' in function @{function}")]
    UndefinedLabel { function: String, label: String },

    #[error("duplicate function definition: '@{symbol}'")]
    DuplicateFunction { symbol: String },
}

type ParseResult<T> = Result<T, ParseError>;

/// Parse a textual SIL module.
pub fn parse_module(text: &str) -> ParseResult<SilModule> {
    Parser::new(text).parse()
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    module: SilModule,

    // Global maps
    symbols: HashSet<&'a str>,

    // Per-function maps
    values: HashMap<&'a str, ValueId>,
    labels: HashSet<&'a str>,
    label_resolves: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            module: SilModule::new(),
            symbols: HashSet::new(),
            values: HashMap::new(),
            labels: HashSet::new(),
            label_resolves: Vec::new(),
        }
    }

    fn parse(mut self) -> ParseResult<SilModule> {
        self.skip_whitespace(true);

        while !self.is_eof() {
            let keyword = self.read_identifier()?;
            match keyword {
                "source" => {
                    let file = self.read_string()?;
                    self.module.source_file = Some(file);
                }
                "sil" => self.parse_function()?,
                other => {
                    return Err(self.error(format!(
                        "Expected 'sil' or 'source' but found '{}'",
                        other
                    )))
                }
            }
            self.skip_whitespace(true);
        }

        log::debug!(
            "parsed {} functions, {} values",
            self.module.functions.len(),
            self.module.value_count
        );
        Ok(self.module)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = self.line_col();
        ParseError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn line_col(&self) -> (usize, usize) {
        let consumed = &self.text[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.len(), |nl| consumed.len() - nl - 1)
            + 1;
        (line, column)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self, skip_newlines: bool) {
        while let Some(ch) = self.current_char() {
            if ch == ';' {
                // Comment runs to end of line; the newline itself is left
                // for the caller when newlines are significant.
                while let Some(ch) = self.current_char() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if ch.is_whitespace() {
                if ch == '\n' && !skip_newlines {
                    break;
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_at_line_end(&mut self) -> bool {
        self.skip_whitespace(false);
        matches!(self.current_char(), None | Some('\n'))
    }

    fn try_read(&mut self, ch: char) -> bool {
        self.skip_whitespace(false);
        if self.current_char() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> ParseResult<()> {
        if !self.try_read(ch) {
            return Err(self.error(format!(
                "Expected '{}' but found {:?}",
                ch,
                self.current_char()
            )));
        }
        Ok(())
    }

    fn try_read_str(&mut self, s: &str) -> bool {
        self.skip_whitespace(false);
        if self.text[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if pred(ch) {
                self.advance();
            } else {
                break;
            }
        }
        &self.text[start..self.pos]
    }

    fn read_identifier(&mut self) -> ParseResult<&'a str> {
        self.skip_whitespace(false);

        match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {}
            Some(ch) => return Err(self.error(format!("Expected identifier but found '{}'", ch))),
            None => return Err(self.error("Expected identifier but found EOF")),
        }

        Ok(self.read_while(|ch| ch.is_alphanumeric() || ch == '_'))
    }

    fn read_value_name(&mut self) -> ParseResult<&'a str> {
        self.expect('%')?;
        let name = self.read_while(|ch| ch.is_alphanumeric() || ch == '_');
        if name.is_empty() {
            return Err(self.error("Expected value name after '%'"));
        }
        Ok(name)
    }

    fn read_symbol(&mut self) -> ParseResult<&'a str> {
        self.expect('@')?;
        let symbol = self.read_while(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '$' | '.'));
        if symbol.is_empty() {
            return Err(self.error("Expected symbol after '@'"));
        }
        Ok(symbol)
    }

    fn read_string(&mut self) -> ParseResult<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.current_char() {
                None | Some('\n') => return Err(self.error("Unterminated string literal")),
                Some('"') => {
                    self.advance();
                    return Ok(out);
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some(ch @ ('"' | '\\')) => out.push(ch),
                        other => {
                            return Err(self.error(format!("Invalid escape sequence {:?}", other)))
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    out.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn read_number(&mut self) -> ParseResult<u32> {
        self.skip_whitespace(false);
        let digits = self.read_while(|ch| ch.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error("Expected number"));
        }
        let value: u32 = digits
            .parse()
            .map_err(|e| self.error(format!("Failed to parse number: {}", e)))?;
        // Positions are signed downstream; -1 is the unknown sentinel.
        if value > i32::MAX as u32 {
            return Err(self.error(format!("Line or column out of range: {}", value)));
        }
        Ok(value)
    }

    /// `$` followed by a quoted string or a run of non-space characters with
    /// balanced brackets.
    fn read_type(&mut self) -> ParseResult<String> {
        self.expect('$')?;
        if self.current_char() == Some('"') {
            return self.read_string();
        }

        let start = self.pos;
        let mut depth = 0usize;
        while let Some(ch) = self.current_char() {
            match ch {
                // `->` inside a function type
                '>' if self.text[..self.pos].ends_with('-') => {}
                '(' | '[' | '<' => depth += 1,
                ')' | ']' | '>' if depth > 0 => depth -= 1,
                ')' | ']' | ',' if depth == 0 => break,
                c if c.is_whitespace() && depth == 0 => break,
                '\n' => break,
                _ => {}
            }
            self.advance();
        }

        if depth != 0 {
            return Err(self.error("Unbalanced brackets in type"));
        }
        let ty = &self.text[start..self.pos];
        if ty.is_empty() {
            return Err(self.error("Expected type after '$'"));
        }
        Ok(ty.to_string())
    }

    /// `invalid` | `["file"] L:C[-L:C]`
    fn read_location(&mut self) -> ParseResult<SourceLoc> {
        self.skip_whitespace(false);
        if self.text[self.pos..].starts_with("invalid") {
            self.pos += "invalid".len();
            return Ok(SourceLoc::Invalid);
        }

        let file = if self.current_char() == Some('"') {
            Some(self.read_string()?)
        } else {
            None
        };

        let start_line = self.read_number()?;
        self.expect(':')?;
        let start_col = self.read_number()?;

        let (end_line, end_col) = if self.current_char() == Some('-') {
            self.advance();
            let line = self.read_number()?;
            self.expect(':')?;
            (line, self.read_number()?)
        } else {
            (start_line, start_col)
        };

        Ok(SourceLoc::Range {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
        })
    }

    /// `@ <loc>`; the `@` must be followed by whitespace.
    fn try_read_location(&mut self) -> ParseResult<Option<SourceLoc>> {
        self.skip_whitespace(false);
        if self.current_char() == Some('@')
            && self.peek_char(1).is_some_and(|c| c == ' ' || c == '\t')
        {
            self.advance();
            return self.read_location().map(Some);
        }
        Ok(None)
    }

    fn value_id(&mut self, name: &'a str) -> ValueId {
        if let Some(&id) = self.values.get(name) {
            return id;
        }
        let id = self.module.next_value();
        self.values.insert(name, id);
        id
    }

    fn parse_argument(&mut self) -> ParseResult<Argument> {
        self.skip_whitespace(true);
        let name = self.read_value_name()?;
        self.expect(':')?;
        self.skip_whitespace(false);
        let ty = self.read_type()?;

        self.skip_whitespace(false);
        let decl_name = if self.current_char() == Some('"') {
            Some(self.read_string()?)
        } else {
            None
        };

        Ok(Argument {
            value: self.value_id(name),
            name: decl_name,
            ty,
        })
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Argument>> {
        self.expect('(')?;
        let mut args = Vec::new();

        self.skip_whitespace(true);
        if self.try_read(')') {
            return Ok(args);
        }

        loop {
            args.push(self.parse_argument()?);
            self.skip_whitespace(true);
            if self.try_read(')') {
                break;
            }
            if !self.try_read(',') {
                return Err(self.error("Expected ',' or ')' in argument list"));
            }
        }
        Ok(args)
    }

    /// `$T` | `()` | `($A, $B, ...)`
    fn parse_result_types(&mut self) -> ParseResult<Vec<String>> {
        self.skip_whitespace(false);
        if !self.try_read('(') {
            return Ok(vec![self.read_type()?]);
        }

        let mut results = Vec::new();
        if self.try_read(')') {
            return Ok(results);
        }
        loop {
            self.skip_whitespace(false);
            results.push(self.read_type()?);
            if self.try_read(')') {
                break;
            }
            self.expect(',')?;
        }
        Ok(results)
    }

    fn parse_function(&mut self) -> ParseResult<()> {
        self.skip_whitespace(false);
        let symbol = self.read_symbol()?;

        if !self.symbols.insert(symbol) {
            return Err(ParseError::DuplicateFunction {
                symbol: symbol.to_string(),
            });
        }

        // Reset per-function state
        self.values.clear();
        self.labels.clear();
        self.label_resolves.clear();

        self.skip_whitespace(false);
        let demangled = if self.current_char() == Some('"') {
            Some(self.read_string()?)
        } else {
            None
        };

        let arguments = self.parse_argument_list()?;

        if !self.try_read_str("->") {
            return Err(self.error("Expected '->' after argument list"));
        }
        let results = self.parse_result_types()?;
        let location = self.try_read_location()?.unwrap_or_default();

        self.skip_whitespace(true);
        self.expect('{')?;

        let mut blocks = Vec::new();
        loop {
            self.skip_whitespace(true);
            if self.try_read('}') {
                break;
            }
            if self.is_eof() {
                return Err(self.error(format!("Unterminated body of function @{}", symbol)));
            }
            blocks.push(self.parse_block()?);
        }

        if let Some(label) = self
            .label_resolves
            .iter()
            .find(|label| !self.labels.contains(*label))
        {
            return Err(ParseError::UndefinedLabel {
                function: symbol.to_string(),
                label: label.to_string(),
            });
        }

        log::trace!("parsed @{} with {} blocks", symbol, blocks.len());
        self.module.functions.push(SilFunction {
            symbol: symbol.to_string(),
            demangled,
            arguments,
            results,
            location,
            blocks,
        });
        Ok(())
    }

    fn parse_block(&mut self) -> ParseResult<SilBlock> {
        let label = self.read_identifier()?;
        if !self.labels.insert(label) {
            return Err(self.error(format!("Duplicate block label '{}'", label)));
        }

        let arguments = if self.current_char() == Some('(') {
            self.parse_argument_list()?
        } else {
            Vec::new()
        };
        self.expect(':')?;

        let mut instructions = Vec::new();
        while !self.is_at_block_end() {
            instructions.push(self.parse_instruction()?);
        }

        Ok(SilBlock {
            label: label.to_string(),
            arguments,
            instructions,
        })
    }

    fn is_at_block_end(&mut self) -> bool {
        self.skip_whitespace(true);

        match self.current_char() {
            None | Some('}') => return true,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {}
            _ => return false,
        }

        // A label is an identifier directly followed by ':' or '('.
        let saved_pos = self.pos;
        let _ = self.read_while(|ch| ch.is_alphanumeric() || ch == '_');
        let is_label = matches!(self.current_char(), Some(':') | Some('('));
        self.pos = saved_pos;
        is_label
    }

    fn parse_instruction(&mut self) -> ParseResult<Instruction> {
        self.skip_whitespace(true);

        let mut results = Vec::new();
        match self.current_char() {
            Some('%') => {
                let name = self.read_value_name()?;
                results.push(self.value_id(name));
                self.expect('=')?;
            }
            Some('(') => {
                self.advance();
                loop {
                    let name = self.read_value_name()?;
                    results.push(self.value_id(name));
                    if self.try_read(')') {
                        break;
                    }
                    self.expect(',')?;
                }
                self.expect('=')?;
            }
            _ => {}
        }

        self.skip_whitespace(false);
        let (line, column) = self.line_col();
        let opcode = self.read_identifier()?;
        let kind = InstKind::from_name(opcode).ok_or_else(|| ParseError::UnknownOpcode {
            line,
            column,
            opcode: opcode.to_string(),
        })?;

        let mut inst = Instruction::new(kind);
        inst.results = results;

        if !self.is_at_operands_end() {
            loop {
                self.parse_operand(&mut inst)?;
                if !self.try_read(',') {
                    break;
                }
            }
        }

        if self.try_read(':') {
            self.skip_whitespace(false);
            inst.result_type = Some(self.read_type()?);
        }

        if let Some(location) = self.try_read_location()? {
            inst.location = location;
        }

        if self.try_read('[') {
            self.parse_effects(&mut inst)?;
        }

        if !self.is_at_line_end() {
            return Err(self.error(format!(
                "Unexpected {:?} after {} instruction",
                self.current_char(),
                kind
            )));
        }
        Ok(inst)
    }

    fn is_at_operands_end(&mut self) -> bool {
        if self.is_at_line_end() {
            return true;
        }
        match self.current_char() {
            Some(':') | Some('[') => true,
            Some('@') => self.peek_char(1).is_some_and(|c| c == ' ' || c == '\t'),
            _ => false,
        }
    }

    fn parse_operand(&mut self, inst: &mut Instruction) -> ParseResult<()> {
        self.skip_whitespace(false);
        match self.current_char() {
            Some('%') => {
                let name = self.read_value_name()?;
                let id = self.value_id(name);
                inst.operands.push(id);
            }
            Some('@') => {
                let symbol = self.read_symbol()?;
                inst.attributes.push(format!("@{}", symbol));
            }
            Some('"') => {
                let literal = self.read_string()?;
                inst.attributes.push(format!("{:?}", literal));
            }
            Some(ch) if ch.is_ascii_digit() || ch == '-' => {
                let literal = self.read_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+'));
                inst.attributes.push(literal.to_string());
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let label = self.read_identifier()?;
                self.label_resolves.push(label);
                inst.successors.push(label.to_string());
            }
            other => {
                return Err(self.error(format!("Expected operand but found {:?}", other)));
            }
        }
        Ok(())
    }

    /// `mem: <m>, rel: <r>` after the opening bracket, either key optional.
    fn parse_effects(&mut self, inst: &mut Instruction) -> ParseResult<()> {
        loop {
            let key = self.read_identifier()?;
            self.expect(':')?;
            let value = self.read_identifier()?;
            match key {
                "mem" => {
                    inst.memory = MemoryBehavior::from_name(value).ok_or_else(|| {
                        self.error(format!("Unknown memory behavior '{}'", value))
                    })?;
                }
                "rel" => {
                    inst.releasing = ReleasingBehavior::from_name(value).ok_or_else(|| {
                        self.error(format!("Unknown releasing behavior '{}'", value))
                    })?;
                }
                _ => return Err(self.error(format!("Unknown effect key '{}'", key))),
            }
            if self.try_read(']') {
                return Ok(());
            }
            self.expect(',')?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_function() {
        let text = r#"
; scenario
source "main.swift"
sil @main "main" (%argc : $Int32 "argc", %argv : $UnsafeMutablePointer<Optional<UnsafeMutablePointer<Int8>>>) -> $Int32 @ 1:1-4:2 {
bb0:
  %x = alloc_stack : $Int @ 2:3
  store %argc, %x [mem: may_write, rel: does_not_release]
  dealloc_stack %x
  return %argc
}
"#;
        let module = parse_module(text).unwrap();
        assert_eq!(module.source_file.as_deref(), Some("main.swift"));
        assert_eq!(module.functions.len(), 1);

        let func = &module.functions[0];
        assert_eq!(func.symbol, "main");
        assert_eq!(func.display_name(), "main");
        assert_eq!(func.arguments.len(), 2);
        assert_eq!(func.arguments[0].name.as_deref(), Some("argc"));
        assert_eq!(func.arguments[1].name, None);
        assert_eq!(
            func.arguments[1].ty,
            "UnsafeMutablePointer<Optional<UnsafeMutablePointer<Int8>>>"
        );
        assert_eq!(func.results, vec!["Int32".to_string()]);
        assert!(func.location.is_valid());

        let insts = &func.blocks[0].instructions;
        assert_eq!(insts.len(), 4);
        assert_eq!(insts[0].kind, InstKind::AllocStack);
        assert_eq!(insts[0].result_type.as_deref(), Some("Int"));
        assert_eq!(
            insts[0].location,
            SourceLoc::Range {
                file: None,
                start_line: 2,
                start_col: 3,
                end_line: 2,
                end_col: 3
            }
        );
        assert_eq!(insts[1].kind, InstKind::Store);
        assert_eq!(insts[1].operands, vec![func.arguments[0].value, insts[0].results[0]]);
        assert_eq!(insts[1].memory, MemoryBehavior::MayWrite);
        assert_eq!(insts[2].operands, vec![insts[0].results[0]]);
    }

    #[test]
    fn test_value_ids_are_module_unique() {
        let text = r#"
sil @f () -> () {
bb0:
  %0 = alloc_stack : $Int
  return %0
}
sil @g () -> () {
bb0:
  %0 = alloc_stack : $Int
  return %0
}
"#;
        let module = parse_module(text).unwrap();
        let f0 = module.functions[0].blocks[0].instructions[0].results[0];
        let g0 = module.functions[1].blocks[0].instructions[0].results[0];
        assert_ne!(f0, g0);
        assert_eq!(module.value_count, 2);
    }

    #[test]
    fn test_branches_and_block_arguments() {
        let text = r#"
sil @loop () -> ($Int, $Bool) {
bb0:
  %c = integer_literal 1 : $Builtin.Int1
  cond_br %c, bb1, bb2
bb1(%a : $Int):
  br bb2
bb2:
  (%r0, %r1) = destructure_tuple %c : $(Int, Bool)
  unreachable
}
"#;
        let module = parse_module(text).unwrap();
        let func = &module.functions[0];
        assert_eq!(func.results.len(), 2);
        assert_eq!(func.blocks.len(), 3);
        assert_eq!(func.blocks[0].instructions[0].attributes, vec!["1".to_string()]);
        assert_eq!(
            func.blocks[0].instructions[1].successors,
            vec!["bb1".to_string(), "bb2".to_string()]
        );
        assert_eq!(func.blocks[1].arguments.len(), 1);
        assert_eq!(func.blocks[2].instructions[0].results.len(), 2);
        assert_eq!(
            func.blocks[2].instructions[0].result_type.as_deref(),
            Some("(Int, Bool)")
        );
    }

    #[test]
    fn test_locations() {
        let text = r#"
sil @f () -> () @ invalid {
bb0:
  %0 = alloc_stack : $Int @ "lib.swift" 3:4-3:9
  %1 = function_ref @$s3lib3fooyyF : $"@convention(thin) () -> ()"
  unreachable
}
"#;
        let module = parse_module(text).unwrap();
        let func = &module.functions[0];
        assert_eq!(func.location, SourceLoc::Invalid);
        let inst = &func.blocks[0].instructions[0];
        assert_eq!(inst.location.file(), Some("lib.swift"));
        let fref = &func.blocks[0].instructions[1];
        assert_eq!(fref.attributes, vec!["@$s3lib3fooyyF".to_string()]);
        assert_eq!(fref.result_type.as_deref(), Some("@convention(thin) () -> ()"));
    }

    #[test]
    fn test_parse_errors() {
        let unknown = "sil @f () -> () {\nbb0:\n  frobnicate %0\n}\n";
        assert!(matches!(
            parse_module(unknown),
            Err(ParseError::UnknownOpcode { line: 3, .. })
        ));

        let undefined = "sil @f () -> () {\nbb0:\n  br bb7\n}\n";
        assert_eq!(
            parse_module(undefined),
            Err(ParseError::UndefinedLabel {
                function: "f".to_string(),
                label: "bb7".to_string()
            })
        );

        let duplicate = "sil @f () -> () {\nbb0:\n  unreachable\n}\nsil @f () -> () {\nbb0:\n  unreachable\n}\n";
        assert!(matches!(
            parse_module(duplicate),
            Err(ParseError::DuplicateFunction { .. })
        ));

        let bad_effect = "sil @f () -> () {\nbb0:\n  unreachable [mem: sometimes]\n}\n";
        assert!(matches!(parse_module(bad_effect), Err(ParseError::Syntax { .. })));

        let huge_line = "sil @f () -> () {\nbb0:\n  unreachable @ 4294967295:1\n}\n";
        assert!(matches!(
            parse_module(huge_line),
            Err(ParseError::Syntax { line: 3, .. })
        ));
        let past_i32 = "sil @f () -> () @ 1:2147483648 {\nbb0:\n  unreachable\n}\n";
        assert!(matches!(parse_module(past_i32), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_empty_function_body() {
        let module = parse_module("sil @decl () -> () {\n}\n").unwrap();
        assert!(module.functions[0].is_empty());
        assert!(module.functions[0].blocks.is_empty());
    }
}
