use crate::token::{ReservedWord, Token, TokenCategory};
use lumina_ir::source_location::{Location, SourceId};
use std::iter::Peekable;
use std::str::Chars;

/// Lexer state for tracking position during tokenization (§4.1).
///
/// Scan, merge and classify are fused into one character-dispatch loop with
/// one-character lookahead for the compound punctuation in §4.1 step 2,
/// rather than three separate walks over the token stream; this is
/// behaviorally equivalent to the three-pass description (see the
/// implementation note in the component design).
struct LexerState<'a> {
    source: SourceId,
    chars: Peekable<Chars<'a>>,
    position: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
}

impl<'a> LexerState<'a> {
    fn new(source: SourceId, text: &'a str) -> Self {
        LexerState {
            source,
            chars: text.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn location_at(&self, start_line: u32, start_column: u32, start_pos: usize, length: usize) -> Location {
        Location::new(self.source, start_pos, start_line, start_column, length)
    }

    fn push(&mut self, category: TokenCategory, text: String, start_line: u32, start_column: u32, start_pos: usize) {
        let length = self.position - start_pos;
        let location = self.location_at(start_line, start_column, start_pos, length.max(1));
        self.tokens.push(Token::new(category, text, location));
    }

    fn last_category(&self) -> Option<TokenCategory> {
        self.tokens.last().map(|t| t.category)
    }
}

/// Expands tabs to four spaces before scanning, so column counts line up
/// with visible output (§4.1 step 1).
fn expand_tabs(source: &str) -> String {
    source.replace('\t', "    ")
}

/// Tokenizes the given source text, already associated with `source` in the
/// caller's `SourceMap`. Never aborts: unrecognized characters become
/// `Unknown` tokens (§4.1 Failure semantics).
pub fn tokenize(source: SourceId, text: &str) -> Vec<Token> {
    let expanded = expand_tabs(text);
    let mut state = LexerState::new(source, &expanded);

    while let Some(c) = state.peek() {
        let (start_line, start_column, start_pos) = (state.line, state.column, state.position);

        match c {
            c if c.is_whitespace() => {
                state.advance();
            }
            c if c.is_alphabetic() || c == '_' => handle_word(&mut state, start_line, start_column, start_pos),
            c if c.is_ascii_digit() => handle_number(&mut state, start_line, start_column, start_pos),
            '"' => handle_quoted(&mut state, start_line, start_column, start_pos, '"', '"'),
            '<' if state.last_category() == Some(TokenCategory::Include) => {
                handle_quoted(&mut state, start_line, start_column, start_pos, '<', '>')
            }
            '#' => handle_hash(&mut state, start_line, start_column, start_pos),
            '/' => handle_slash(&mut state, start_line, start_column, start_pos),
            ':' => handle_colon(&mut state, start_line, start_column, start_pos),
            '-' => handle_dash(&mut state, start_line, start_column, start_pos),
            '=' => handle_compoundable(
                &mut state, start_line, start_column, start_pos, '=', "=", "==",
                TokenCategory::Assignator, TokenCategory::ComparatorOperator,
            ),
            '+' => handle_compoundable(
                &mut state, start_line, start_column, start_pos, '=', "+", "+=",
                TokenCategory::Operator, TokenCategory::Assignator,
            ),
            '*' => handle_compoundable(
                &mut state, start_line, start_column, start_pos, '=', "*", "*=",
                TokenCategory::Operator, TokenCategory::Assignator,
            ),
            '<' => handle_compoundable(
                &mut state, start_line, start_column, start_pos, '=', "<", "<=",
                TokenCategory::ComparatorOperator, TokenCategory::ComparatorOperator,
            ),
            '>' => handle_compoundable(
                &mut state, start_line, start_column, start_pos, '=', ">", ">=",
                TokenCategory::ComparatorOperator, TokenCategory::ComparatorOperator,
            ),
            '!' => handle_compoundable(
                &mut state, start_line, start_column, start_pos, '=', "!", "!=",
                TokenCategory::Unknown, TokenCategory::ComparatorOperator,
            ),
            '&' => handle_doubled(&mut state, start_line, start_column, start_pos, '&', "&&", TokenCategory::ConditionOperator),
            '|' => handle_doubled(&mut state, start_line, start_column, start_pos, '|', "||", TokenCategory::ConditionOperator),
            '{' => handle_single(&mut state, start_line, start_column, start_pos, '{', TokenCategory::OpenCurlyBracket),
            '}' => handle_single(&mut state, start_line, start_column, start_pos, '}', TokenCategory::CloseCurlyBracket),
            '(' => handle_single(&mut state, start_line, start_column, start_pos, '(', TokenCategory::OpenParenthesis),
            ')' => handle_single(&mut state, start_line, start_column, start_pos, ')', TokenCategory::CloseParenthesis),
            '[' => handle_single(&mut state, start_line, start_column, start_pos, '[', TokenCategory::OpenBracket),
            ']' => handle_single(&mut state, start_line, start_column, start_pos, ']', TokenCategory::CloseBracket),
            '.' => handle_single(&mut state, start_line, start_column, start_pos, '.', TokenCategory::Accessor),
            ';' => handle_single(&mut state, start_line, start_column, start_pos, ';', TokenCategory::EndOfSentence),
            ',' => handle_single(&mut state, start_line, start_column, start_pos, ',', TokenCategory::Comma),
            other => {
                state.advance();
                state.push(TokenCategory::Unknown, other.to_string(), start_line, start_column, start_pos);
            }
        }
    }

    state.tokens
}

fn handle_single(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize, c: char, category: TokenCategory) {
    state.advance();
    state.push(category, c.to_string(), start_line, start_column, start_pos);
}

/// Handles a character that may be doubled into a two-character compound
/// (`&&`, `||`); an un-doubled `&` or `|` has no standalone meaning in the
/// source language and becomes `Unknown`.
fn handle_doubled(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize, c: char, doubled: &str, category: TokenCategory) {
    state.advance();
    if state.peek() == Some(c) {
        state.advance();
        state.push(category, doubled.to_string(), start_line, start_column, start_pos);
    } else {
        state.push(TokenCategory::Unknown, c.to_string(), start_line, start_column, start_pos);
    }
}

/// Handles a character that is a complete token on its own but may merge
/// with a following `=` into a compound (e.g. `=`/`==`, `+`/`+=`).
#[allow(clippy::too_many_arguments)]
fn handle_compoundable(
    state: &mut LexerState,
    start_line: u32,
    start_column: u32,
    start_pos: usize,
    merge_with: char,
    alone_text: &str,
    merged_text: &str,
    alone_category: TokenCategory,
    merged_category: TokenCategory,
) {
    state.advance();
    if state.peek() == Some(merge_with) {
        state.advance();
        state.push(merged_category, merged_text.to_string(), start_line, start_column, start_pos);
    } else {
        state.push(alone_category, alone_text.to_string(), start_line, start_column, start_pos);
    }
}

fn handle_dash(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    state.advance();
    if state.peek() == Some('>') {
        state.advance();
        state.push(TokenCategory::PipelineFlowSeparator, "->".to_string(), start_line, start_column, start_pos);
    } else if state.peek() == Some('=') {
        state.advance();
        state.push(TokenCategory::Assignator, "-=".to_string(), start_line, start_column, start_pos);
    } else {
        state.push(TokenCategory::Operator, "-".to_string(), start_line, start_column, start_pos);
    }
}

fn handle_colon(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    state.advance();
    if state.peek() == Some(':') {
        state.advance();
        state.push(TokenCategory::NamespaceSeparator, "::".to_string(), start_line, start_column, start_pos);
    } else {
        state.push(TokenCategory::Separator, ":".to_string(), start_line, start_column, start_pos);
    }
}

fn handle_slash(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    state.advance();
    match state.peek() {
        Some('/') => handle_line_comment(state, start_line, start_column, start_pos),
        Some('*') => handle_block_comment(state, start_line, start_column, start_pos),
        Some('=') => {
            state.advance();
            state.push(TokenCategory::Assignator, "/=".to_string(), start_line, start_column, start_pos);
        }
        _ => state.push(TokenCategory::Operator, "/".to_string(), start_line, start_column, start_pos),
    }
}

/// `// ...` to end of line, collapsed into a single `Comment` token (§4.2
/// dispatches on a whole comment, not on the `//` marker by itself).
fn handle_line_comment(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    let mut text = String::from("//");
    state.advance(); // second '/'
    while let Some(c) = state.peek() {
        if c == '\n' {
            break;
        }
        text.push(c);
        state.advance();
    }
    state.push(TokenCategory::Comment, text, start_line, start_column, start_pos);
}

/// `/* ... */`, possibly spanning lines, collapsed into a single `Comment`
/// token. Unterminated block comments run to end of file without aborting.
fn handle_block_comment(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    let mut text = String::from("/*");
    state.advance(); // the '*'
    loop {
        match state.peek() {
            None => break,
            Some('*') => {
                text.push('*');
                state.advance();
                if state.peek() == Some('/') {
                    text.push('/');
                    state.advance();
                    break;
                }
            }
            Some(c) => {
                text.push(c);
                state.advance();
            }
        }
    }
    state.push(TokenCategory::Comment, text, start_line, start_column, start_pos);
}

fn handle_hash(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    const DIRECTIVE: &str = "include";
    state.advance(); // '#'
    let mut matched = String::new();
    for expected in DIRECTIVE.chars() {
        if state.peek() == Some(expected) {
            matched.push(expected);
            state.advance();
        } else {
            break;
        }
    }
    if matched == DIRECTIVE {
        state.push(TokenCategory::Include, "#include".to_string(), start_line, start_column, start_pos);
    } else {
        // Not a recognized directive: the '#' (and whatever partial word
        // followed) never forms a valid token on its own.
        let text = format!("#{matched}");
        state.push(TokenCategory::Unknown, text, start_line, start_column, start_pos);
    }
}

/// A delimited run (`"..."` string literal, `"path"`/`<name>` include
/// target). Classified as `IncludeLiteral` when it directly follows an
/// `#include` token, `StringLiteral` otherwise.
fn handle_quoted(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize, open: char, close: char) {
    let is_include_target = state.last_category() == Some(TokenCategory::Include);
    let mut text = String::new();
    text.push(open);
    state.advance();
    while let Some(c) = state.peek() {
        if c == close {
            text.push(c);
            state.advance();
            break;
        }
        text.push(c);
        state.advance();
    }
    let category = if is_include_target {
        TokenCategory::IncludeLiteral
    } else {
        TokenCategory::StringLiteral
    };
    state.push(category, text, start_line, start_column, start_pos);
}

/// Identifiers, reserved words, and the `true`/`false` literals (typed as
/// `Number`/`bool` per the lexical-shape typing rule resolved in SPEC_FULL
/// §9, not as ordinary identifiers).
fn handle_word(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    let mut text = String::new();
    while let Some(c) = state.peek() {
        if c.is_alphanumeric() || c == '_' {
            text.push(c);
            state.advance();
        } else {
            break;
        }
    }

    let category = if let Some(reserved) = ReservedWord::from_str(&text) {
        reserved.category()
    } else if text == "true" || text == "false" {
        TokenCategory::Number
    } else {
        TokenCategory::Identifier
    };

    state.push(category, text, start_line, start_column, start_pos);
}

/// Numeric literals: digit-led, with at most one decimal point once the
/// token already contains digits (§4.1 step 1). No exponent notation — not
/// named anywhere in the source language's grammar.
fn handle_number(state: &mut LexerState, start_line: u32, start_column: u32, start_pos: usize) {
    let mut text = String::new();
    let mut seen_dot = false;
    while let Some(c) = state.peek() {
        if c.is_ascii_digit() {
            text.push(c);
            state.advance();
        } else if c == '.' && !seen_dot && !text.is_empty() {
            seen_dot = true;
            text.push(c);
            state.advance();
        } else {
            break;
        }
    }
    state.push(TokenCategory::Number, text, start_line, start_column, start_pos);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(text: &str) -> Vec<TokenCategory> {
        tokenize(SourceId(0), text).into_iter().map(|t| t.category).collect()
    }

    #[test]
    fn scans_a_pipeline_flow_declaration() {
        let cats = categories("Input -> VertexPass : Vector3 position;");
        assert_eq!(
            cats,
            vec![
                TokenCategory::PipelineFlow,
                TokenCategory::PipelineFlowSeparator,
                TokenCategory::PipelineFlow,
                TokenCategory::Separator,
                TokenCategory::Identifier,
                TokenCategory::Identifier,
                TokenCategory::EndOfSentence,
            ]
        );
    }

    #[test]
    fn merges_compound_punctuation() {
        let cats = categories("a::b <= c && d != e");
        assert_eq!(
            cats,
            vec![
                TokenCategory::Identifier,
                TokenCategory::NamespaceSeparator,
                TokenCategory::Identifier,
                TokenCategory::ComparatorOperator,
                TokenCategory::Identifier,
                TokenCategory::ConditionOperator,
                TokenCategory::Identifier,
                TokenCategory::ComparatorOperator,
                TokenCategory::Identifier,
            ]
        );
    }

    #[test]
    fn classifies_true_false_as_number() {
        let cats = categories("bool b = true;");
        assert_eq!(cats[3], TokenCategory::Number);
    }

    #[test]
    fn collapses_comments_to_one_token() {
        let tokens = tokenize(SourceId(0), "// hello\nint x;");
        assert_eq!(tokens[0].category, TokenCategory::Comment);
        assert_eq!(tokens[0].text, "// hello");
    }

    #[test]
    fn unknown_character_does_not_abort() {
        let cats = categories("int x @ int y;");
        assert!(cats.contains(&TokenCategory::Unknown));
    }

    #[test]
    fn include_literal_quoted_path() {
        let cats = categories("#include \"a/b.shader\"");
        assert_eq!(cats, vec![TokenCategory::Include, TokenCategory::IncludeLiteral]);
    }

    #[test]
    fn include_literal_angle_bracket() {
        let cats = categories("#include <common>");
        assert_eq!(cats, vec![TokenCategory::Include, TokenCategory::IncludeLiteral]);
    }

    #[test]
    fn tabs_expand_to_four_columns() {
        let tokens = tokenize(SourceId(0), "\tfloat");
        assert_eq!(tokens[0].location.column, 5);
    }
}
