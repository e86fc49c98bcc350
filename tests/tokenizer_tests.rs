use dtokit::{TokenInput, TokenType};

fn expect(input: &mut TokenInput, ty: TokenType, line: u32, column: u32) {
    let token = input.next();
    assert_eq!(token.ty, ty);
    assert_eq!(token.line, line);
    assert_eq!(token.column, column);
}

fn expect_text(input: &mut TokenInput, ty: TokenType, line: u32, column: u32, text: &str) {
    let token = input.next();
    assert_eq!(token.ty, ty);
    assert_eq!(token.line, line);
    assert_eq!(token.column, column);
    assert_eq!(token.text, text.as_bytes());
}

#[test]
fn empty_string() {
    let mut input = TokenInput::new(b"");
    expect(&mut input, TokenType::End, 1, 1);
}

#[test]
fn keyword_true() {
    let mut input = TokenInput::new(b"true");
    expect(&mut input, TokenType::True, 1, 1);
    expect(&mut input, TokenType::End, 1, 5);
}

#[test]
fn keyword_false() {
    let mut input = TokenInput::new(b"false");
    expect(&mut input, TokenType::False, 1, 1);
    expect(&mut input, TokenType::End, 1, 6);
}

#[test]
fn new_lines() {
    let mut input = TokenInput::new(b"\n\r\n");
    expect(&mut input, TokenType::NewLine, 1, 1);
    expect(&mut input, TokenType::NewLine, 2, 1);
    expect(&mut input, TokenType::End, 3, 1);
}

#[test]
fn spaces_and_tabs() {
    let mut input = TokenInput::new(b" \t ");
    expect(&mut input, TokenType::Space, 1, 1);
    expect(&mut input, TokenType::Tab, 1, 2);
    expect(&mut input, TokenType::Space, 1, 3);
    expect(&mut input, TokenType::End, 1, 4);
}

#[test]
fn punctuation() {
    let mut input = TokenInput::new(b"-");
    expect(&mut input, TokenType::Minus, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);

    let mut input = TokenInput::new(b"{");
    expect(&mut input, TokenType::BraceOpen, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);

    let mut input = TokenInput::new(b"}");
    expect(&mut input, TokenType::BraceClose, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);

    let mut input = TokenInput::new(b"[");
    expect(&mut input, TokenType::BracketOpen, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);

    let mut input = TokenInput::new(b"]");
    expect(&mut input, TokenType::BracketClose, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);

    let mut input = TokenInput::new(b",");
    expect(&mut input, TokenType::Comma, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);

    let mut input = TokenInput::new(b":");
    expect(&mut input, TokenType::Colon, 1, 1);
    expect(&mut input, TokenType::End, 1, 2);
}

#[test]
fn integers() {
    let mut input = TokenInput::new(b"1 123 434 4533545");
    expect(&mut input, TokenType::Number, 1, 1);
    expect(&mut input, TokenType::Space, 1, 2);
    expect(&mut input, TokenType::Number, 1, 3);
    expect(&mut input, TokenType::Space, 1, 6);
    expect(&mut input, TokenType::Number, 1, 7);
    expect(&mut input, TokenType::Space, 1, 10);
    expect(&mut input, TokenType::Number, 1, 11);
    expect(&mut input, TokenType::End, 1, 18);
}

#[test]
fn decimals() {
    let mut input = TokenInput::new(b"1.3 1.23 43.4 4533.545");
    expect(&mut input, TokenType::Number, 1, 1);
    expect(&mut input, TokenType::Space, 1, 4);
    expect(&mut input, TokenType::Number, 1, 5);
    expect(&mut input, TokenType::Space, 1, 9);
    expect(&mut input, TokenType::Number, 1, 10);
    expect(&mut input, TokenType::Space, 1, 14);
    expect(&mut input, TokenType::Number, 1, 15);
    expect(&mut input, TokenType::End, 1, 23);
}

#[test]
fn single_quoted_string() {
    let mut input = TokenInput::new(b"'hello world'");
    expect_text(
        &mut input,
        TokenType::SingleQuotedString,
        1,
        1,
        "hello world",
    );
    expect(&mut input, TokenType::End, 1, 14);
}

#[test]
fn double_quoted_string() {
    let mut input = TokenInput::new(b"\"hello world\"");
    expect_text(
        &mut input,
        TokenType::DoubleQuotedString,
        1,
        1,
        "hello world",
    );
    expect(&mut input, TokenType::End, 1, 14);
}

#[test]
fn empty_quoted_string() {
    let mut input = TokenInput::new(b"\"\"");
    expect_text(&mut input, TokenType::DoubleQuotedString, 1, 1, "");
    expect(&mut input, TokenType::End, 1, 3);
}

#[test]
fn identifiers() {
    let mut input = TokenInput::new(b"hello world_2");
    expect_text(&mut input, TokenType::Identifier, 1, 1, "hello");
    expect(&mut input, TokenType::Space, 1, 6);
    expect_text(&mut input, TokenType::Identifier, 1, 7, "world_2");
    expect(&mut input, TokenType::End, 1, 14);
}

#[test]
fn identifier_separators() {
    let mut input = TokenInput::new(b"hello:world_2");
    expect_text(&mut input, TokenType::Identifier, 1, 1, "hello");
    expect(&mut input, TokenType::Colon, 1, 6);
    expect_text(&mut input, TokenType::Identifier, 1, 7, "world_2");
    expect(&mut input, TokenType::End, 1, 14);
}

#[test]
fn unclassified_bytes_are_nonterminals() {
    let mut input = TokenInput::new(b"@#");
    expect(&mut input, TokenType::Nonterminal, 1, 1);
    expect(&mut input, TokenType::Nonterminal, 1, 2);
    expect(&mut input, TokenType::End, 1, 3);
}

#[test]
fn embedded_terminator_ends_the_stream() {
    let mut input = TokenInput::new(b"a\0b");
    expect_text(&mut input, TokenType::Identifier, 1, 1, "a");
    expect(&mut input, TokenType::End, 1, 2);
    expect(&mut input, TokenType::End, 1, 2);
}
