use test_case::test_case;
use throf::lang::tokenizing::{tokenize_from_source, Token, TokenKind};
use throf::runtime::error::{Component, ErrorKind};

fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
    let stream = tokenize_from_source("<test>", source).unwrap();

    stream
        .tokens()
        .iter()
        .map(|token| (token.kind(), token.text().clone()))
        .collect()
}

fn error_kind(source: &str) -> ErrorKind {
    match tokenize_from_source("<test>", source) {
        Ok(stream) => panic!("expected an error, got tokens:\n{}", stream),
        Err(error) => error.kind().clone(),
    }
}

use TokenKind::*;

#[test]
fn simple_arithmetic_line() {
    let tokens = kinds_and_texts("1 2 + .");

    assert_eq!(
        tokens,
        vec![
            (WordOrData, "1".to_string()),
            (WordOrData, "2".to_string()),
            (WordOrData, "+".to_string()),
            (WordOrData, ".".to_string()),
        ]
    );
}

#[test]
fn word_definition() {
    let tokens = kinds_and_texts(": square dup * ;");

    assert_eq!(
        tokens,
        vec![
            (WordDefinitionHeader, "square".to_string()),
            (WordOrData, "dup".to_string()),
            (WordOrData, "*".to_string()),
            (DefinitionTerminator, ";".to_string()),
        ]
    );
}

#[test_case(":variable x", Directive, ":variable", "x"; "variable")]
#[test_case(":defer later", Directive, ":defer", "later"; "defer")]
#[test_case(":include \"lib.th4\"", Directive, ":include", "lib.th4"; "include")]
fn directives(source: &str, kind: TokenKind, keyword: &str, argument: &str) {
    let tokens = kinds_and_texts(source);

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], (kind, keyword.to_string()));
    assert_eq!(tokens[1].1, argument);
}

#[test_case("\"hello world\"", "hello world"; "with spaces")]
#[test_case("\"\"", ""; "empty")]
#[test_case("\"a\"b\"", "a\"b"; "inner quote")]
#[test_case("\"no \\n escapes\"", "no \\n escapes"; "raw text")]
#[test_case("\"  padded  \"", "  padded  "; "keeps whitespace")]
fn string_literals(source: &str, text: &str) {
    assert_eq!(kinds_and_texts(source), vec![(StringLiteral, text.to_string())]);
}

#[test]
fn nested_quotations() {
    let kinds: Vec<TokenKind> = kinds_and_texts("[ 1 [ 2 ] ]")
        .into_iter()
        .map(|(kind, _)| kind)
        .collect();

    assert_eq!(
        kinds,
        vec![QuotationOpen, WordOrData, QuotationOpen, WordOrData, QuotationClose, QuotationClose]
    );
}

#[test_case("a[b] c", &["a[b]", "c"]; "brackets inside a word")]
#[test_case("[1 ]", &["[1", "]"]; "open bracket attached to data")]
#[test_case("(x) 1", &["(x)", "1"]; "paren attached to a word")]
fn embedded_delimiters_are_words(source: &str, texts: &[&str]) {
    let tokens = kinds_and_texts(source);

    let found: Vec<&str> = tokens.iter().map(|(_, text)| text.as_str()).collect();
    assert_eq!(found, texts);

    assert!(tokens[..tokens.len() - 1].iter().all(|(kind, _)| *kind == WordOrData));
}

#[test_case("1 # the rest is ignored ; [ \n2"; "line comment")]
#[test_case("1 ( a ( flat ) 2"; "paren comment")]
#[test_case("# only a comment\n1 2"; "leading comment")]
#[test_case("( leading )\n1\t\t2\n"; "comment and tabs")]
fn comments_are_skipped(source: &str) {
    assert_eq!(
        kinds_and_texts(source),
        vec![(WordOrData, "1".to_string()), (WordOrData, "2".to_string())]
    );
}

#[test]
fn empty_source_has_no_tokens() {
    assert!(kinds_and_texts("").is_empty());
    assert!(kinds_and_texts("  \n\t # nothing\n").is_empty());
}

#[test_case("\"abc", ErrorKind::UnterminatedStringLiteral; "unterminated string")]
#[test_case("1 2 \"abc\"def", ErrorKind::UnterminatedStringLiteral; "quote not followed by whitespace")]
#[test_case("1 ( never closed", ErrorKind::UnterminatedComment; "unterminated comment")]
fn lexical_errors(source: &str, expected: ErrorKind) {
    assert_eq!(error_kind(source), expected);
}

#[test_case(":"; "marker at end")]
#[test_case(": "; "marker without name")]
#[test_case(":;"; "marker with punctuation")]
fn malformed_markers(source: &str) {
    let error = tokenize_from_source("<marker>", source).unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::MalformedMarker(_)));
    assert_eq!(error.component(), Component::Tokenizer);
    assert_eq!(error.source_name(), Some("<marker>"));
}

#[test]
fn tokens_carry_locations() {
    let stream = tokenize_from_source("<test>", "1\n  two").unwrap();
    let second = &stream.tokens()[1];

    assert_eq!(second.location().path(), "<test>");
    assert_eq!(second.location().line(), 2);
    assert_eq!(second.location().column(), 3);
}

#[test]
fn token_equality_ignores_location() {
    let stream = tokenize_from_source("<test>", "dup\ndup").unwrap();
    let tokens = stream.tokens();

    assert_eq!(tokens[0], tokens[1]);
    assert_ne!(tokens[0].location(), tokens[1].location());
    assert_ne!(
        tokens[0],
        Token::new(StringLiteral, "dup", tokens[0].location().clone())
    );
}

#[test]
fn stream_can_be_read_twice() {
    let mut stream = tokenize_from_source("<test>", "a b c").unwrap();

    let first: Vec<Token> = std::iter::from_fn(|| stream.next_token()).collect();
    assert!(!stream.has_next());

    stream.reset();

    let second: Vec<Token> = std::iter::from_fn(|| stream.next_token()).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn token_dump() {
    let stream = tokenize_from_source("<test>", ": greet \"hi\" . ;").unwrap();

    assert_eq!(
        stream.to_string(),
        "word definition: greet\n\
         string literal: \"hi\"\n\
         word or data: .\n\
         definition terminator: ;\n"
    );
}
