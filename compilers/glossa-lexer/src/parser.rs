use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{anychar, multispace0, one_of},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
    IResult,
};
use glossa_protocol::Span;

/// Word characters: letters and digits in any script.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken<'a> {
    Word(&'a str),
    Punct(char),
}

/// A word with optional inner joiners: "don't", "e-mail", "l’hôtel".
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_word_char),
        many0(pair(one_of("-'\u{2019}"), take_while1(is_word_char))),
    ))(input)
}

/// Splits `original_input` into words and punctuation.
///
/// Spans are UTF-16 code unit offsets into the original input, not byte or
/// `char` offsets, so they line up with JavaScript string indices on the
/// browser side (astral characters such as emoji count as two).
pub fn parse_with_spans(original_input: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original_input;
    let mut pos = 0;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace
        let (next_input, skipped) = match multispace0::<&str, nom::error::Error<&str>>(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        pos += skipped.encode_utf16().count();
        input = next_input;

        if input.is_empty() {
            break;
        }

        // 2. Word or a single punctuation/symbol char
        let parse_res: IResult<&str, RawToken> = alt((map(word, RawToken::Word), map(anychar, RawToken::Punct)))(input);

        match parse_res {
            Ok((next_input, token)) => {
                let consumed = &input[..input.len() - next_input.len()];
                let len = consumed.encode_utf16().count();

                result.push((Span::new(pos, pos + len), token));
                pos += len;
                input = next_input;
            }
            Err(_) => break,
        }
    }

    result
}
