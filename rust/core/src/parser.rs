// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP/IFC Parser using nom
//!
//! Parses one entity instance (`#id=TYPE(...);`) straight into owned
//! [`AttributeValue`]s.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::entity::AttributeValue;
use crate::error::{Error, Result};

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse entity reference: #123
fn entity_ref(input: &str) -> IResult<&str, AttributeValue> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        AttributeValue::EntityRef,
    )(input)
}

/// Parse string literal: 'text'
/// A doubled quote ('') inside the literal stands for one quote
fn string_literal(input: &str) -> IResult<&str, AttributeValue> {
    let (body, _) = char('\'')(input)?;
    let bytes = body.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            let text = decode_step_string(&body[..i]);
            return Ok((&body[i + 1..], AttributeValue::String(text)));
        }
        i += 1;
    }

    Err(nom::Err::Error(NomError::new(input, ErrorKind::Char)))
}

/// Parse real: 3.14, -3.14, 1.5E-10, 0.
/// STEP reals always carry a decimal point, which separates them from integers
fn real(input: &str) -> IResult<&str, AttributeValue> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s).map(AttributeValue::Float),
    )(input)
}

/// Parse integer: 42, -42
fn integer(input: &str) -> IResult<&str, AttributeValue> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>().map(AttributeValue::Integer)
    })(input)
}

/// Parse enum: .T., .ROOF., .NOTDEFINED.
fn enumeration(input: &str) -> IResult<&str, AttributeValue> {
    map(
        delimited(char('.'), take_while1(is_name_char), char('.')),
        |s: &str| AttributeValue::Enum(s.to_string()),
    )(input)
}

/// Parse list: (1, 2, 3) or nested lists
fn list(input: &str) -> IResult<&str, AttributeValue> {
    map(arguments, AttributeValue::List)(input)
}

/// Parse typed value: IFCAREAMEASURE(12.5), IFCLABEL('x')
fn typed_value(input: &str) -> IResult<&str, AttributeValue> {
    map(
        pair(take_while1(is_name_char), arguments),
        |(type_name, mut args): (&str, Vec<AttributeValue>)| {
            let inner = if args.is_empty() {
                AttributeValue::Null
            } else {
                args.swap_remove(0)
            };
            AttributeValue::Typed(type_name.to_string(), Box::new(inner))
        },
    )(input)
}

/// Parse a single attribute value with optional surrounding whitespace
fn value(input: &str) -> IResult<&str, AttributeValue> {
    delimited(
        multispace0,
        alt((
            real, // before integer: reals start with digits too
            integer,
            entity_ref,
            string_literal,
            enumeration,
            list,
            typed_value,
            map(char('$'), |_| AttributeValue::Null),
            map(char('*'), |_| AttributeValue::Derived),
        )),
        multispace0,
    )(input)
}

/// Parse a parenthesised, comma separated argument list
fn arguments(input: &str) -> IResult<&str, Vec<AttributeValue>> {
    delimited(
        char('('),
        separated_list0(char(','), value),
        preceded(multispace0, char(')')),
    )(input)
}

/// Parse a complete entity instance
/// Example: #123=IFCSLAB('guid',#2,'Roof',$,$,#10,#20,$,.ROOF.);
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<AttributeValue>)> {
    let parsed: IResult<&str, (u32, &str, Vec<AttributeValue>)> = tuple((
        delimited(
            multispace0,
            preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
            multispace0,
        ),
        preceded(
            char('='),
            delimited(multispace0, take_while1(is_name_char), multispace0),
        ),
        terminated(arguments, preceded(multispace0, char(';'))),
    ))(input);

    match parsed {
        Ok((_, entity)) => Ok(entity),
        Err(e) => Err(Error::parse(
            0,
            format!(
                "Failed to parse entity {:?}: {}",
                &input[..input.len().min(80)],
                e
            ),
        )),
    }
}

/// Resolve the `\X\hh` (ISO 8859-1) and `\X2\hhhh...\X0\` (UTF-16) escapes
/// that authoring tools use for non-ASCII names; `''` becomes `'`.
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains('\\') && !raw.contains("''") {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("''") {
            out.push('\'');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("\\X2\\") {
            let end = tail.find("\\X0\\").unwrap_or(tail.len());
            let units: Vec<u16> = tail[..end]
                .as_bytes()
                .chunks(4)
                .filter_map(|chunk| std::str::from_utf8(chunk).ok())
                .filter_map(|hex| u16::from_str_radix(hex, 16).ok())
                .collect();
            out.extend(char::decode_utf16(units).map(|c| c.unwrap_or('\u{FFFD}')));
            rest = tail.get(end + 4..).unwrap_or("");
        } else if let Some(tail) = rest.strip_prefix("\\X\\") {
            match tail.get(..2).and_then(|hex| u8::from_str_radix(hex, 16).ok()) {
                Some(byte) => {
                    out.push(char::from(byte));
                    rest = &tail[2..];
                }
                None => {
                    out.push_str("\\X\\");
                    rest = tail;
                }
            }
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }

    out
}
