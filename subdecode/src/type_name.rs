// Copyright 2019-2024 Parity Technologies (UK) Ltd.
// This file is part of subdecode.
//
// subdecode is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// subdecode is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with subdecode.  If not, see <http://www.gnu.org/licenses/>.

//! Parsing of type name strings like `Vec<(AccountId, u64)>` into a [`TypeExpression`].

use std::fmt;
use yap::{types::StrTokens, IntoTokens, TokenLocation, Tokens};

/// How deeply generics, tuples and arrays may nest inside one type name.
pub const MAX_NESTING: usize = 128;

/// A parsed type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpression {
	/// Bare or generic names: `u32`, `Balance`, `Vec<T>`, `Result<T, E>`.
	Named { name: String, params: Vec<TypeExpression> },
	/// Tuples such as `()` or `(SessionKey, u64)`.
	Tuple(Vec<TypeExpression>),
	/// Fixed length arrays such as `[u8; 32]`.
	Array { param: Box<TypeExpression>, length: usize },
}

impl TypeExpression {
	/// Parse a type name. Whitespace between tokens is ignored. Names nesting deeper than
	/// [`MAX_NESTING`] are rejected with [`ParseErrorKind::TooDeep`].
	pub fn parse(input: &str) -> Result<TypeExpression, ParseError> {
		let mut tokens = input.into_tokens();
		let ty = parse_type_expression(&mut tokens, 0)?;
		skip_whitespace(&mut tokens);
		if tokens.peek().is_some() {
			let loc = tokens.location().offset();
			return Err(ParseError::new_at(ParseErrorKind::TrailingInput, loc));
		}
		Ok(ty)
	}

	pub fn named<S: Into<String>>(name: S) -> TypeExpression {
		TypeExpression::Named { name: name.into(), params: Vec::new() }
	}

	pub fn named_with_params<S: Into<String>>(name: S, params: Vec<TypeExpression>) -> TypeExpression {
		TypeExpression::Named { name: name.into(), params }
	}

	/// Base name of a named type. Tuples and arrays have none.
	pub fn name(&self) -> Option<&str> {
		match self {
			TypeExpression::Named { name, .. } => Some(name),
			_ => None,
		}
	}

	/// Generic arguments, tuple elements, or the element type of an array.
	pub fn args(&self) -> &[TypeExpression] {
		match self {
			TypeExpression::Named { params, .. } => params,
			TypeExpression::Tuple(params) => params,
			TypeExpression::Array { param, .. } => std::slice::from_ref(param),
		}
	}

	/// Number of elements if this is a tuple.
	pub fn arity(&self) -> Option<usize> {
		match self {
			TypeExpression::Tuple(params) => Some(params.len()),
			_ => None,
		}
	}

	/// `true` for the bare `u8`/`U8` name.
	pub fn is_u8(&self) -> bool {
		matches!(self, TypeExpression::Named { name, params } if params.is_empty() && (name == "u8" || name == "U8"))
	}
}

/// Canonical form: no whitespace except the one after an array's `;`.
impl fmt::Display for TypeExpression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fn list(f: &mut fmt::Formatter<'_>, params: &[TypeExpression]) -> fmt::Result {
			for (i, p) in params.iter().enumerate() {
				if i > 0 {
					f.write_str(",")?;
				}
				write!(f, "{}", p)?;
			}
			Ok(())
		}

		match self {
			TypeExpression::Named { name, params } if params.is_empty() => f.write_str(name),
			TypeExpression::Named { name, params } => {
				write!(f, "{}<", name)?;
				list(f, params)?;
				f.write_str(">")
			}
			TypeExpression::Tuple(params) => {
				f.write_str("(")?;
				list(f, params)?;
				f.write_str(")")
			}
			TypeExpression::Array { param, length } => write!(f, "[{}; {}]", param, length),
		}
	}
}

/// A type name that could not be parsed, and where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display(fmt = "error at character {loc}: {err}")]
pub struct ParseError {
	pub loc: usize,
	pub err: ParseErrorKind,
}

impl ParseError {
	pub fn new_at<E: Into<ParseErrorKind>>(err: E, loc: usize) -> Self {
		Self { loc, err: err.into() }
	}
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ParseErrorKind {
	#[display(fmt = "expected a type name")]
	InvalidTypeName,
	#[display(fmt = "missing closing `)` of a tuple")]
	ClosingParenMissing,
	#[display(fmt = "missing closing `>` of generic arguments")]
	ClosingAngleBracketMissing,
	#[display(fmt = "missing closing `]` of an array")]
	ClosingSquareBracketMissing,
	#[display(fmt = "missing `;` between array element type and length")]
	SemicolonMissing,
	#[display(fmt = "array length is not an unsigned integer")]
	InvalidUnsignedInt,
	#[display(fmt = "unexpected characters after the type name")]
	TrailingInput,
	#[display(fmt = "type name is nested too deeply")]
	TooDeep,
}

fn parse_type_expression(input: &mut StrTokens<'_>, depth: usize) -> Result<TypeExpression, ParseError> {
	skip_whitespace(input);
	let loc = input.location();
	try_parse_type_expression(input, depth)
		.unwrap_or_else(|| Err(ParseError::new_at(ParseErrorKind::InvalidTypeName, loc.offset())))
}

fn try_parse_type_expression(
	input: &mut StrTokens<'_>,
	depth: usize,
) -> Option<Result<TypeExpression, ParseError>> {
	if depth > MAX_NESTING {
		let loc = input.location().offset();
		return Some(Err(ParseError::new_at(ParseErrorKind::TooDeep, loc)));
	}
	yap::one_of!(input;
		parse_tuple(input, depth),
		parse_array(input, depth),
		parse_named(input, depth),
	)
}

// `Foo`, `a::b::Foo`, `Vec<Foo>`, `Result<A, B>`
fn parse_named(input: &mut StrTokens<'_>, depth: usize) -> Option<Result<TypeExpression, ParseError>> {
	let first = input.peek()?;
	if !(first.is_alphabetic() || first == '_') {
		return None;
	}

	let name = parse_path(input);

	skip_whitespace(input);
	if !input.token('<') {
		return Some(Ok(TypeExpression::named(name)));
	}

	let params = match parse_comma_separated(input, depth + 1) {
		Ok(params) => params,
		Err(e) => return Some(Err(e)),
	};

	if !input.token('>') {
		let loc = input.location().offset();
		Some(Err(ParseError::new_at(ParseErrorKind::ClosingAngleBracketMissing, loc)))
	} else {
		Some(Ok(TypeExpression::named_with_params(name, params)))
	}
}

// `()`, `(A, B<C>)`
fn parse_tuple(input: &mut StrTokens<'_>, depth: usize) -> Option<Result<TypeExpression, ParseError>> {
	if !input.token('(') {
		return None;
	}

	let params = match parse_comma_separated(input, depth + 1) {
		Ok(params) => params,
		Err(e) => return Some(Err(e)),
	};

	if !input.token(')') {
		let loc = input.location().offset();
		Some(Err(ParseError::new_at(ParseErrorKind::ClosingParenMissing, loc)))
	} else {
		Some(Ok(TypeExpression::Tuple(params)))
	}
}

// `[u8; 32]`
fn parse_array(input: &mut StrTokens<'_>, depth: usize) -> Option<Result<TypeExpression, ParseError>> {
	if !input.token('[') {
		return None;
	}

	let param = match parse_type_expression(input, depth + 1) {
		Ok(param) => param,
		Err(e) => return Some(Err(e)),
	};

	skip_whitespace(input);
	if !input.token(';') {
		let loc = input.location().offset();
		return Some(Err(ParseError::new_at(ParseErrorKind::SemicolonMissing, loc)));
	}
	skip_whitespace(input);

	let loc = input.location().offset();
	let length: usize = match input.take_while(|c| c.is_numeric()).parse::<usize, String>() {
		Ok(n) => n,
		Err(_) => return Some(Err(ParseError::new_at(ParseErrorKind::InvalidUnsignedInt, loc))),
	};

	skip_whitespace(input);
	if !input.token(']') {
		let loc = input.location().offset();
		Some(Err(ParseError::new_at(ParseErrorKind::ClosingSquareBracketMissing, loc)))
	} else {
		Some(Ok(TypeExpression::Array { param: Box::new(param), length }))
	}
}

// Only splits on commas at the current nesting level; nested brackets are consumed by the
// recursive parse of each element. A trailing comma is tolerated.
fn parse_comma_separated(input: &mut StrTokens<'_>, depth: usize) -> Result<Vec<TypeExpression>, ParseError> {
	skip_whitespace(input);
	let params = input
		.sep_by(
			|toks| {
				skip_whitespace(toks);
				try_parse_type_expression(toks, depth)
			},
			|toks| toks.surrounded_by(|toks| toks.token(','), |toks| skip_whitespace(toks)),
		)
		.collect::<Result<Vec<_>, _>>()?;
	skip_whitespace(input);
	input.token(',');
	skip_whitespace(input);
	Ok(params)
}

fn parse_path<'a>(input: &mut StrTokens<'a>) -> &'a str {
	str_slice_from(input, |toks| {
		toks.sep_by(
			|t| {
				let first = t.peek()?;
				if !(first.is_alphabetic() || first == '_') {
					return None;
				}
				t.skip_while(|c| c.is_alphanumeric() || *c == '_');
				Some(())
			},
			|t| t.tokens("::".chars()),
		)
		.consume();
	})
}

fn skip_whitespace(input: &mut StrTokens<'_>) {
	input.skip_while(|c| c.is_whitespace());
}

fn str_slice_from<'a, F>(input: &mut StrTokens<'a>, f: F) -> &'a str
where
	F: FnOnce(&mut StrTokens<'a>),
{
	let before = input.remaining();
	f(input);
	let leftover = input.remaining().len();
	&before[..before.len() - leftover]
}
