//! Static well-formedness checks for embedded code.
//!
//! Both checks read source text only. The Python check runs the full Python
//! grammar (lexer, indentation and parser) and stops there: nothing is
//! compiled to bytecode, imported or executed.

use std::fmt;

use rustpython_parser::{Mode, ParseError, parse};

/// Brace and parenthesis balance of a JavaScript source, by raw character count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsBalance {
	pub braces: bool,
	pub parens: bool,
}

pub fn js_balance(code: &str) -> JsBalance {
	let (mut braces, mut parens) = (0i64, 0i64);
	for c in code.chars() {
		match c {
			'{' => braces += 1,
			'}' => braces -= 1,
			'(' => parens += 1,
			')' => parens -= 1,
			_ => {}
		}
	}
	JsBalance {
		braces: braces == 0,
		parens: parens == 0,
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PySyntaxError {
	pub message: String,
	/// 1-based.
	pub line: usize,
}

impl fmt::Display for PySyntaxError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (line {})", self.message, self.line)
	}
}

impl std::error::Error for PySyntaxError {}

/// Parses Python source as a module without executing or importing anything.
pub fn check_python(source: &str) -> Result<(), PySyntaxError> {
	parse(source, Mode::Module, "<plot>").map(drop).map_err(|e| syntax_error(source, &e))
}

fn syntax_error(source: &str, error: &ParseError) -> PySyntaxError {
	let offset = u32::from(error.offset) as usize;
	let before = source.get(..offset).unwrap_or(source);
	PySyntaxError {
		message: error.error.to_string(),
		line: before.matches('\n').count() + 1,
	}
}

#[cfg(test)]
mod tests;
