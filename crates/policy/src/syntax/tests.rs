use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[rstest]
#[case("function f() { return (1 + 2); }", true, true)]
#[case("function f() { return 1;", false, true)]
#[case("call(a, b", true, false)]
#[case("}{", true, true)]
fn javascript_balance_counts_characters(#[case] code: &str, #[case] braces: bool, #[case] parens: bool) {
	assert_eq!(js_balance(code), JsBalance { braces, parens });
}

#[rstest]
#[case::empty("")]
#[case::simple("x = 1\nprint(x)\n")]
#[case::blocks("def f(a: int) -> int:\n    if a > 1:\n        return a\n    else:\n        return 0\n")]
#[case::one_line_block("class A: pass\nfor i in range(3): print(i)\n")]
#[case::continuation("total = 1 + \\\n    2\n")]
#[case::crlf_continuation("total = 1 + \\\r\n    2\r\nif total:\r\n    total -= 1\r\n")]
#[case::multiline_call("values = [\n  1,\n      2,\n]\n")]
#[case::dict_in_header("for k in {1: 2}:\n    pass\n")]
#[case::comments("# header\nif True:  # trailing\n\n    # nested comment\n    x = 1\n")]
#[case::triple_string("doc = \"\"\"first\n  second ' \"\n\"\"\"\ny = 2\n")]
#[case::prefixed("name = f'{x}' + b\"raw\"\n")]
#[case::walrus("if (n := 10) > 5:\n    pass\n")]
#[case::decorator("@cache\ndef f():\n    return 1\n")]
#[case::match_statement("match cmd:\n    case 1:\n        pass\n    case _:\n        pass\n")]
#[case::soft_keywords_as_names("match = 1\ncase = match + 1\n")]
#[case::no_trailing_newline("x = {'a': [1, 2]}")]
fn well_formed_python_passes(#[case] source: &str) {
	assert_eq!(check_python(source), Ok(()));
}

#[rstest]
#[case::missing_colon("if x > 1\n    pass\n", 1)]
#[case::doubled_operator("x = = 1\n", 1)]
#[case::bad_function_name("def 1f(): pass\n", 1)]
#[case::unmatched_close("x = 1)\n", 1)]
#[case::mismatched("x = [1, 2)\n", 1)]
#[case::missing_body("def f():\nreturn 1\n", 2)]
fn malformed_python_reports_line(#[case] source: &str, #[case] line: usize) {
	let error = check_python(source).unwrap_err();
	assert_eq!(error.line, line, "{error}");
	assert!(!error.message.is_empty());
}

#[rstest]
#[case::unclosed_paren("x = (1,\ny = 2\n")]
#[case::unterminated_string("a = 1\nname = 'abc\n")]
#[case::unterminated_triple("x = 1\ns = '''never\nends\n")]
#[case::unexpected_indent("x = 1\n    y = 2\n")]
#[case::bad_dedent("if x:\n        a = 1\n    b = 2\n")]
#[case::missing_body_at_end("while True:\n")]
#[case::case_outside_match("case 1:\n    pass\n")]
fn malformed_python_is_rejected(#[case] source: &str) {
	assert!(check_python(source).is_err());
}

#[test]
fn error_display_carries_line() {
	let error = check_python("x = 1\ny = = 2\n").unwrap_err();
	assert!(error.to_string().ends_with(" (line 2)"), "{error}");
}
