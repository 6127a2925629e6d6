//! Resolution of the human-readable message of a record from a format string and positional
//! arguments.
//!
//! Format strings use printf-style verbs, since they are provided at runtime:
//!
//! | Verb | Accepts | Output |
//! |------|---------|--------|
//! | `%v` | anything | default rendering |
//! | `%s` | strings, errors, durations, opaque values | the text |
//! | `%q` | strings | double-quoted, escaped |
//! | `%d` | integers | decimal |
//! | `%x`, `%X` | integers, strings | hexadecimal |
//! | `%f` | floats | decimal, 6 digits of precision by default |
//! | `%t` | booleans | `true` / `false` |
//! | `%%` | nothing | a literal `%` |
//!
//! Verbs accept the `-` (left-align), `+` (always print sign) and `0` (zero-pad) flags,
//! a width and a `.precision`. Problems are reported inline instead of failing:
//! `%!d(string=abc)` for a mismatched argument, `%!d(MISSING)` for a missing one, and
//! `%!(EXTRA int=5)` for arguments left over. Widths and precisions above 1 000 000 are dropped
//! and reported as `%!(BADWIDTH)` and `%!(BADPREC)`.

use std::{
    borrow::Cow,
    fmt::Write as _,
    iter::Peekable,
    str::Chars,
};

use super::value::Value;

/// Largest width or precision a verb may request.
const MAX_WIDTH: usize = 1_000_000;

/// Resolves the message of a record.
///
/// - An empty format with arguments yields the arguments concatenated by [`sprint`].
/// - A format with arguments yields the format with the arguments substituted by [`sprintf`].
/// - A format without arguments is used verbatim; `%` is not interpreted.
pub fn resolve_message<'a>(format: &'a str, args: &[Value]) -> Cow<'a, str> {
    match (format.is_empty(), args.is_empty()) {
        (true, false) => Cow::Owned(sprint(args)),
        (false, false) => Cow::Owned(sprintf(format, args)),
        (_, true) => Cow::Borrowed(format),
    }
}

/// Concatenates the default renderings of the arguments, inserting a space between two
/// adjacent arguments when neither of them is a string.
///
/// ```
/// use ylog::{Value, message::sprint};
///
/// assert_eq!(sprint(&[Value::from("a"), Value::from("b")]), "ab");
/// assert_eq!(sprint(&[Value::from(1), Value::from(2), Value::from("x")]), "1 2x");
/// ```
pub fn sprint(args: &[Value]) -> String {
    let mut message = String::new();
    let mut previous: Option<&Value> = None;

    for arg in args {
        if previous.is_some_and(|previous| !previous.is_str() && !arg.is_str()) {
            message.push(' ');
        }
        let _ = write!(message, "{arg}");
        previous = Some(arg);
    }

    message
}

/// Substitutes the arguments into a printf-style format string.
///
/// ```
/// use ylog::{Value, message::sprintf};
///
/// assert_eq!(sprintf("x=%d", &[Value::from(5)]), "x=5");
/// assert_eq!(sprintf("%-5s|%05.1f", &[Value::from("ab"), Value::from(2.5)]), "ab   |002.5");
/// ```
pub fn sprintf(format: &str, args: &[Value]) -> String {
    let mut message = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            message.push(c);
            continue;
        }

        let directive = Directive::parse(&mut chars);
        directive.write_problems(&mut message);
        match chars.next() {
            None => message.push_str("%!(NOVERB)"),
            Some('%') => message.push('%'),
            Some(verb) => match args.next() {
                Some(arg) => directive.write(&mut message, verb, arg),
                None => {
                    let _ = write!(message, "%!{verb}(MISSING)");
                }
            },
        }
    }

    let mut extra = args.peekable();
    if extra.peek().is_some() {
        message.push_str("%!(EXTRA ");
        for (index, arg) in extra.enumerate() {
            if index > 0 {
                message.push_str(", ");
            }
            let _ = write!(message, "{}={arg}", arg.type_name());
        }
        message.push(')');
    }

    message
}

/// Flags, width and precision of a single verb.
#[derive(Debug, Default)]
struct Directive {
    left_align: bool,
    plus: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    bad_width: bool,
    bad_precision: bool,
}

impl Directive {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut directive = Self::default();

        while let Some(flag) = chars.next_if(|c| matches!(c, '-' | '+' | '0')) {
            match flag {
                '-' => directive.left_align = true,
                '+' => directive.plus = true,
                _ => directive.zero_pad = true,
            }
        }

        let width = Self::parse_number(chars);
        directive.bad_width = width.is_some_and(|width| width > MAX_WIDTH);
        directive.width = width.filter(|width| *width <= MAX_WIDTH);

        if chars.next_if_eq(&'.').is_some() {
            let precision = Self::parse_number(chars).unwrap_or(0);
            directive.bad_precision = precision > MAX_WIDTH;
            directive.precision = Some(precision).filter(|precision| *precision <= MAX_WIDTH);
        }

        directive
    }

    fn write_problems(&self, message: &mut String) {
        if self.bad_width {
            message.push_str("%!(BADWIDTH)");
        }
        if self.bad_precision {
            message.push_str("%!(BADPREC)");
        }
    }

    fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
        let mut number: Option<usize> = None;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            chars.next();
            let digit = usize::try_from(digit).unwrap_or_default();
            number = Some(
                number
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(digit),
            );
        }
        number
    }

    fn write(&self, message: &mut String, verb: char, arg: &Value) {
        let Some(body) = self.render(verb, arg) else {
            let _ = write!(message, "%!{verb}({}={arg})", arg.type_name());
            return;
        };
        let numeric = matches!(verb, 'd' | 'f' | 'F' | 'x' | 'X')
            && matches!(arg, Value::Int(_) | Value::Uint(_) | Value::Float(_));
        self.pad(message, &body, numeric);
    }

    /// Renders the argument without padding, or `None` if the verb does not apply to it.
    fn render(&self, verb: char, arg: &Value) -> Option<String> {
        let rendered = match (verb, arg) {
            ('v', _) => arg.to_string(),
            (
                's',
                Value::Str(_) | Value::Error(_) | Value::Opaque(_) | Value::Duration(_),
            ) => {
                let text = arg.to_string();
                match self.precision {
                    Some(precision) => text.chars().take(precision).collect(),
                    None => text,
                }
            }
            ('q', Value::Str(text)) => format!("{text:?}"),
            ('d', Value::Int(value)) => self.signed(value.is_negative(), value.unsigned_abs()),
            ('d', Value::Uint(value)) => self.signed(false, *value),
            ('x', Value::Int(value)) => {
                self.signed_hex(value.is_negative(), value.unsigned_abs(), false)
            }
            ('X', Value::Int(value)) => {
                self.signed_hex(value.is_negative(), value.unsigned_abs(), true)
            }
            ('x', Value::Uint(value)) => self.signed_hex(false, *value, false),
            ('X', Value::Uint(value)) => self.signed_hex(false, *value, true),
            ('x', Value::Str(text)) => text.bytes().map(|byte| format!("{byte:02x}")).collect(),
            ('X', Value::Str(text)) => text.bytes().map(|byte| format!("{byte:02X}")).collect(),
            ('f' | 'F', Value::Float(value)) => {
                let precision = self.precision.unwrap_or(6);
                if self.plus && value.is_sign_positive() {
                    format!("+{value:.precision$}")
                } else {
                    format!("{value:.precision$}")
                }
            }
            ('t', Value::Bool(value)) => value.to_string(),
            _ => return None,
        };
        Some(rendered)
    }

    fn signed(&self, negative: bool, magnitude: u64) -> String {
        match (negative, self.plus) {
            (true, _) => format!("-{magnitude}"),
            (false, true) => format!("+{magnitude}"),
            (false, false) => magnitude.to_string(),
        }
    }

    fn signed_hex(&self, negative: bool, magnitude: u64, upper: bool) -> String {
        let digits = if upper {
            format!("{magnitude:X}")
        } else {
            format!("{magnitude:x}")
        };
        match (negative, self.plus) {
            (true, _) => format!("-{digits}"),
            (false, true) => format!("+{digits}"),
            (false, false) => digits,
        }
    }

    fn pad(&self, message: &mut String, body: &str, numeric: bool) {
        let len = body.chars().count();
        let padding = self.width.unwrap_or(0).saturating_sub(len);

        if padding == 0 {
            message.push_str(body);
        } else if self.left_align {
            message.push_str(body);
            message.extend(std::iter::repeat_n(' ', padding));
        } else if self.zero_pad && numeric {
            let (sign, digits) = match body.strip_prefix(['-', '+']) {
                Some(digits) => body.split_at(body.len() - digits.len()),
                None => ("", body),
            };
            message.push_str(sign);
            message.extend(std::iter::repeat_n('0', padding));
            message.push_str(digits);
        } else {
            message.extend(std::iter::repeat_n(' ', padding));
            message.push_str(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_format_concatenates_arguments() {
        let args = [Value::from("a"), Value::from("b")];
        assert_eq!(resolve_message("", &args), "ab");

        let args = [Value::from(1), Value::from(true), Value::from("x"), Value::from(2)];
        assert_eq!(resolve_message("", &args), "1 truex2");
    }

    #[test]
    fn format_with_arguments_is_substituted() {
        assert_eq!(resolve_message("x=%d", &[Value::from(5)]), "x=5");
        assert_eq!(
            resolve_message("hello %s", &[Value::from("world")]),
            "hello world"
        );
    }

    #[test]
    fn format_without_arguments_is_verbatim() {
        assert_eq!(resolve_message("no args", &[]), "no args");
        assert_eq!(resolve_message("100%d done", &[]), "100%d done");
        assert!(matches!(resolve_message("no args", &[]), Cow::Borrowed(_)));
        assert_eq!(resolve_message("", &[]), "");
    }

    #[test]
    fn verbs_render_their_types() {
        let args = [
            Value::from("q\"uote"),
            Value::from(-255),
            Value::from(255_u32),
            Value::from(true),
            Value::from(1.23456),
            Value::from(std::time::Duration::from_millis(250)),
        ];
        assert_eq!(
            sprintf("%q %d %x %t %.2f %v", &args),
            r#""q\"uote" -255 ff true 1.23 250ms"#
        );
        assert_eq!(sprintf("%X|%x", &[Value::from(-10), Value::from("hi")]), "-A|6869");
        assert_eq!(sprintf("100%%", &[Value::from(1)]), "100%%!(EXTRA int=1)");
    }

    #[test]
    fn width_and_flags_pad() {
        assert_eq!(sprintf("[%5d]", &[Value::from(42)]), "[   42]");
        assert_eq!(sprintf("[%-5d]", &[Value::from(42)]), "[42   ]");
        assert_eq!(sprintf("[%05d]", &[Value::from(-42)]), "[-0042]");
        assert_eq!(sprintf("[%+d]", &[Value::from(42)]), "[+42]");
        assert_eq!(sprintf("[%.3s]", &[Value::from("abcdef")]), "[abc]");
        assert_eq!(sprintf("[%05s]", &[Value::from("ab")]), "[   ab]");
    }

    #[test]
    fn problems_are_reported_inline() {
        assert_eq!(sprintf("%d", &[Value::from("abc")]), "%!d(string=abc)");
        assert_eq!(sprintf("%d and %s", &[Value::from(1)]), "1 and %!s(MISSING)");
        assert_eq!(
            sprintf("%d", &[Value::from(1), Value::from("x"), Value::from(false)]),
            "1%!(EXTRA string=x, bool=false)"
        );
        assert_eq!(
            sprintf("trailing %", &[Value::from(1)]),
            "trailing %!(NOVERB)%!(EXTRA int=1)"
        );
    }

    #[test]
    fn oversized_width_and_precision_are_reported_instead_of_padding() {
        assert_eq!(
            sprintf("%99999999999999999999d", &[Value::from(1)]),
            "%!(BADWIDTH)1"
        );
        assert_eq!(sprintf("[%1000001s]", &[Value::from("a")]), "[%!(BADWIDTH)a]");
        assert_eq!(
            sprintf("%.99999999f", &[Value::from(1.5)]),
            "%!(BADPREC)1.500000"
        );
        assert_eq!(sprintf("[%3.1000000s]", &[Value::from("ab")]), "[ ab]");
    }
}
