//! printf-style positional formatting for translated strings.
//!
//! Catalog texts are written with printf placeholders (`"%d items"`,
//! `"%2$s, %1$s"`). Supported conversions are `b c d e E f F o s u x X` and
//! `%%`, with the flags `-`, `+`, `0`, space and `'c` (custom padding
//! character), a minimum width and a precision.

use std::iter::{
    Peekable,
    repeat_n,
};
use std::str::CharIndices;

use thiserror::Error;

/// Errors raised while expanding a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The template references more arguments than were supplied
    #[error("Too few arguments: the template requires {required}, {supplied} supplied")]
    TooFewArguments {
        /// 1-based number of the first argument that was missing
        required: usize,
        /// Number of arguments passed in
        supplied: usize,
    },
    /// A `%` was followed by a conversion character that is not supported
    #[error("Unknown format conversion '%{conversion}' at byte {position}")]
    UnknownConversion {
        /// The offending conversion character
        conversion: char,
        /// Byte offset of the `%` that starts the placeholder
        position: usize,
    },
    /// `%0$s`: argument numbers start at 1
    #[error("Argument number must be greater than zero")]
    ZeroArgumentIndex,
    /// The template ends in the middle of a placeholder
    #[error("Incomplete format specification at the end of the template")]
    Incomplete,
}

/// A value substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    /// Integer, used by `%d`, `%u`, `%x`, `%c`...
    Int(i64),
    /// Floating point, used by `%f` and `%e`
    Float(f64),
    /// Text, used by `%s`
    Str(String),
}

impl FormatArg {
    /// Integer view of the argument. Strings contribute their leading integer, or 0.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Int(value) => *value,
            Self::Float(value) => *value as i64,
            Self::Str(value) => leading_int(value),
        }
    }

    /// Floating point view of the argument.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_float(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) => *value,
            Self::Str(value) => {
                value.trim().parse::<f64>().unwrap_or_else(|_| leading_int(value) as f64)
            }
        }
    }

    /// Text view of the argument, as `%s` renders it.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Str(value) => value.clone(),
        }
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FormatArg {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for FormatArg {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FormatArg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Leading integer of a string (`"42abc"` -> 42), 0 when there is none.
fn leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    text.get(..end).and_then(|digits| digits.parse().ok()).unwrap_or(0)
}

/// One parsed placeholder
#[derive(Debug, Clone, Copy)]
struct Spec {
    /// Explicit 1-based argument number (`%2$s`)
    argnum: Option<usize>,
    /// `-`: pad on the right
    left: bool,
    /// `+`: always print the sign of numbers
    plus: bool,
    /// Padding character, space unless `0` or `'c` was given
    pad: char,
    /// Minimum width in characters
    width: usize,
    /// Digits after the point for floats, maximum length for strings
    precision: Option<usize>,
    /// Conversion character
    conversion: char,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            argnum: None,
            left: false,
            plus: false,
            pad: ' ',
            width: 0,
            precision: None,
            conversion: 's',
        }
    }
}

/// Expand `template` against `args`.
///
/// Placeholders without an explicit argument number consume the arguments in
/// order; `%n$` placeholders do not advance that counter.
///
/// # Examples
/// ```
/// use l10n_translator::format::{FormatArg, sprintf};
///
/// let args = [FormatArg::from("Alice"), FormatArg::from(3)];
/// assert_eq!(sprintf("%s has %d new messages", &args).unwrap(), "Alice has 3 new messages");
/// assert_eq!(sprintf("%2$s/%1$s", &args).unwrap(), "3/Alice");
/// ```
///
/// # Errors
/// Returns [`FormatError`] when the template is malformed or needs more
/// arguments than supplied. Nothing is truncated silently.
pub fn sprintf(template: &str, args: &[FormatArg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    let mut next_arg = 0;

    while let Some((position, ch)) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        if chars.next_if(|&(_, c)| c == '%').is_some() {
            out.push('%');
            continue;
        }

        let spec = parse_spec(&mut chars, position)?;
        let index = spec.argnum.map_or_else(
            || {
                let index = next_arg;
                next_arg += 1;
                index
            },
            |argnum| argnum - 1,
        );
        let arg = args
            .get(index)
            .ok_or(FormatError::TooFewArguments { required: index + 1, supplied: args.len() })?;
        render(&spec, arg, &mut out);
    }

    Ok(out)
}

/// Read a run of ASCII digits, `None` if there is none.
fn read_number(chars: &mut Peekable<CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some((_, c)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
        let digit = c.to_digit(10).map_or(0, |d| d as usize);
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
    }
    value
}

/// Parse everything after the `%` up to and including the conversion.
fn parse_spec(
    chars: &mut Peekable<CharIndices<'_>>,
    position: usize,
) -> Result<Spec, FormatError> {
    let mut spec = Spec::default();

    let mut lookahead = chars.clone();
    if let Some(argnum) = read_number(&mut lookahead)
        && lookahead.next_if(|&(_, c)| c == '$').is_some()
    {
        if argnum == 0 {
            return Err(FormatError::ZeroArgumentIndex);
        }
        spec.argnum = Some(argnum);
        *chars = lookahead;
    }

    loop {
        match chars.peek().map(|&(_, c)| c) {
            Some('-') => spec.left = true,
            Some('+') => spec.plus = true,
            Some('0') => spec.pad = '0',
            Some(' ') => spec.pad = ' ',
            Some('\'') => {
                chars.next();
                let (_, pad) = chars.next().ok_or(FormatError::Incomplete)?;
                spec.pad = pad;
                continue;
            }
            _ => break,
        }
        chars.next();
    }

    spec.width = read_number(chars).unwrap_or(0);
    if chars.next_if(|&(_, c)| c == '.').is_some() {
        spec.precision = Some(read_number(chars).unwrap_or(0));
    }

    let (_, conversion) = chars.next().ok_or(FormatError::Incomplete)?;
    if !matches!(conversion, 'b' | 'c' | 'd' | 'e' | 'E' | 'f' | 'F' | 'o' | 's' | 'u' | 'x' | 'X')
    {
        return Err(FormatError::UnknownConversion { conversion, position });
    }
    spec.conversion = conversion;

    Ok(spec)
}

/// Largest precision honored by `%e` and `%f`; larger requests are capped.
const MAX_FLOAT_PRECISION: usize = 53;

/// Render one argument according to its placeholder.
#[allow(clippy::cast_sign_loss)]
fn render(spec: &Spec, arg: &FormatArg, out: &mut String) {
    let float_precision = spec.precision.map_or(6, |precision| precision.min(MAX_FLOAT_PRECISION));
    let body = match spec.conversion {
        // %c ignores width and padding
        'c' => {
            if let Some(c) = u32::try_from(arg.as_int()).ok().and_then(char::from_u32) {
                out.push(c);
            }
            return;
        }
        's' => {
            let text = arg.to_text();
            match spec.precision {
                Some(max) => text.chars().take(max).collect(),
                None => text,
            }
        }
        'd' => signed(arg.as_int().to_string(), spec.plus),
        'u' => (arg.as_int() as u64).to_string(),
        'f' | 'F' => {
            signed(format!("{:.*}", float_precision, arg.as_float()), spec.plus)
        }
        'e' | 'E' => signed(
            exponent(arg.as_float(), float_precision, spec.conversion == 'E'),
            spec.plus,
        ),
        'x' => format!("{:x}", arg.as_int() as u64),
        'X' => format!("{:X}", arg.as_int() as u64),
        'o' => format!("{:o}", arg.as_int() as u64),
        'b' => format!("{:b}", arg.as_int() as u64),
        _ => String::new(),
    };

    pad(spec, &body, out);
}

/// Prefix `+` to non-negative numbers when requested.
fn signed(number: String, plus: bool) -> String {
    if plus && !number.starts_with('-') { format!("+{number}") } else { number }
}

/// Scientific notation with an explicitly signed exponent (`1.5e+3`).
fn exponent(value: f64, precision: usize, upper: bool) -> String {
    let formatted = format!("{value:.precision$e}");
    let Some((mantissa, exp)) = formatted.split_once('e') else {
        // NaN and infinities
        return formatted;
    };
    let (sign, digits) = exp.strip_prefix('-').map_or(('+', exp), |digits| ('-', digits));
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{digits}")
}

/// Write `body` padded to the placeholder's width.
fn pad(spec: &Spec, body: &str, out: &mut String) {
    let len = body.chars().count();
    if len >= spec.width {
        out.push_str(body);
        return;
    }
    let fill = spec.width - len;

    if spec.left {
        out.push_str(body);
        // Zero fill only applies on the left.
        let pad = if spec.pad == '0' { ' ' } else { spec.pad };
        out.extend(repeat_n(pad, fill));
    } else if spec.pad == '0'
        && matches!(spec.conversion, 'd' | 'e' | 'E' | 'f' | 'F')
        && (body.starts_with('-') || body.starts_with('+'))
    {
        let (sign, digits) = body.split_at(1);
        out.push_str(sign);
        out.extend(repeat_n('0', fill));
        out.push_str(digits);
    } else {
        out.extend(repeat_n(spec.pad, fill));
        out.push_str(body);
    }
}
