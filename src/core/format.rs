//! printf-style message formatting
//!
//! Templates use the familiar `%` directives: `%d %i %u` integers,
//! `%f %F %e` floats, `%x %X %o %b` radix, `%s %v` display, `%q` quoted,
//! `%c` character, `%t` boolean and `%%` for a literal percent sign. Flags
//! `-`, `0`, `+` and space, a width and a `.precision` may precede the verb.
//!
//! Formatting never fails: a directive without a matching argument is
//! copied through verbatim, surplus arguments are ignored, and an unknown
//! verb is copied through without consuming an argument. A width or
//! precision above one million is also copied through verbatim; its
//! argument is still consumed so later directives stay aligned.

use super::event::Param;
use std::iter::Peekable;
use std::str::Chars;

const VERBS: &str = "diusvqfFexXobct";

/// Largest width or precision honored by a directive
const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Default)]
struct Directive {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    width: usize,
    precision: Option<usize>,
}

impl Directive {
    fn exceeds_limit(&self) -> bool {
        self.width > MAX_WIDTH || self.precision.is_some_and(|p| p > MAX_WIDTH)
    }
}

enum Rendered {
    Text(String),
    Number { magnitude: String, negative: bool },
}

/// Substitute `params` into `template`.
///
/// A template without params is returned unchanged, so messages containing
/// a bare `%` need no escaping unless they also carry arguments.
pub fn format_message(template: &str, params: &[Param]) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + 16 * params.len());
    let mut args = params.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut raw = String::from('%');
        let mut directive = Directive::default();

        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => directive.left = true,
                '0' => directive.zero = true,
                '+' => directive.plus = true,
                ' ' => directive.space = true,
                _ => break,
            }
            raw.push(flag);
            chars.next();
        }
        directive.width = take_number(&mut chars, &mut raw).unwrap_or(0);
        if chars.peek() == Some(&'.') {
            raw.push('.');
            chars.next();
            directive.precision = Some(take_number(&mut chars, &mut raw).unwrap_or(0));
        }

        let Some(verb) = chars.next() else {
            out.push_str(&raw);
            break;
        };
        if verb == '%' && raw.len() == 1 {
            out.push('%');
            continue;
        }
        raw.push(verb);

        if !VERBS.contains(verb) {
            out.push_str(&raw);
            continue;
        }
        match args.next() {
            Some(_) if directive.exceeds_limit() => out.push_str(&raw),
            Some(param) => out.push_str(&render(param, verb, &directive)),
            None => out.push_str(&raw),
        }
    }

    out
}

/// Escape line breaks and tabs so a message always occupies one line
pub fn sanitize_line(message: &str) -> String {
    if !message.contains(['\n', '\r', '\t']) {
        return message.to_string();
    }
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn take_number(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(&c) = chars.peek() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
        raw.push(c);
        chars.next();
    }
    value
}

fn as_float(param: &Param) -> Option<f64> {
    match param {
        Param::Float(v) => Some(*v),
        Param::Int(v) => Some(*v as f64),
        Param::Uint(v) => Some(*v as f64),
        _ => None,
    }
}

fn radix(value: u64, verb: char) -> String {
    match verb {
        'x' => format!("{:x}", value),
        'X' => format!("{:X}", value),
        'o' => format!("{:o}", value),
        _ => format!("{:b}", value),
    }
}

fn render(param: &Param, verb: char, directive: &Directive) -> String {
    let number = |magnitude: String, negative: bool| Rendered::Number {
        magnitude,
        negative,
    };

    let rendered = match verb {
        'd' | 'i' | 'u' => match param {
            Param::Int(v) => number(v.unsigned_abs().to_string(), *v < 0),
            Param::Uint(v) => number(v.to_string(), false),
            Param::Char(c) => number((*c as u32).to_string(), false),
            other => Rendered::Text(other.to_string()),
        },
        'f' | 'F' | 'e' => match as_float(param) {
            Some(v) => {
                let precision = directive.precision.unwrap_or(6);
                let magnitude = if verb == 'e' {
                    format!("{:.*e}", precision, v.abs())
                } else {
                    format!("{:.*}", precision, v.abs())
                };
                number(magnitude, v < 0.0)
            }
            None => Rendered::Text(param.to_string()),
        },
        'x' | 'X' | 'o' | 'b' => match param {
            Param::Int(v) => number(radix(v.unsigned_abs(), verb), *v < 0),
            Param::Uint(v) => number(radix(*v, verb), false),
            Param::Char(c) => number(radix(*c as u64, verb), false),
            Param::Str(s) if verb == 'x' => {
                Rendered::Text(s.bytes().map(|b| format!("{:02x}", b)).collect())
            }
            Param::Str(s) if verb == 'X' => {
                Rendered::Text(s.bytes().map(|b| format!("{:02X}", b)).collect())
            }
            other => Rendered::Text(other.to_string()),
        },
        'c' => match param {
            Param::Char(c) => Rendered::Text(c.to_string()),
            Param::Int(v) => Rendered::Text(
                u32::try_from(*v)
                    .ok()
                    .and_then(char::from_u32)
                    .map_or_else(|| v.to_string(), String::from),
            ),
            Param::Uint(v) => Rendered::Text(
                u32::try_from(*v)
                    .ok()
                    .and_then(char::from_u32)
                    .map_or_else(|| v.to_string(), String::from),
            ),
            other => Rendered::Text(other.to_string()),
        },
        'q' => match param {
            Param::Str(s) => Rendered::Text(format!("{:?}", s)),
            Param::Char(c) => Rendered::Text(format!("{:?}", c)),
            other => Rendered::Text(other.to_string()),
        },
        _ => {
            let mut text = param.to_string();
            if let (Some(precision), Param::Str(_)) = (directive.precision, param) {
                text = text.chars().take(precision).collect();
            }
            Rendered::Text(text)
        }
    };

    match rendered {
        Rendered::Text(text) => pad(text, directive),
        Rendered::Number {
            magnitude,
            negative,
        } => {
            let sign = if negative {
                "-"
            } else if directive.plus {
                "+"
            } else if directive.space {
                " "
            } else {
                ""
            };
            let len = sign.len() + magnitude.chars().count();
            if directive.zero && !directive.left && len < directive.width {
                format!("{}{}{}", sign, "0".repeat(directive.width - len), magnitude)
            } else {
                pad(format!("{}{}", sign, magnitude), directive)
            }
        }
    }
}

fn pad(text: String, directive: &Directive) -> String {
    let len = text.chars().count();
    if len >= directive.width {
        return text;
    }
    let fill = " ".repeat(directive.width - len);
    if directive.left {
        text + &fill
    } else {
        fill + &text
    }
}
