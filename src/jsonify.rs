//! Normalizes the restricted JavaScript object literals emitted by the ARSO
//! archive into strict JSON text.
//!
//! The archive wraps every payload in an `AcademaPUJS.set(...)` assignment whose
//! argument is a JavaScript literal with unquoted keys and bare scalar tokens.
//! This module rewrites that dialect so `serde_json` can decode it: every bare
//! token is wrapped in double quotes, structural characters and existing string
//! boundaries pass through untouched.
//!
//! A consequence of the rewrite is that bare scalars (`1`, `true`, `14.51`)
//! surface as JSON *strings*; numeric interpretation happens later during value
//! decoding, which is also where unrecognized tokens become fatal.

/// Scanner state. A synthetic token is a bare scalar or identifier key the
/// scanner is currently wrapping in double quotes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Outside,
    InString(char),
    InToken,
}

/// Rewrites a quasi-JSON literal into strict JSON text.
///
/// This is a heuristic single-pass scanner for the narrow dialect the archive
/// emits, not a general JavaScript parser. It assumes bare tokens never contain
/// structural characters and that quote styles are not nested adversarially; a
/// payload that defeats those assumptions shows up downstream as a JSON decode
/// error and is treated as a protocol mismatch.
pub fn jsonify(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    let mut state = State::Outside;

    for c in input.chars() {
        match state {
            State::Outside => match c {
                '\'' | '"' => {
                    out.push(c);
                    state = State::InString(c);
                }
                '{' | '}' | '[' | ']' | '(' | ')' | ':' | ',' => out.push(c),
                ' ' => {}
                _ => {
                    out.push('"');
                    out.push(c);
                    state = State::InToken;
                }
            },
            State::InString(quote) => {
                // A quote of the other style is tolerated as literal content.
                out.push(c);
                if c == quote {
                    state = State::Outside;
                }
            }
            State::InToken => match c {
                // The double quote itself doubles as the token terminator.
                '"' => {
                    out.push('"');
                    state = State::Outside;
                }
                '{' | '}' | '[' | ']' | '(' | ')' | ':' | ',' => {
                    out.push('"');
                    out.push(c);
                    state = State::Outside;
                }
                ' ' => {}
                _ => out.push(c),
            },
        }
    }

    if state == State::InToken {
        out.push('"');
    }
    out
}
