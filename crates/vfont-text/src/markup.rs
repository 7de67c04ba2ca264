//! Inline text markup
//!
//! A single forward scan turns a string into styled runs:
//!
//! | Markup      | Effect                                         |
//! |-------------|------------------------------------------------|
//! | `~`         | toggles overbar                                |
//! | `~~`        | literal `~`                                    |
//! | `~{...}`    | overbarred group                               |
//! | `^{...}`    | superscript                                    |
//! | `_{...}`    | subscript                                      |
//! | `\t`        | tab stop, resets overbar and scripts           |
//! | `\n`        | line break                                     |
//!
//! A toggled overbar also ends at a space, `)` or an unmatched `}`; the
//! delimiter itself is not overbarred. Unclosed markup stays in effect
//! until the end of the string.

/// Glyph scale of super- and subscripts
pub const SCRIPT_SCALE: f32 = 0.8;

/// Superscript baseline shift, in glyph heights (negative is up)
pub const SUPERSCRIPT_OFFSET: f32 = -0.3;

/// Subscript baseline shift, in glyph heights
pub const SUBSCRIPT_OFFSET: f32 = 0.1;

/// Vertical script position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Script {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

impl Script {
    pub fn scale(self) -> f32 {
        match self {
            Script::Normal => 1.0,
            Script::Superscript | Script::Subscript => SCRIPT_SCALE,
        }
    }

    /// Baseline shift as a fraction of the glyph height
    pub fn offset_factor(self) -> f32 {
        match self {
            Script::Normal => 0.0,
            Script::Superscript => SUPERSCRIPT_OFFSET,
            Script::Subscript => SUBSCRIPT_OFFSET,
        }
    }
}

/// Style shared by every character of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub overbar: bool,
    pub script: Script,
}

impl RunStyle {
    pub fn scale(&self) -> f32 {
        self.script.scale()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyledToken {
    /// Consecutive characters sharing one style
    Run { text: String, style: RunStyle },
    Tab,
    LineBreak,
}

impl StyledToken {
    pub fn run(text: impl Into<String>, style: RunStyle) -> Self {
        StyledToken::Run {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Overbar,
    Script(Script),
}

#[derive(Default)]
struct Tokenizer {
    tokens: Vec<StyledToken>,
    run: String,
    run_style: RunStyle,
    overbar_toggle: bool,
    frames: Vec<Frame>,
}

impl Tokenizer {
    fn style(&self) -> RunStyle {
        RunStyle {
            overbar: self.overbar_toggle || self.frames.contains(&Frame::Overbar),
            script: self
                .frames
                .iter()
                .rev()
                .find_map(|frame| match frame {
                    Frame::Script(script) => Some(*script),
                    Frame::Overbar => None,
                })
                .unwrap_or_default(),
        }
    }

    fn push_char(&mut self, c: char) {
        let style = self.style();
        if style != self.run_style {
            self.flush();
            self.run_style = style;
        }
        self.run.push(c);
    }

    fn push_token(&mut self, token: StyledToken) {
        self.flush();
        self.tokens.push(token);
    }

    fn flush(&mut self) {
        if !self.run.is_empty() {
            let text = std::mem::take(&mut self.run);
            self.tokens.push(StyledToken::Run {
                text,
                style: self.run_style,
            });
        }
    }

    fn finish(mut self) -> Vec<StyledToken> {
        self.flush();
        self.tokens
    }
}

/// Split marked-up text into styled runs, tabs and line breaks
pub fn tokenize(text: &str) -> Vec<StyledToken> {
    let mut state = Tokenizer::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => {
                state.push_token(StyledToken::Tab);
                state.overbar_toggle = false;
                state.frames.clear();
            }
            '\n' => state.push_token(StyledToken::LineBreak),
            '\r' => {}
            '~' => match chars.peek() {
                Some('~') => {
                    chars.next();
                    state.push_char('~');
                }
                Some('{') => {
                    chars.next();
                    state.frames.push(Frame::Overbar);
                }
                _ => state.overbar_toggle = !state.overbar_toggle,
            },
            '^' | '_' if chars.peek() == Some(&'{') => {
                chars.next();
                let script = if c == '^' {
                    Script::Superscript
                } else {
                    Script::Subscript
                };
                state.frames.push(Frame::Script(script));
            }
            '}' if !state.frames.is_empty() => {
                state.frames.pop();
                state.overbar_toggle = false;
            }
            ' ' | ')' | '}' => {
                state.overbar_toggle = false;
                state.push_char(c);
            }
            _ => state.push_char(c),
        }
    }

    state.finish()
}

/// Number of text lines, counting `\n` separators
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Convert the backslash overbar notation used in pin names.
///
/// A character followed by `\` is overbarred; runs of such characters
/// become one `~{...}` group and literal tildes are escaped.
///
/// ```
/// use vfont_text::markup::convert_backslash_overbars;
///
/// assert_eq!(convert_backslash_overbars(r"R\E\S\E\T\"), "~{RESET}");
/// assert_eq!(convert_backslash_overbars(r"C\S\ 1"), "~{CS} 1");
/// ```
pub fn convert_backslash_overbars(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut in_group = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let marked = chars.peek() == Some(&'\\');
        if marked {
            chars.next();
        }

        if marked && !in_group {
            out.push_str("~{");
            in_group = true;
        } else if !marked && in_group {
            out.push('}');
            in_group = false;
        }

        if c == '~' {
            out.push_str("~~");
        } else {
            out.push(c);
        }
    }

    if in_group {
        out.push('}');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> RunStyle {
        RunStyle::default()
    }

    fn overbar() -> RunStyle {
        RunStyle {
            overbar: true,
            ..RunStyle::default()
        }
    }

    fn script(script: Script) -> RunStyle {
        RunStyle {
            script,
            ..RunStyle::default()
        }
    }

    #[test]
    fn test_toggled_overbar_is_one_run() {
        assert_eq!(tokenize("~AB~"), vec![StyledToken::run("AB", overbar())]);
    }

    #[test]
    fn test_double_tilde_is_literal() {
        assert_eq!(tokenize("a~~b"), vec![StyledToken::run("a~b", plain())]);
    }

    #[test]
    fn test_space_ends_toggled_overbar() {
        assert_eq!(
            tokenize("~EN A"),
            vec![StyledToken::run("EN", overbar()), StyledToken::run(" A", plain())]
        );
    }

    #[test]
    fn test_paren_ends_toggled_overbar() {
        assert_eq!(
            tokenize("(~CS)"),
            vec![
                StyledToken::run("(", plain()),
                StyledToken::run("CS", overbar()),
                StyledToken::run(")", plain()),
            ]
        );
    }

    #[test]
    fn test_overbar_group_keeps_spaces() {
        assert_eq!(
            tokenize("~{A B}C"),
            vec![StyledToken::run("A B", overbar()), StyledToken::run("C", plain())]
        );
    }

    #[test]
    fn test_super_and_subscript() {
        assert_eq!(
            tokenize("x^{2}y_{i}"),
            vec![
                StyledToken::run("x", plain()),
                StyledToken::run("2", script(Script::Superscript)),
                StyledToken::run("y", plain()),
                StyledToken::run("i", script(Script::Subscript)),
            ]
        );
    }

    #[test]
    fn test_overbar_inside_script() {
        let tokens = tokenize("V_{~{ref}}");
        assert_eq!(
            tokens[1],
            StyledToken::run(
                "ref",
                RunStyle {
                    overbar: true,
                    script: Script::Subscript
                }
            )
        );
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unclosed_markup_latches() {
        assert_eq!(
            tokenize("a^{bc"),
            vec![
                StyledToken::run("a", plain()),
                StyledToken::run("bc", script(Script::Superscript)),
            ]
        );
        assert_eq!(tokenize("~abc"), vec![StyledToken::run("abc", overbar())]);
    }

    #[test]
    fn test_unmatched_brace_is_literal() {
        assert_eq!(tokenize("a}b"), vec![StyledToken::run("a}b", plain())]);
    }

    #[test]
    fn test_caret_without_brace_is_literal() {
        assert_eq!(tokenize("2^8"), vec![StyledToken::run("2^8", plain())]);
    }

    #[test]
    fn test_tab_resets_state() {
        assert_eq!(
            tokenize("~a^{b\tc"),
            vec![
                StyledToken::run("a", overbar()),
                StyledToken::run(
                    "b",
                    RunStyle {
                        overbar: true,
                        script: Script::Superscript
                    }
                ),
                StyledToken::Tab,
                StyledToken::run("c", plain()),
            ]
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            tokenize("a\r\nb\n"),
            vec![
                StyledToken::run("a", plain()),
                StyledToken::LineBreak,
                StyledToken::run("b", plain()),
                StyledToken::LineBreak,
            ]
        );
        assert_eq!(line_count("a\r\nb\n"), 3);
        assert_eq!(line_count(""), 1);
    }

    #[test]
    fn test_convert_backslash_overbars() {
        assert_eq!(convert_backslash_overbars(r"R\E\S\E\T\"), "~{RESET}");
        assert_eq!(convert_backslash_overbars(r"~W\R\"), "~~~{WR}");
        assert_eq!(convert_backslash_overbars("GND"), "GND");
        assert_eq!(convert_backslash_overbars(r"A\B"), "~{A}B");
    }

    #[test]
    fn test_converted_pin_name_tokenizes_as_one_overbar() {
        let markup = convert_backslash_overbars(r"R\E\S\E\T\");
        assert_eq!(tokenize(&markup), vec![StyledToken::run("RESET", overbar())]);
    }
}
