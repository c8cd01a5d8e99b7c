//! Expression typesetting
//!
//! The renderer and the formula inputs never draw expression sources
//! directly; they hand them to a [`Typesetter`] together with a target
//! [`Node`], the same way a web page hands a TeX string and a DOM element to
//! a math library. A typesetter that fails, or that leaves the node without
//! any glyphs, signals that the expression cannot be displayed.
//!
//! [`TexTypesetter`] is the built-in implementation: it understands the TeX
//! math subset used by the prover notation (`\Box`, `\to`, `|p|_{i}`, ...)
//! and lays it out as styled Unicode glyphs suitable for a terminal.

pub mod lexer;
pub mod symbols;

use lexer::{Lexer, Token};
use symbols::SymbolClass;
use thiserror::Error;

/// Errors reported by a [`Typesetter`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesetError {
    #[error("unexpected end of input after '\\' at column {column}")]
    TrailingBackslash { column: usize },

    #[error("unknown command '\\{name}' at column {column}")]
    UnknownCommand { name: String, column: usize },

    #[error("group opened at column {column} is never closed")]
    UnclosedGroup { column: usize },

    #[error("unexpected '}}' at column {column}")]
    UnexpectedClose { column: usize },

    #[error("missing argument for '{marker}' at column {column}")]
    MissingArgument { marker: String, column: usize },

    #[error("nesting deeper than {limit} levels at column {column}")]
    TooDeep { limit: usize, column: usize },
}

/// Deepest nesting of groups, arguments and delimiters the layout accepts
pub const MAX_DEPTH: usize = 256;

/// Vertical placement of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Script {
    #[default]
    Normal,
    Sub,
    Sup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphStyle {
    pub bold: bool,
    pub italic: bool,
    pub script: Script,
}

/// One rendered unit of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub text: String,
    pub style: GlyphStyle,
}

/// Target container a typesetter renders into.
///
/// A node with no glyphs has no visible output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    glyphs: Vec<Glyph>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rendered glyphs
    pub fn child_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }

    pub fn push(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The rendered text with styling dropped
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.text.as_str()).collect()
    }
}

/// Capability that renders an expression source into a [`Node`].
pub trait Typesetter {
    fn typeset(&self, source: &str, target: &mut Node) -> Result<(), TypesetError>;
}

impl<T: Typesetter + ?Sized> Typesetter for &T {
    fn typeset(&self, source: &str, target: &mut Node) -> Result<(), TypesetError> {
        (**self).typeset(source, target)
    }
}

/// Typesets TeX math into Unicode glyphs.
///
/// On error the target node is left empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexTypesetter;

impl Typesetter for TexTypesetter {
    fn typeset(&self, source: &str, target: &mut Node) -> Result<(), TypesetError> {
        target.clear();

        let tokens = Lexer::new(source).tokenize()?;
        let mut layout = Layout::new(&tokens);
        layout.sequence(Mode::default(), None)?;

        for glyph in layout.glyphs {
            target.push(glyph);
        }
        Ok(())
    }
}

/// Font state while walking a group
#[derive(Debug, Clone, Copy, Default)]
struct Mode {
    bold: bool,
    upright: bool,
    script: Script,
}

impl Mode {
    fn with_script(self, script: Script) -> Self {
        Mode { script, ..self }
    }

    fn glyph_style(self, italic: bool) -> GlyphStyle {
        GlyphStyle {
            bold: self.bold,
            italic: italic && !self.upright,
            script: self.script,
        }
    }
}

struct Layout<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
    glyphs: Vec<Glyph>,
}

impl<'a> Layout<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            glyphs: Vec::new(),
        }
    }

    fn advance(&mut self) -> Token {
        let token = match self.tokens.get(self.position) {
            Some(token) => token.clone(),
            None => Token::Eof(self.tokens.last().map(Token::column).unwrap_or(1)),
        };
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Runs `step` one nesting level deeper, refusing past [`MAX_DEPTH`]
    fn nested<F>(&mut self, column: usize, step: F) -> Result<(), TypesetError>
    where
        F: FnOnce(&mut Self) -> Result<(), TypesetError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(TypesetError::TooDeep {
                limit: MAX_DEPTH,
                column,
            });
        }
        self.depth += 1;
        let result = step(self);
        self.depth -= 1;
        result
    }

    /// Lays out tokens until end of input, or until the `}` closing the group
    /// opened at column `open`.
    fn sequence(&mut self, mut mode: Mode, open: Option<usize>) -> Result<(), TypesetError> {
        loop {
            match self.advance() {
                Token::Eof(_) => {
                    return match open {
                        Some(column) => Err(TypesetError::UnclosedGroup { column }),
                        None => Ok(()),
                    };
                }
                Token::RBrace(column) => {
                    return match open {
                        Some(_) => Ok(()),
                        None => Err(TypesetError::UnexpectedClose { column }),
                    };
                }
                Token::LBrace(column) => {
                    self.nested(column, |layout| layout.sequence(mode, Some(column)))?
                }
                Token::Subscript(column) => {
                    self.argument(mode.with_script(Script::Sub), "_", column)?
                }
                Token::Superscript(column) => {
                    self.argument(mode.with_script(Script::Sup), "^", column)?
                }
                Token::Command(name, column) => {
                    // `{\bf k:}` switches the font for the rest of the group
                    if let Some(switched) = switch(&name, mode) {
                        mode = switched;
                    } else {
                        self.command(&name, column, mode)?;
                    }
                }
                Token::Char(c, _) => self.char(c, mode),
            }
        }
    }

    /// A single atom or a braced group, as taken by scripts and font commands
    fn argument(&mut self, mode: Mode, marker: &str, column: usize) -> Result<(), TypesetError> {
        self.nested(column, |layout| layout.argument_body(mode, marker, column))
    }

    fn argument_body(&mut self, mode: Mode, marker: &str, column: usize) -> Result<(), TypesetError> {
        match self.advance() {
            Token::LBrace(open) => self.sequence(mode, Some(open)),
            Token::Char(c, _) => {
                self.char(c, mode);
                Ok(())
            }
            Token::Command(name, at) => self.command(&name, at, mode),
            _ => Err(TypesetError::MissingArgument {
                marker: marker.to_string(),
                column,
            }),
        }
    }

    fn command(&mut self, name: &str, column: usize, mode: Mode) -> Result<(), TypesetError> {
        if let Some(space) = symbols::spacing(name) {
            if !space.is_empty() {
                self.push(space.to_string(), mode.glyph_style(false));
            }
            return Ok(());
        }

        match name {
            "mathbf" | "textbf" | "boldsymbol" => {
                let bold = Mode { bold: true, ..mode };
                return self.argument(bold, name, column);
            }
            "mathrm" | "textrm" | "text" | "mathsf" | "mathtt" | "operatorname" => {
                let upright = Mode { upright: true, ..mode };
                return self.argument(upright, name, column);
            }
            "left" | "right" | "bigl" | "bigr" | "big" | "Big" => {
                return self.delimiter(name, column, mode);
            }
            "{" | "}" | "_" | "#" | "%" | "&" | "$" => {
                self.push(name.to_string(), mode.glyph_style(false));
                return Ok(());
            }
            "|" => {
                self.push("‖".to_string(), mode.glyph_style(false));
                return Ok(());
            }
            "\\" => {
                self.push(" ".to_string(), mode.glyph_style(false));
                return Ok(());
            }
            _ => {}
        }

        // A font switch in argument position has nothing left to apply to
        if switch(name, mode).is_some() {
            return Ok(());
        }

        let (text, class) = symbols::lookup(name).ok_or_else(|| TypesetError::UnknownCommand {
            name: name.to_string(),
            column,
        })?;
        self.symbol(text, class, mode);
        Ok(())
    }

    fn delimiter(&mut self, name: &str, column: usize, mode: Mode) -> Result<(), TypesetError> {
        match self.advance() {
            Token::Char(c, _) => {
                self.push(c.to_string(), mode.glyph_style(false));
                Ok(())
            }
            Token::Command(ref delim, _) if delim == "." => Ok(()),
            Token::Command(delim, at) => {
                self.nested(at, |layout| layout.command(&delim, at, mode))
            }
            _ => Err(TypesetError::MissingArgument {
                marker: format!("\\{}", name),
                column,
            }),
        }
    }

    fn symbol(&mut self, text: &str, class: SymbolClass, mode: Mode) {
        let text = match (class, mode.script) {
            (SymbolClass::Binary, Script::Normal) => format!(" {} ", text),
            _ => text.to_string(),
        };
        self.push(text, mode.glyph_style(false));
    }

    fn char(&mut self, c: char, mode: Mode) {
        let mapped = match mode.script {
            Script::Sub => symbols::subscript(c).unwrap_or(c),
            Script::Sup => symbols::superscript(c).unwrap_or(c),
            Script::Normal if c == '\'' => '′',
            Script::Normal => c,
        };

        let text = match (mapped, mode.script) {
            ('=' | '<' | '>', Script::Normal) => format!(" {} ", mapped),
            (',', Script::Normal) => ", ".to_string(),
            _ => mapped.to_string(),
        };

        self.push(text, mode.glyph_style(c.is_alphabetic()));
    }

    fn push(&mut self, text: String, style: GlyphStyle) {
        self.glyphs.push(Glyph { text, style });
    }
}

/// Font switch commands that restyle the rest of the enclosing group.
fn switch(name: &str, mode: Mode) -> Option<Mode> {
    match name {
        "bf" | "boldmath" => Some(Mode { bold: true, ..mode }),
        "rm" => Some(Mode {
            upright: true,
            ..mode
        }),
        "it" => Some(Mode {
            upright: false,
            ..mode
        }),
        "displaystyle" | "textstyle" => Some(mode),
        _ => None,
    }
}
