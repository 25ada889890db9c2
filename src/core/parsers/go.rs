use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::core::error::ParseError;

/// Underlying shape of a top-level `type` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// `type T struct { ... }`
    Struct,
    /// `type T interface { ... }`
    Interface,
    /// `type T = U`
    Alias,
    /// Any other named type: `type T int`, `type T []U`, `type T func()`.
    Other,
}

/// A top-level type declaration found in a Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub shape: TypeShape,
    /// Declared with type parameters (`type Box[T any] struct{}`).
    pub generic: bool,
}

impl Declaration {
    pub fn is_struct(&self) -> bool {
        self.shape == TypeShape::Struct
    }

    /// Go's visibility rule: exported iff the first character is an uppercase letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// The parsed form of one Go file that the generator cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGoFile {
    /// Name from the `package` clause, if the file has one.
    pub package: Option<String>,
    /// Top-level type declarations, in source order.
    pub declarations: Vec<Declaration>,
    /// Build constraints keep the file out of every build (`//go:build ignore`).
    pub ignored: bool,
}

/// Parse Go source text into a syntax tree, rejecting malformed input.
///
/// tree-sitter recovers from errors by inserting ERROR and MISSING nodes;
/// any such node makes the whole file invalid here.
pub fn parse_go_tree(code: &str, file_path: &Path) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::language())?;

    let tree = parser
        .parse(code, None)
        .ok_or_else(|| ParseError::NoTree(file_path.to_path_buf()))?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error_node(root).unwrap_or(root);
        let pos = bad.start_position();
        let message = if bad.is_missing() {
            format!("missing '{}'", bad.kind())
        } else {
            let snippet = bad
                .utf8_text(code.as_bytes())
                .unwrap_or_default()
                .lines()
                .next()
                .unwrap_or_default()
                .trim();
            format!("unexpected '{}'", snippet)
        };
        return Err(ParseError::Syntax {
            path: file_path.to_path_buf(),
            line: pos.row + 1,
            col: pos.column + 1,
            message,
        });
    }

    Ok(tree)
}

/// Parse a Go source string and collect its package clause and top-level types.
pub fn parse_go_source(code: &str, file_path: &Path) -> Result<ParsedGoFile, ParseError> {
    let tree = parse_go_tree(code, file_path)?;
    let root = tree.root_node();
    let source = code.as_bytes();

    let mut package = None;
    let mut declarations = Vec::new();
    let mut header = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            // Build constraints only count above the package clause.
            "comment" if package.is_none() => {
                if let Ok(text) = child.utf8_text(source) {
                    header.push(text.trim_end());
                }
            }
            "package_clause" => {
                package = find_child_by_kind(child, "package_identifier")
                    .and_then(|ident| ident.utf8_text(source).ok())
                    .map(str::to_string);
            }
            "type_declaration" => collect_type_declaration(child, source, &mut declarations),
            _ => {}
        }
    }

    Ok(ParsedGoFile {
        package,
        declarations,
        ignored: excluded_by_constraints(&header),
    })
}

/// Whether the header comments carry a build constraint that no build satisfies.
///
/// No target platform is modelled: every tag counts as set except `ignore`,
/// the conventional tag for files kept out of the package. A `//go:build`
/// line takes precedence over legacy `// +build` lines. Malformed
/// expressions leave the file in.
fn excluded_by_constraints(header: &[&str]) -> bool {
    let go_build = header
        .iter()
        .find_map(|line| constraint_body(line.strip_prefix("//go:build")?));
    if let Some(expr) = go_build {
        return eval_build_expr(expr) == Some(false);
    }

    header
        .iter()
        .filter_map(|line| {
            let rest = line.strip_prefix("//")?.trim_start().strip_prefix("+build")?;
            constraint_body(rest)
        })
        .any(|line| !eval_plus_build(line))
}

fn constraint_body(rest: &str) -> Option<&str> {
    (rest.is_empty() || rest.starts_with([' ', '\t'])).then(|| rest.trim())
}

fn tag_is_set(tag: &str) -> bool {
    tag != "ignore"
}

/// `// +build a,b !c`: space-separated options are OR'ed, comma-joined terms AND'ed.
fn eval_plus_build(line: &str) -> bool {
    let mut options = line.split_whitespace().peekable();
    if options.peek().is_none() {
        return true;
    }
    options.any(|option| {
        option.split(',').all(|term| match term.strip_prefix('!') {
            Some(tag) => !tag_is_set(tag),
            None => tag_is_set(term),
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    LParen,
    RParen,
    Not,
    And,
    Or,
    Tag(&'a str),
}

fn tokenize(expr: &str) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut rest = expr.trim();
    while let Some(first) = rest.chars().next() {
        let (token, len) = match first {
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            '!' => (Token::Not, 1),
            '&' if rest.starts_with("&&") => (Token::And, 2),
            '|' if rest.starts_with("||") => (Token::Or, 2),
            _ => {
                let len = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
                    .unwrap_or(rest.len());
                if len == 0 {
                    return None;
                }
                (Token::Tag(&rest[..len]), len)
            }
        };
        tokens.push(token);
        rest = rest[len..].trim_start();
    }
    Some(tokens)
}

/// Evaluate a `//go:build` expression; `None` when it does not parse.
fn eval_build_expr(expr: &str) -> Option<bool> {
    let tokens = tokenize(expr)?;
    let mut parser = ExprParser {
        tokens: &tokens,
        pos: 0,
    };
    let value = parser.or_expr()?;
    (parser.pos == tokens.len()).then_some(value)
}

/// Recursive descent over `||`, `&&`, `!` and parentheses, loosest first.
struct ExprParser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'a> ExprParser<'_, 'a> {
    fn eat(&mut self, token: Token<'a>) -> bool {
        let matched = self.tokens.get(self.pos) == Some(&token);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn or_expr(&mut self) -> Option<bool> {
        let mut value = self.and_expr()?;
        while self.eat(Token::Or) {
            value |= self.and_expr()?;
        }
        Some(value)
    }

    fn and_expr(&mut self) -> Option<bool> {
        let mut value = self.unary()?;
        while self.eat(Token::And) {
            value &= self.unary()?;
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<bool> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        match token {
            Token::Not => self.unary().map(|value| !value),
            Token::LParen => {
                let value = self.or_expr()?;
                self.eat(Token::RParen).then_some(value)
            }
            Token::Tag(tag) => Some(tag_is_set(tag)),
            _ => None,
        }
    }
}

/// A `type_declaration` holds one spec, or a parenthesized group of them.
fn collect_type_declaration(node: Node, source: &[u8], out: &mut Vec<Declaration>) {
    let mut cursor = node.walk();
    for spec in node.children(&mut cursor) {
        let is_alias = match spec.kind() {
            "type_spec" => false,
            "type_alias" => true,
            _ => continue,
        };

        let Some(name) = spec
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
        else {
            continue;
        };

        let shape = if is_alias {
            TypeShape::Alias
        } else {
            match spec.child_by_field_name("type").map(|t| t.kind()) {
                Some("struct_type") => TypeShape::Struct,
                Some("interface_type") => TypeShape::Interface,
                _ => TypeShape::Other,
            }
        };

        out.push(Declaration {
            name: name.to_string(),
            shape,
            generic: spec.child_by_field_name("type_parameters").is_some(),
        });
    }
}

pub(crate) fn find_child_by_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error_node(node: Node) -> Option<Node> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.is_error() || current.is_missing() {
            return Some(current);
        }
        if !current.has_error() {
            continue;
        }
        for i in (0..current.child_count()).rev() {
            if let Some(child) = current.child(i) {
                stack.push(child);
            }
        }
    }
    None
}
