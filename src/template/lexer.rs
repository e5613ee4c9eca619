use crate::template::TemplateError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `.A.B`; an empty path is the dot itself.
    Field(Vec<String>),
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Pipe,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(String),
    Action { tokens: Vec<Token>, position: usize },
}

/// Split a template into literal text and tokenized `{{ ... }}` actions,
/// applying `{{-` / `-}}` whitespace trimming on the way.
pub fn split(source: &str) -> Result<Vec<Item>, TemplateError> {
    let mut items = Vec::new();
    let mut pos = 0;

    while let Some(offset) = source[pos..].find("{{") {
        let open = pos + offset;
        let mut text = &source[pos..open];
        let mut inner = open + 2;

        if is_trim_marker(&source[inner..]) {
            text = text.trim_end();
            inner += 1;
        }
        if !text.is_empty() {
            items.push(Item::Text(text.to_string()));
        }

        let (tokens, end, trim_right) = lex_action(source, inner, open)?;
        items.push(Item::Action {
            tokens,
            position: open,
        });

        pos = end;
        if trim_right {
            let rest = &source[pos..];
            pos += rest.len() - rest.trim_start().len();
        }
    }

    if pos < source.len() {
        items.push(Item::Text(source[pos..].to_string()));
    }

    Ok(items)
}

fn is_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().map_or(false, char::is_whitespace)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Length in bytes of the identifier at the start of `rest`.
fn ident_len(rest: &str) -> usize {
    rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len())
}

fn lex_action(
    source: &str,
    start: usize,
    open: usize,
) -> Result<(Vec<Token>, usize, bool), TemplateError> {
    let mut tokens = Vec::new();
    let mut i = start;

    loop {
        let rest = &source[i..];
        let c = match rest.chars().next() {
            Some(c) => c,
            None => return Err(TemplateError::parse(open, "unclosed action")),
        };

        if c.is_whitespace() {
            let trimmed = rest.trim_start();
            let skipped = rest.len() - trimmed.len();
            if trimmed.starts_with("-}}") {
                return Ok((tokens, i + skipped + 3, true));
            }
            i += skipped;
            continue;
        }

        if rest.starts_with("}}") {
            return Ok((tokens, i + 2, false));
        }

        match c {
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '"' => {
                let (value, len) = lex_string(rest, i)?;
                tokens.push(Token::Str(value));
                i += len;
            }
            '.' => {
                let (path, len) = lex_field(rest);
                tokens.push(Token::Field(path));
                i += len;
            }
            c if c == '-' || c.is_ascii_digit() => {
                let (token, len) = lex_number(rest, i)?;
                tokens.push(token);
                i += len;
            }
            c if is_ident_start(c) => {
                let len = ident_len(rest);
                tokens.push(Token::Ident(rest[..len].to_string()));
                i += len;
            }
            other => {
                return Err(TemplateError::parse(
                    i,
                    format!("unexpected character {:?}", other),
                ))
            }
        }
    }
}

fn lex_string(rest: &str, position: usize) -> Result<(String, usize), TemplateError> {
    let mut value = String::new();
    let mut chars = rest.char_indices().skip(1);

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((value, idx + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, other)) => {
                    return Err(TemplateError::parse(
                        position + idx,
                        format!("unknown escape \\{}", other),
                    ))
                }
                None => break,
            },
            c => value.push(c),
        }
    }

    Err(TemplateError::parse(position, "unterminated string"))
}

fn lex_field(rest: &str) -> (Vec<String>, usize) {
    let mut path = Vec::new();
    let mut len = 0;

    while rest[len..].starts_with('.') {
        let name_len = ident_len(&rest[len + 1..]);
        let starts_ident = rest[len + 1..].chars().next().map_or(false, is_ident_start);
        if name_len == 0 || !starts_ident {
            break;
        }
        path.push(rest[len + 1..len + 1 + name_len].to_string());
        len += 1 + name_len;
    }

    if path.is_empty() {
        len = 1;
    }

    (path, len)
}

fn lex_number(rest: &str, position: usize) -> Result<(Token, usize), TemplateError> {
    let len = rest
        .char_indices()
        .find(|&(idx, c)| !(c.is_ascii_digit() || c == '.' || (idx == 0 && c == '-')))
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    let literal = &rest[..len];

    let token = if literal.contains('.') {
        literal.parse::<f64>().ok().map(Token::Float)
    } else {
        literal.parse::<i64>().ok().map(Token::Int)
    };

    token
        .map(|t| (t, len))
        .ok_or_else(|| TemplateError::parse(position, format!("invalid number {:?}", literal)))
}
