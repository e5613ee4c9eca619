use crate::template::functions;
use crate::template::lexer::{Item, Token};
use crate::template::TemplateError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Action(Pipeline),
    If {
        branches: Vec<(Pipeline, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Call { name: String, args: Vec<Operand> },
    Operand(Operand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(Vec<String>),
    Literal(Value),
    Pipeline(Box<Pipeline>),
}

enum Terminator {
    Else(Option<Pipeline>),
    End,
}

const KEYWORDS: [&str; 3] = ["if", "else", "end"];

pub fn parse(items: Vec<Item>) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        items: items.into_iter(),
    };
    let (nodes, terminator) = parser.parse_list()?;
    match terminator {
        None => Ok(nodes),
        Some((_, position)) => Err(TemplateError::parse(
            position,
            "`else` or `end` without matching `if`",
        )),
    }
}

struct Parser {
    items: std::vec::IntoIter<Item>,
}

impl Parser {
    fn parse_list(&mut self) -> Result<(Vec<Node>, Option<(Terminator, usize)>), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(item) = self.items.next() {
            let (tokens, position) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { tokens, position } => (tokens, position),
            };

            match tokens.first() {
                None => return Err(TemplateError::parse(position, "empty action")),
                Some(Token::Ident(word)) if word == "if" => {
                    let condition = parse_tokens(&tokens[1..], position)?;
                    nodes.push(self.parse_if(condition, position)?);
                }
                Some(Token::Ident(word)) if word == "else" => {
                    let condition = match tokens.get(1) {
                        None => None,
                        Some(Token::Ident(next)) if next == "if" => {
                            Some(parse_tokens(&tokens[2..], position)?)
                        }
                        Some(_) => {
                            return Err(TemplateError::parse(position, "unexpected token after `else`"))
                        }
                    };
                    return Ok((nodes, Some((Terminator::Else(condition), position))));
                }
                Some(Token::Ident(word)) if word == "end" => {
                    if tokens.len() > 1 {
                        return Err(TemplateError::parse(position, "unexpected token after `end`"));
                    }
                    return Ok((nodes, Some((Terminator::End, position))));
                }
                Some(_) => nodes.push(Node::Action(parse_tokens(&tokens, position)?)),
            }
        }

        Ok((nodes, None))
    }

    fn parse_if(&mut self, condition: Pipeline, position: usize) -> Result<Node, TemplateError> {
        let mut branches = Vec::new();
        let mut condition = condition;

        loop {
            let (body, terminator) = self.parse_list()?;
            match terminator {
                Some((Terminator::Else(Some(next)), _)) => {
                    branches.push((condition, body));
                    condition = next;
                }
                Some((Terminator::Else(None), _)) => {
                    branches.push((condition, body));
                    let (otherwise, terminator) = self.parse_list()?;
                    return match terminator {
                        Some((Terminator::End, _)) => Ok(Node::If { branches, otherwise }),
                        Some((_, at)) => Err(TemplateError::parse(at, "expected `end` after `else`")),
                        None => Err(TemplateError::parse(position, "unclosed `if`")),
                    };
                }
                Some((Terminator::End, _)) => {
                    branches.push((condition, body));
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                    });
                }
                None => return Err(TemplateError::parse(position, "unclosed `if`")),
            }
        }
    }
}

fn parse_tokens(tokens: &[Token], position: usize) -> Result<Pipeline, TemplateError> {
    let mut cursor = Cursor {
        tokens,
        index: 0,
        position,
    };
    let pipeline = cursor.pipeline()?;
    if cursor.index < tokens.len() {
        return Err(cursor.error("unexpected token"));
    }
    Ok(pipeline)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    index: usize,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn error(&self, message: &str) -> TemplateError {
        let found = self
            .peek()
            .map(|t| format!("{:?}", t))
            .unwrap_or_else(|| "end of action".to_string());
        TemplateError::parse(self.position, format!("{} ({})", message, found))
    }

    fn pipeline(&mut self) -> Result<Pipeline, TemplateError> {
        let mut commands = vec![self.command()?];

        while let Some(Token::Pipe) = self.peek() {
            self.index += 1;
            let command = self.command()?;
            if let Command::Operand(_) = command {
                return Err(TemplateError::parse(
                    self.position,
                    "only functions can receive piped values",
                ));
            }
            commands.push(command);
        }

        Ok(Pipeline { commands })
    }

    fn command(&mut self) -> Result<Command, TemplateError> {
        match self.peek() {
            Some(Token::Ident(name)) if !is_literal_word(name) => {
                if KEYWORDS.contains(&name.as_str()) {
                    return Err(self.error("unexpected keyword"));
                }
                if !functions::is_known(name) {
                    return Err(TemplateError::UnknownFunction(name.clone()));
                }
                self.index += 1;

                let mut args = Vec::new();
                while self.starts_operand() {
                    args.push(self.operand()?);
                }
                Ok(Command::Call {
                    name: name.clone(),
                    args,
                })
            }
            _ => {
                let operand = self.operand()?;
                if self.starts_operand() {
                    return Err(self.error("unexpected operand"));
                }
                Ok(Command::Operand(operand))
            }
        }
    }

    fn starts_operand(&self) -> bool {
        match self.peek() {
            Some(Token::Pipe) | Some(Token::RParen) | None => false,
            Some(Token::Ident(name)) => is_literal_word(name) || !KEYWORDS.contains(&name.as_str()),
            Some(_) => true,
        }
    }

    fn operand(&mut self) -> Result<Operand, TemplateError> {
        let token = self.peek().ok_or_else(|| self.error("missing operand"))?;
        let operand = match token {
            Token::Field(path) => Operand::Field(path.clone()),
            Token::Str(value) => Operand::Literal(Value::String(value.clone())),
            Token::Int(value) => Operand::Literal(Value::from(*value)),
            Token::Float(value) => Operand::Literal(Value::from(*value)),
            Token::Ident(word) if word == "true" => Operand::Literal(Value::Bool(true)),
            Token::Ident(word) if word == "false" => Operand::Literal(Value::Bool(false)),
            Token::Ident(_) => return Err(self.error("functions used as arguments need parentheses")),
            Token::LParen => {
                self.index += 1;
                let inner = self.pipeline()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.error("expected `)`"));
                }
                Operand::Pipeline(Box::new(inner))
            }
            Token::RParen | Token::Pipe => return Err(self.error("missing operand")),
        };
        self.index += 1;
        Ok(operand)
    }
}

fn is_literal_word(word: &str) -> bool {
    word == "true" || word == "false"
}
