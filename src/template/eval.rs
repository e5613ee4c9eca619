use crate::template::functions;
use crate::template::parser::{Command, Node, Operand, Pipeline};
use crate::template::TemplateError;
use serde_json::Value;

pub fn render_nodes(nodes: &[Node], context: &Value, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(pipeline) => out.push_str(&display(&eval_pipeline(pipeline, context)?)),
            Node::If {
                branches,
                otherwise,
            } => {
                let mut taken = None;
                for (condition, body) in branches {
                    if is_truthy(&eval_pipeline(condition, context)?) {
                        taken = Some(body);
                        break;
                    }
                }
                render_nodes(taken.unwrap_or(otherwise), context, out)?;
            }
        }
    }
    Ok(())
}

fn eval_pipeline(pipeline: &Pipeline, context: &Value) -> Result<Value, TemplateError> {
    let mut piped: Option<Value> = None;

    for command in &pipeline.commands {
        let value = match command {
            Command::Operand(operand) => eval_operand(operand, context)?,
            Command::Call { name, args } => {
                let mut values = args
                    .iter()
                    .map(|arg| eval_operand(arg, context))
                    .collect::<Result<Vec<_>, _>>()?;
                if let Some(previous) = piped.take() {
                    values.push(previous);
                }
                functions::call(name, values)?
            }
        };
        piped = Some(value);
    }

    Ok(piped.unwrap_or(Value::Null))
}

fn eval_operand(operand: &Operand, context: &Value) -> Result<Value, TemplateError> {
    match operand {
        Operand::Literal(value) => Ok(value.clone()),
        Operand::Pipeline(pipeline) => eval_pipeline(pipeline, context),
        Operand::Field(path) => lookup(context, path).cloned(),
    }
}

fn lookup<'a>(context: &'a Value, path: &[String]) -> Result<&'a Value, TemplateError> {
    let mut current = context;
    for (depth, key) in path.iter().enumerate() {
        current = current
            .as_object()
            .and_then(|map| map.get(key))
            .ok_or_else(|| TemplateError::UndefinedField(path[..=depth].join(".")))?;
    }
    Ok(current)
}

/// Zero values are false: null, false, 0, "", and empty collections.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a value as it appears in rendered output.
///
/// Numbers use their shortest form: `61`, `60.51`, never `61.0`.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_float(n.as_f64().unwrap_or_default())
            }
        }
        other => other.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
