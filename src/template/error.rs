use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("undefined field .{0}")]
    UndefinedField(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("{function}: {message}")]
    Arguments { function: String, message: String },
}

impl TemplateError {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        TemplateError::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn arguments(function: &str, message: impl Into<String>) -> Self {
        TemplateError::Arguments {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
