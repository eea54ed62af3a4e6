use crate::msg::Msg;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Cannot parse `{0}` as JSON")]
    Json(String, #[source] serde_json::Error),

    #[error("Cannot parse `{0}` as YAML")]
    Yaml(String, #[source] serde_yaml::Error),

    #[error("Cannot generate YAML map")]
    YamlEmit(#[source] serde_yaml::Error),

    #[error("Invalid size of `{0}`: `{1}`")]
    InvalidSize(String, String),

    #[error("Re-defined partition: `{name}`")]
    DuplicatePartition {
        name: String,
        first: String,
        second: String,
    },

    #[error("{err}")]
    Resolve {
        err: partition::Error,
        origin: Option<String>,
    },

    #[error(transparent)]
    Partition(#[from] partition::Error),
}

impl Error {
    /// Follow-up notes pointing at the input documents involved
    pub fn notes(&self) -> Vec<Msg> {
        match self {
            Error::DuplicatePartition {
                name,
                first,
                second,
            } => vec![
                Msg::Note(format!("`{}` is first defined in {}", name, first)),
                Msg::Note(format!("and defined again in {}", second)),
            ],
            Error::Resolve {
                err,
                origin: Some(origin),
            } => vec![Msg::Note(format!(
                "`{}` is defined in {}",
                err.partition(),
                origin
            ))],
            _ => vec![],
        }
    }

    /// Print the error, its causes and notes
    pub fn print_diag(&self) {
        Msg::Error(self.to_string()).print();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            Msg::Cause(cause.to_string()).print();
            source = std::error::Error::source(cause);
        }
        for note in self.notes() {
            note.print();
        }
    }
}
