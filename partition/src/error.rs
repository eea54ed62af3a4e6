use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed address of `{partition}`: `{text}`")]
    MalformedExpression { partition: String, text: String },

    #[error("Unknown partition: `{name}`{}", referenced_by(.referrer))]
    UnknownPartition {
        name: String,
        referrer: Option<String>,
    },

    #[error(
        "Negative address: `{partition}` = `{text}` (size 0x{size:X}) does not fit before `{target}` at 0x{target_address:X}"
    )]
    NegativeAddress {
        partition: String,
        text: String,
        target: String,
        target_address: u64,
        size: u64,
    },

    #[error("Address overflow: `{partition}` placed after `{target}`")]
    AddressOverflow { partition: String, target: String },

    #[error("Cyclic dependency: {} (`{}` = `{text}`)", arrows(.chain), head(.chain))]
    Cycle { chain: Vec<String>, text: String },

    #[error("Re-defined partition: `{name}`")]
    DuplicatePartition { name: String },

    #[error("Partition `{partition}` is not resolved")]
    Unresolved { partition: String },
}

impl Error {
    /// Name of the partition the failure was reported for
    pub fn partition(&self) -> &str {
        match self {
            Error::MalformedExpression { partition, .. } => partition,
            Error::UnknownPartition { name, referrer } => referrer.as_deref().unwrap_or(name),
            Error::NegativeAddress { partition, .. } => partition,
            Error::AddressOverflow { partition, .. } => partition,
            Error::Cycle { chain, .. } => head(chain),
            Error::DuplicatePartition { name } => name,
            Error::Unresolved { partition } => partition,
        }
    }
}

fn referenced_by(referrer: &Option<String>) -> String {
    match referrer {
        Some(name) => format!(" (referenced by `{}`)", name),
        None => String::new(),
    }
}

fn arrows(chain: &[String]) -> String {
    chain
        .iter()
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn head(chain: &[String]) -> &str {
    chain.first().map(|s| s.as_str()).unwrap_or("")
}
