use crate::error::Error;
use indexmap::IndexMap;
use partition::{parse_with_prefix, Partition, PartitionMap};
use serde::Deserialize;
use std::path::Path;

/// Metadata key holding the document a partition was loaded from
pub const ORIGIN: &str = "origin";

/// Integer or string field of an input record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Int(u64),
    Text(String),
}

/// One partition record of an input document
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub address: Field,
    pub size: Field,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Entry {
    fn to_partition(&self, name: &str, origin: &str) -> Result<Partition, Error> {
        let size = match &self.size {
            Field::Int(v) => *v,
            Field::Text(s) => parse_with_prefix(s.trim())
                .ok_or_else(|| Error::InvalidSize(name.to_string(), s.clone()))?,
        };
        let address = match &self.address {
            Field::Int(v) => v.to_string(),
            Field::Text(s) => s.clone(),
        };

        let mut partition = Partition::new(size, &address);
        for (key, value) in &self.extra {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            partition = partition.meta(key, &value);
        }
        Ok(partition.meta(ORIGIN, origin))
    }
}

/// An input document and the partitions it declares, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub names: Vec<String>,
}

#[derive(Debug)]
pub struct Loaded {
    pub map: PartitionMap,
    pub documents: Vec<Document>,
}

/// Parse a document as YAML when its extension says so, JSON otherwise
pub fn parse(path: &str, text: &str) -> Result<IndexMap<String, Entry>, Error> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(text).map_err(|e| Error::Yaml(path.to_string(), e))
        }
        _ => serde_json::from_str(text).map_err(|e| Error::Json(path.to_string(), e)),
    }
}

pub fn read(path: &str) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            Error::FileOpen(path.to_string(), e)
        }
        _ => Error::FileRead(path.to_string(), e),
    })
}

/// Add the entries of one document to the map
pub fn merge(
    map: &mut PartitionMap,
    path: &str,
    entries: &IndexMap<String, Entry>,
) -> Result<Document, Error> {
    let mut names = vec![];
    for (name, entry) in entries {
        if let Some(prev) = map.get(name) {
            return Err(Error::DuplicatePartition {
                name: name.clone(),
                first: prev.metadata.get(ORIGIN).cloned().unwrap_or_default(),
                second: path.to_string(),
            });
        }
        map.insert(name, entry.to_partition(name, path)?)?;
        names.push(name.clone());
    }
    Ok(Document {
        path: path.to_string(),
        names,
    })
}

/// Read every document and merge them into a single map
pub fn load(paths: &[String]) -> Result<Loaded, Error> {
    let mut map = PartitionMap::new();
    let mut documents = vec![];
    for path in paths {
        let entries = parse(path, &read(path)?)?;
        documents.push(merge(&mut map, path, &entries)?);
    }
    Ok(Loaded { map, documents })
}
