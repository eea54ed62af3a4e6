use crate::error::Error;
use crate::loader::Document;
use crate::msg::Msg;
use indexmap::IndexMap;
use partition::{parse_with_prefix, PartitionMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

pub const FLASH_BASE_ADDRESS: &str = "CONFIG_FLASH_BASE_ADDRESS";

/// A generated file, rendered but not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub path: PathBuf,
    pub text: String,
}

/// Override definitions for the partitions of one document.
///
/// Every partition gets its own `#undef`/`#define` pair in declaration
/// order, so the last partition of the document sets the effective value.
pub fn render(map: &PartitionMap, names: &[String]) -> Result<String, Error> {
    let mut text = String::new();
    for name in names {
        let addr = map.address(name).ok_or_else(|| partition::Error::Unresolved {
            partition: name.clone(),
        })?;
        text.push_str(&format!("/* {} */\n", name));
        text.push_str(&format!("#undef {}\n", FLASH_BASE_ADDRESS));
        text.push_str(&format!("#define {} 0x{:X}\n", FLASH_BASE_ADDRESS, addr));
    }
    Ok(text)
}

/// One header per document, stored next to the document as `output`
pub fn headers(
    documents: &[Document],
    map: &PartitionMap,
    output: &str,
) -> Result<Vec<Generated>, Error> {
    documents
        .iter()
        .map(|doc| -> Result<Generated, Error> {
            let dir = Path::new(&doc.path).parent().unwrap_or(Path::new(""));
            Ok(Generated {
                path: dir.join(output),
                text: render(map, &doc.names)?,
            })
        })
        .collect()
}

/// Definitions that get overridden within the generated headers
pub fn warnings(documents: &[Document], files: &[Generated]) -> Vec<Msg> {
    let mut msgs = vec![];
    let mut seen: IndexMap<&Path, &str> = IndexMap::new();
    for (doc, file) in documents.iter().zip(files) {
        if let [.., last] = doc.names.as_slice() {
            if doc.names.len() > 1 {
                msgs.push(Msg::Warn(format!(
                    "{} declares {} partitions, {} takes `{}`",
                    doc.path,
                    doc.names.len(),
                    FLASH_BASE_ADDRESS,
                    last
                )));
            }
        }
        if let Some(prev) = seen.insert(&file.path, &doc.path) {
            msgs.push(Msg::Warn(format!(
                "{} is generated for both {} and {}, the latter is kept",
                file.path.display(),
                prev,
                doc.path
            )));
        }
    }
    msgs
}

// ----------------------------------------------------------------------------
// Resolved map

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex")]
    pub addr: u64,
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex")]
    pub size: u64,
}

fn to_hex<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{:x}", value))
}

fn from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_with_prefix(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid integer: `{}`", text)))
}

/// Resolved map as YAML, addresses and sizes in hex
pub fn to_yaml(map: &PartitionMap) -> Result<String, Error> {
    let entries: IndexMap<&str, MapEntry> = map
        .resolved()?
        .into_iter()
        .map(|(name, (addr, size))| (name, MapEntry { addr, size }))
        .collect();
    serde_yaml::to_string(&entries).map_err(Error::YamlEmit)
}

// ----------------------------------------------------------------------------
// Output

fn staging(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn stage(file: &Generated) -> Result<PathBuf, Error> {
    use std::io::Write;
    let tmp = staging(&file.path);
    let name = file.path.display().to_string();
    let mut out = std::fs::File::create(&tmp).map_err(|e| Error::FileCreate(name.clone(), e))?;
    out.write_all(file.text.as_bytes())
        .map_err(|e| Error::FileWrite(name, e))?;
    Ok(tmp)
}

/// Write every file, or none of them.
///
/// Each file is first written next to its target under a temporary name,
/// then all of them are renamed in place. Files sharing a path keep the
/// last one.
pub fn write(files: &[Generated]) -> Result<(), Error> {
    let mut targets: IndexMap<&Path, &Generated> = IndexMap::new();
    for file in files {
        targets.insert(&file.path, file);
    }

    let mut staged = vec![];
    for file in targets.values() {
        match stage(file) {
            Ok(tmp) => staged.push((tmp, &file.path)),
            Err(err) => {
                let _ = std::fs::remove_file(staging(&file.path));
                for (tmp, _) in &staged {
                    let _ = std::fs::remove_file(tmp);
                }
                return Err(err);
            }
        }
    }

    for (idx, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            for (_, done) in staged.iter().take(idx) {
                let _ = std::fs::remove_file(done);
            }
            for (tmp, _) in staged.iter().skip(idx) {
                let _ = std::fs::remove_file(tmp);
            }
            return Err(Error::FileWrite(path.display().to_string(), e));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pmgen-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
