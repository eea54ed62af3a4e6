use crate::error::Error;
use indexmap::IndexMap;

/// Resolution state of a partition address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Unresolved(String),
    /// On the resolver's stack. Holds the expression currently being evaluated.
    Resolving(String),
    Resolved(u64),
}

impl Address {
    pub fn value(&self) -> Option<u64> {
        match self {
            Address::Resolved(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub size: u64,
    pub address: Address,
    /// Passthrough fields, never read by the resolver
    pub metadata: IndexMap<String, String>,
}

impl Partition {
    pub fn new(size: u64, address: &str) -> Self {
        Self {
            size,
            address: Address::Unresolved(address.to_string()),
            metadata: IndexMap::new(),
        }
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Partitions by name, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionMap(IndexMap<String, Partition>);

impl PartitionMap {
    pub fn new() -> Self {
        PartitionMap(IndexMap::new())
    }

    pub fn insert(&mut self, name: &str, partition: Partition) -> Result<(), Error> {
        if self.0.contains_key(name) {
            return Err(Error::DuplicatePartition {
                name: name.to_string(),
            });
        }
        self.0.insert(name.to_string(), partition);
        Ok(())
    }

    /// Builder form of `insert`
    pub fn with(mut self, name: &str, size: u64, address: &str) -> Result<Self, Error> {
        self.insert(name, Partition::new(size, address))?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Partition> {
        self.0.get(name)
    }

    pub(crate) fn set_address(&mut self, name: &str, address: Address) {
        if let Some(entry) = self.0.get_mut(name) {
            entry.address = address;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Partition)> {
        self.0.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|name| name.as_str())
    }

    pub fn address(&self, name: &str) -> Option<u64> {
        self.0.get(name).and_then(|p| p.address.value())
    }

    pub fn is_resolved(&self) -> bool {
        self.0.values().all(|p| p.address.value().is_some())
    }

    /// name -> (address, size), only once every partition is resolved
    pub fn resolved(&self) -> Result<IndexMap<&str, (u64, u64)>, Error> {
        self.iter()
            .map(|(name, p)| match p.address {
                Address::Resolved(addr) => Ok((name, (addr, p.size))),
                _ => Err(Error::Unresolved {
                    partition: name.to_string(),
                }),
            })
            .collect()
    }
}
