use crate::error::Error;
use crate::expr::Expr;
use crate::map::{Address, PartitionMap};

/// Resolve every partition of the map in place
pub fn resolve_all(map: &mut PartitionMap) -> Result<(), Error> {
    Resolver::new(map).resolve_all()
}

/// Depth-first resolution over a partition map.
///
/// Partitions being evaluated are tagged `Resolving`, and `stack` keeps the
/// same names in visiting order to report the chain of a cycle.
pub struct Resolver<'a> {
    map: &'a mut PartitionMap,
    stack: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(map: &'a mut PartitionMap) -> Self {
        Self {
            map,
            stack: Vec::new(),
        }
    }

    pub fn resolve_all(&mut self) -> Result<(), Error> {
        let names: Vec<String> = self.map.names().map(|n| n.to_string()).collect();
        for name in &names {
            self.visit(name, None)?;
        }
        Ok(())
    }

    pub fn resolve(&mut self, name: &str) -> Result<u64, Error> {
        self.visit(name, None)
    }

    fn visit(&mut self, name: &str, referrer: Option<&str>) -> Result<u64, Error> {
        let text = match self.map.get(name).map(|p| &p.address) {
            None => {
                return Err(Error::UnknownPartition {
                    name: name.to_string(),
                    referrer: referrer.map(|r| r.to_string()),
                })
            }
            Some(Address::Resolved(v)) => return Ok(*v),
            Some(Address::Resolving(_)) => return Err(self.cycle(name)),
            Some(Address::Unresolved(text)) => text.clone(),
        };

        self.map.set_address(name, Address::Resolving(text.clone()));
        self.stack.push(name.to_string());
        let result = self.evaluate(name, text.clone());
        self.stack.pop();

        match result {
            Ok(value) => {
                self.map.set_address(name, Address::Resolved(value));
                Ok(value)
            }
            Err(err) => {
                self.map.set_address(name, Address::Unresolved(text));
                Err(err)
            }
        }
    }

    fn evaluate(&mut self, name: &str, mut text: String) -> Result<u64, Error> {
        loop {
            let expr = Expr::parse(&text).ok_or_else(|| Error::MalformedExpression {
                partition: name.to_string(),
                text: text.clone(),
            })?;

            match expr {
                Expr::Absolute(v) => return Ok(v),
                Expr::Before(target) => {
                    let target_address = self.visit(&target, Some(name))?;
                    let size = self.size(name)?;
                    return target_address
                        .checked_sub(size)
                        .ok_or_else(|| Error::NegativeAddress {
                            partition: name.to_string(),
                            text: text.clone(),
                            target,
                            target_address,
                            size,
                        });
                }
                Expr::After(target) => {
                    let target_address = self.visit(&target, Some(name))?;
                    let size = self.size(&target)?;
                    return target_address
                        .checked_add(size)
                        .ok_or_else(|| Error::AddressOverflow {
                            partition: name.to_string(),
                            target,
                        });
                }
                Expr::If {
                    cond,
                    then,
                    otherwise,
                } => {
                    // The chosen branch replaces the entry's text and is evaluated in its place
                    text = if self.map.contains(&cond) {
                        then
                    } else {
                        otherwise
                    };
                    self.map.set_address(name, Address::Resolving(text.clone()));
                }
            }
        }
    }

    fn size(&self, name: &str) -> Result<u64, Error> {
        self.map
            .get(name)
            .map(|p| p.size)
            .ok_or_else(|| Error::UnknownPartition {
                name: name.to_string(),
                referrer: None,
            })
    }

    fn cycle(&self, name: &str) -> Error {
        let start = self.stack.iter().position(|n| n == name).unwrap_or(0);
        let mut chain: Vec<String> = self.stack[start..].to_vec();
        chain.push(name.to_string());
        let text = match self.map.get(name).map(|p| &p.address) {
            Some(Address::Resolving(text)) => text.clone(),
            _ => String::new(),
        };
        Error::Cycle { chain, text }
    }
}
