use std::collections::hash_map::Entry;
use std::io::{Read, Write};

use ahash::{HashMap, HashMapExt};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use smartstring::alias::String;
use tracing::debug;

use crate::error::StoreError;
use crate::poly::polynomial::Polynomial;

const MAGIC: &[u8; 4] = b"PXYZ";
const FORMAT_VERSION: u8 = 1;

/// What to do when a polynomial is stored under a name that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Replace the stored polynomial.
    #[default]
    Replace,
    /// Keep the stored polynomial and discard the new one.
    Keep,
    /// Fail with [`StoreError::AlreadyExists`].
    Reject,
}

/// The outcome of [`PolynomialStore::insert`].
#[derive(Debug, PartialEq)]
pub enum Insertion {
    New,
    Replaced(Polynomial),
    Kept,
}

/// A map from names to polynomials. The store owns its polynomials;
/// lookups hand out references or clones.
#[derive(Debug, Default)]
pub struct PolynomialStore {
    polynomials: HashMap<String, Polynomial>,
    policy: OverwritePolicy,
}

impl PolynomialStore {
    pub fn new() -> PolynomialStore {
        PolynomialStore::with_policy(OverwritePolicy::default())
    }

    pub fn with_policy(policy: OverwritePolicy) -> PolynomialStore {
        PolynomialStore {
            polynomials: HashMap::new(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> OverwritePolicy {
        self.policy
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polynomials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polynomials.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.polynomials.contains_key(name)
    }

    /// Store `poly` under `name`, using the store's overwrite policy.
    pub fn insert(&mut self, name: &str, poly: Polynomial) -> Result<Insertion, StoreError> {
        self.insert_with(name, poly, self.policy)
    }

    /// Store `poly` under `name`, using `policy` if the name is taken.
    pub fn insert_with(
        &mut self,
        name: &str,
        poly: Polynomial,
        policy: OverwritePolicy,
    ) -> Result<Insertion, StoreError> {
        match self.polynomials.entry(name.into()) {
            Entry::Vacant(v) => {
                v.insert(poly);
                Ok(Insertion::New)
            }
            Entry::Occupied(mut o) => match policy {
                OverwritePolicy::Replace => {
                    debug!("Replacing polynomial '{}'", name);
                    Ok(Insertion::Replaced(o.insert(poly)))
                }
                OverwritePolicy::Keep => Ok(Insertion::Kept),
                OverwritePolicy::Reject => Err(StoreError::AlreadyExists(name.into())),
            },
        }
    }

    pub fn get(&self, name: &str) -> Result<&Polynomial, StoreError> {
        self.polynomials
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.into()))
    }

    pub fn remove(&mut self, name: &str) -> Result<Polynomial, StoreError> {
        self.polynomials
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.into()))
    }

    /// Iterate over all entries, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Polynomial)> {
        let mut entries: Vec<_> = self
            .polynomials
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Write all entries to a binary stream. The format is a header followed
    /// by, for every entry, the length-prefixed name and the length-prefixed
    /// polynomial.
    pub fn export<W: Write>(&self, mut dest: W) -> Result<(), StoreError> {
        dest.write_all(MAGIC)?;
        dest.write_u8(FORMAT_VERSION)?;
        dest.write_u64::<LittleEndian>(self.polynomials.len() as u64)?;

        let mut payload = vec![];
        for (name, poly) in self.iter() {
            dest.write_u32::<LittleEndian>(name.len() as u32)?;
            dest.write_all(name.as_bytes())?;

            payload.clear();
            poly.write_bytes(&mut payload);
            dest.write_u32::<LittleEndian>(payload.len() as u32)?;
            dest.write_all(&payload)?;
        }

        dest.flush()?;
        Ok(())
    }

    /// Read entries written by [`PolynomialStore::export`] into this store,
    /// resolving name conflicts with the store's overwrite policy.
    /// Returns the number of entries read.
    ///
    /// The whole stream is decoded before anything is inserted, so on error
    /// the store is left unchanged.
    pub fn import<R: Read>(&mut self, mut source: R) -> Result<usize, StoreError> {
        let mut magic = [0; 4];
        source.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(StoreError::Corrupt("not a polynomial store".into()));
        }

        let version = source.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported format version {}",
                version
            )));
        }

        let n = source.read_u64::<LittleEndian>()?;
        let mut entries: Vec<(String, Polynomial)> = vec![];
        let mut buf = vec![];
        for _ in 0..n {
            read_block(&mut source, &mut buf)?;
            let name = std::str::from_utf8(&buf)
                .map_err(|e| StoreError::Corrupt(format!("invalid name: {}", e)))?
                .into();

            read_block(&mut source, &mut buf)?;
            let mut data = &buf[..];
            let poly = Polynomial::read_bytes(&mut data)?;

            entries.push((name, poly));
        }

        if self.policy == OverwritePolicy::Reject {
            for (i, (name, _)) in entries.iter().enumerate() {
                if self.contains(name) || entries[..i].iter().any(|(n, _)| n == name) {
                    return Err(StoreError::AlreadyExists(name.as_str().into()));
                }
            }
        }

        for (name, poly) in entries {
            self.insert(&name, poly)?;
        }

        debug!("Imported {} polynomials", n);
        Ok(n as usize)
    }
}

/// Read a `u32` length prefix and that many bytes into `buf`. The buffer
/// only grows as far as the source actually delivers data.
fn read_block<R: Read>(source: &mut R, buf: &mut Vec<u8>) -> Result<(), StoreError> {
    let len = source.read_u32::<LittleEndian>()? as u64;
    buf.clear();
    let read = source.take(len).read_to_end(buf)? as u64;
    if read != len {
        return Err(StoreError::Corrupt(format!(
            "expected {} bytes, found {}",
            len,
            read
        )));
    }
    Ok(())
}
