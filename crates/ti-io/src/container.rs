//! The `TILF` binary container: a hand-rolled hierarchical format for
//! leadfield and atlas artifacts — a small bespoke reader per format
//! rather than a universal heavyweight container dependency.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic:   [u8; 4]       b"TILF"
//! version: u32
//! n_sections: u32
//! sections: repeated {
//!     name_len: u32
//!     name:     [u8; name_len]   (utf-8)
//!     dtype:    u8               (see DType)
//!     ndim:     u8
//!     shape:    [u64; ndim]
//!     byte_len: u64
//!     data:     [u8; byte_len]
//! }
//! ```

use std::collections::HashMap;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use ti_core::{TiError, TiResult};

pub const MAGIC: &[u8; 4] = b"TILF";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    F32,
    F64,
    I32,
    U32,
    /// A flat run of null-terminated UTF-8 strings (used for electrode
    /// labels); `shape` is `[count]`.
    Strings,
}

impl DType {
    fn tag(self) -> u8 {
        match self {
            DType::F32 => 0,
            DType::F64 => 1,
            DType::I32 => 2,
            DType::U32 => 3,
            DType::Strings => 4,
        }
    }

    fn from_tag(tag: u8) -> TiResult<Self> {
        match tag {
            0 => Ok(DType::F32),
            1 => Ok(DType::F64),
            2 => Ok(DType::I32),
            3 => Ok(DType::U32),
            4 => Ok(DType::Strings),
            other => Err(TiError::InvalidFormat(format!("unknown dtype tag {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub dtype: DType,
    pub shape: Vec<u64>,
    pub data: Vec<u8>,
}

impl Section {
    pub fn as_f32(&self) -> TiResult<Vec<f32>> {
        if self.dtype != DType::F32 {
            return Err(TiError::InvalidFormat(format!(
                "section '{}' is not f32",
                self.name
            )));
        }
        self.data
            .chunks_exact(4)
            .map(|c| Ok(f32::from_le_bytes(c.try_into().unwrap())))
            .collect()
    }

    pub fn as_f64(&self) -> TiResult<Vec<f64>> {
        if self.dtype != DType::F64 {
            return Err(TiError::InvalidFormat(format!(
                "section '{}' is not f64",
                self.name
            )));
        }
        self.data
            .chunks_exact(8)
            .map(|c| Ok(f64::from_le_bytes(c.try_into().unwrap())))
            .collect()
    }

    pub fn as_i32(&self) -> TiResult<Vec<i32>> {
        if self.dtype != DType::I32 {
            return Err(TiError::InvalidFormat(format!(
                "section '{}' is not i32",
                self.name
            )));
        }
        self.data
            .chunks_exact(4)
            .map(|c| Ok(i32::from_le_bytes(c.try_into().unwrap())))
            .collect()
    }

    pub fn as_strings(&self) -> TiResult<Vec<String>> {
        if self.dtype != DType::Strings {
            return Err(TiError::InvalidFormat(format!(
                "section '{}' is not a string table",
                self.name
            )));
        }
        let expected = *self.shape.first().unwrap_or(&0) as usize;
        let strings: Vec<String> = self
            .data
            .split(|&b| b == 0)
            .filter(|chunk| !chunk.is_empty() || expected == 0)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect();
        if strings.len() != expected {
            return Err(TiError::InvalidFormat(format!(
                "section '{}' declared {expected} strings but found {}",
                self.name,
                strings.len()
            )));
        }
        Ok(strings)
    }
}

/// A parsed container: named sections keyed by dataset path (e.g.
/// `/leadfield`, `/electrodes/labels`).
#[derive(Debug, Clone, Default)]
pub struct Container {
    sections: HashMap<String, Section>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, section: Section) {
        self.sections.insert(section.name.clone(), section);
    }

    pub fn get(&self, name: &str) -> TiResult<&Section> {
        self.sections
            .get(name)
            .ok_or_else(|| TiError::MissingField(format!("container missing section '{name}'")))
    }

    pub fn read<R: Read>(mut reader: R) -> TiResult<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(TiError::InvalidFormat(
                "container magic bytes do not match 'TILF'".into(),
            ));
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(TiError::InvalidFormat(format!(
                "unsupported container version {version}"
            )));
        }
        let n_sections = reader.read_u32::<LittleEndian>()?;
        let mut container = Container::new();
        for _ in 0..n_sections {
            let name_len = reader.read_u32::<LittleEndian>()? as usize;
            let mut name_bytes = vec![0u8; name_len];
            reader.read_exact(&mut name_bytes)?;
            let name = String::from_utf8(name_bytes)
                .map_err(|e| TiError::InvalidFormat(format!("non-utf8 section name: {e}")))?;
            let dtype = DType::from_tag(reader.read_u8()?)?;
            let ndim = reader.read_u8()? as usize;
            let mut shape = Vec::with_capacity(ndim);
            for _ in 0..ndim {
                shape.push(reader.read_u64::<LittleEndian>()?);
            }
            let byte_len = reader.read_u64::<LittleEndian>()? as usize;
            let mut data = vec![0u8; byte_len];
            reader.read_exact(&mut data)?;
            container.insert(Section {
                name,
                dtype,
                shape,
                data,
            });
        }
        Ok(container)
    }

    pub fn write<W: Write>(&self, mut writer: W) -> TiResult<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        writer.write_u32::<LittleEndian>(self.sections.len() as u32)?;
        let mut names: Vec<&String> = self.sections.keys().collect();
        names.sort();
        for name in names {
            let section = &self.sections[name];
            let name_bytes = section.name.as_bytes();
            writer.write_u32::<LittleEndian>(name_bytes.len() as u32)?;
            writer.write_all(name_bytes)?;
            writer.write_u8(section.dtype.tag())?;
            writer.write_u8(section.shape.len() as u8)?;
            for &dim in &section.shape {
                writer.write_u64::<LittleEndian>(dim)?;
            }
            writer.write_u64::<LittleEndian>(section.data.len() as u64)?;
            writer.write_all(&section.data)?;
        }
        Ok(())
    }
}

pub fn f32_section(name: &str, shape: Vec<u64>, values: &[f32]) -> Section {
    let mut data = Vec::with_capacity(values.len() * 4);
    for v in values {
        data.extend_from_slice(&v.to_le_bytes());
    }
    Section {
        name: name.to_string(),
        dtype: DType::F32,
        shape,
        data,
    }
}

pub fn f64_section(name: &str, shape: Vec<u64>, values: &[f64]) -> Section {
    let mut data = Vec::with_capacity(values.len() * 8);
    for v in values {
        data.extend_from_slice(&v.to_le_bytes());
    }
    Section {
        name: name.to_string(),
        dtype: DType::F64,
        shape,
        data,
    }
}

pub fn i32_section(name: &str, shape: Vec<u64>, values: &[i32]) -> Section {
    let mut data = Vec::with_capacity(values.len() * 4);
    for v in values {
        data.extend_from_slice(&v.to_le_bytes());
    }
    Section {
        name: name.to_string(),
        dtype: DType::I32,
        shape,
        data,
    }
}

pub fn strings_section(name: &str, values: &[String]) -> Section {
    let mut data = Vec::new();
    for v in values {
        data.extend_from_slice(v.as_bytes());
        data.push(0);
    }
    Section {
        name: name.to_string(),
        dtype: DType::Strings,
        shape: vec![values.len() as u64],
        data,
    }
}
