use std::fmt;

/// Opaque key naming one fetch target.
///
/// Duplicate keys within a batch are allowed; each occurrence is processed
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FetchId {
    Num(i64),
    Name(String),
}

impl fmt::Display for FetchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchId::Num(n) => write!(f, "{n}"),
            FetchId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FetchId {
    fn from(v: i64) -> Self {
        FetchId::Num(v)
    }
}

impl From<i32> for FetchId {
    fn from(v: i32) -> Self {
        FetchId::Num(v as i64)
    }
}

impl From<&str> for FetchId {
    fn from(v: &str) -> Self {
        FetchId::Name(v.to_string())
    }
}

impl From<String> for FetchId {
    fn from(v: String) -> Self {
        FetchId::Name(v)
    }
}
