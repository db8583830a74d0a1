use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    /// Looks up `key`, falling back to the same key with its first letter
    /// uppercased (`genre` also matches `Genre`).
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }

        let mut chars = key.chars();
        let first = chars.next()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        let key2 = format!("{}{}", first.to_ascii_uppercase(), chars.as_str());
        self.map.get(&key2).map(|x| x.as_str())
    }

    /// Parses a parameter. Absent or empty values are `Ok(None)`; values
    /// that do not parse are an error naming the key.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(None),
            Some(val) => val
                .parse::<T>()
                .map(Some)
                .map_err(|_| format!("invalid value for {}: {:?}", key, val)),
        }
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self { map }
    }
}
