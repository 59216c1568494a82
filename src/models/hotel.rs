//! Hotel identifier model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque hotel name as used by the market service (e.g. `"Hotel Sunrise"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HotelId(String);

impl HotelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HotelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HotelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HotelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for HotelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HotelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(HotelId(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_from_plain_string_array() {
        let hotels: Vec<HotelId> = serde_json::from_str(r#"["Beta", "Alpha"]"#).unwrap();
        assert_eq!(hotels, vec![HotelId::from("Beta"), HotelId::from("Alpha")]);
    }

    #[test]
    fn test_orders_lexicographically() {
        let mut hotels = vec![HotelId::from("Gamma"), HotelId::from("Alpha"), HotelId::from("Beta")];
        hotels.sort();
        let names: Vec<&str> = hotels.iter().map(|h| h.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }
}
