use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Prefix that marks identifiers owned by the meal provider.
pub const EXTERNAL_PREFIX: &str = "ext-";

/// A recipe identifier in one of the two disjoint namespaces.
///
/// Native recipes live in the local store and are keyed by UUID. External
/// recipes are projections of provider meals, keyed by the provider's raw id
/// and rendered with [`EXTERNAL_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeId {
    Native(Uuid),
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid recipe id: {0:?}")]
pub struct InvalidRecipeId(pub String);

#[cfg(test)]
impl RecipeId {
    pub fn external(raw: impl Into<String>) -> Self {
        RecipeId::External(raw.into())
    }
}

impl FromStr for RecipeId {
    type Err = InvalidRecipeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(raw) = s.strip_prefix(EXTERNAL_PREFIX) {
            if raw.is_empty() {
                return Err(InvalidRecipeId(s.to_string()));
            }
            return Ok(RecipeId::External(raw.to_string()));
        }
        Uuid::parse_str(s)
            .map(RecipeId::Native)
            .map_err(|_| InvalidRecipeId(s.to_string()))
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Native(id) => write!(f, "{id}"),
            RecipeId::External(raw) => write!(f, "{EXTERNAL_PREFIX}{raw}"),
        }
    }
}

impl Serialize for RecipeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Splits a comma separated id list. Blank segments are ignored and
/// unparseable ones are returned separately so callers can log them.
pub fn parse_id_list(raw: &str) -> (Vec<RecipeId>, Vec<String>) {
    let mut ids = Vec::new();
    let mut rejected = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse() {
            Ok(id) => ids.push(id),
            Err(InvalidRecipeId(bad)) => rejected.push(bad),
        }
    }
    (ids, rejected)
}

/// Native ids and external raw ids, each in input order.
pub fn partition(ids: &[RecipeId]) -> (Vec<Uuid>, Vec<String>) {
    let mut native = Vec::new();
    let mut external = Vec::new();
    for id in ids {
        match id {
            RecipeId::Native(uuid) => native.push(*uuid),
            RecipeId::External(raw) => external.push(raw.clone()),
        }
    }
    (native, external)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_namespaces() {
        let uuid = Uuid::new_v4();
        assert_eq!(
            uuid.to_string().parse::<RecipeId>().unwrap(),
            RecipeId::Native(uuid)
        );
        assert_eq!(
            "ext-52771".parse::<RecipeId>().unwrap(),
            RecipeId::External("52771".into())
        );
    }

    #[test]
    fn rejects_bare_prefix_and_garbage() {
        assert!("ext-".parse::<RecipeId>().is_err());
        assert!("52771".parse::<RecipeId>().is_err());
        assert!("".parse::<RecipeId>().is_err());
    }

    #[test]
    fn display_restores_prefix() {
        assert_eq!(RecipeId::external("52771").to_string(), "ext-52771");
        let json = serde_json::to_string(&RecipeId::external("1")).unwrap();
        assert_eq!(json, "\"ext-1\"");
    }

    #[test]
    fn id_list_keeps_order_and_reports_rejects() {
        let uuid = Uuid::new_v4();
        let (ids, rejected) = parse_id_list(&format!("ext-52771, {uuid},,nope"));
        assert_eq!(
            ids,
            vec![RecipeId::external("52771"), RecipeId::Native(uuid)]
        );
        assert_eq!(rejected, vec!["nope".to_string()]);

        let (native, external) = partition(&ids);
        assert_eq!(native, vec![uuid]);
        assert_eq!(external, vec!["52771".to_string()]);
    }
}
