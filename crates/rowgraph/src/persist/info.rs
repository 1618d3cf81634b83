use rowgraph_core::stmt::{self, Record};

use indexmap::IndexMap;
use serde_json::Value as Json;

/// What [`store`](super::store) wrote for one object.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreInfo {
    /// Primary key values after the write.
    pub key: Record,

    /// True if the row was updated rather than inserted.
    pub update: bool,

    /// Objects stored through this object's relations.
    pub relations: IndexMap<String, StoredRelation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoredRelation {
    One(Box<StoreInfo>),
    Many(Vec<StoreInfo>),
}

impl StoreInfo {
    /// Renders as `{<key columns>..., "@update": bool, <relation>: ...}`.
    pub fn to_json(&self) -> Json {
        let mut out = stmt::record_to_json(&self.key);
        out.insert("@update".to_string(), Json::Bool(self.update));

        for (name, relation) in &self.relations {
            let rendered = match relation {
                StoredRelation::One(info) => info.to_json(),
                StoredRelation::Many(infos) => {
                    Json::Array(infos.iter().map(StoreInfo::to_json).collect())
                }
            };
            out.insert(name.clone(), rendered);
        }

        Json::Object(out)
    }
}
