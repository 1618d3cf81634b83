use super::{Graph, Object, ObjectId, Related};
use crate::{bail, stmt, Result};

use serde_json::{Map, Value as Json};

impl Graph {
    /// Builds a graph from a JSON object.
    ///
    /// Scalar members become values, a nested object becomes a single-object
    /// relation and an array of objects becomes a many relation. Returns the
    /// graph and the id of the root object.
    pub fn from_json(json: &Json) -> Result<(Graph, ObjectId)> {
        let mut graph = Graph::new();
        let root = graph.add_json(json)?;
        Ok((graph, root))
    }

    /// Builds a graph from a JSON array of objects, returning one root per
    /// element.
    pub fn from_json_list(json: &Json) -> Result<(Graph, Vec<ObjectId>)> {
        let Json::Array(items) = json else {
            bail!("expected a JSON array of objects");
        };

        let mut graph = Graph::new();
        let roots = items
            .iter()
            .map(|item| graph.add_json(item))
            .collect::<Result<Vec<_>>>()?;
        Ok((graph, roots))
    }

    /// Adds the objects described by `json` to this graph.
    pub fn add_json(&mut self, json: &Json) -> Result<ObjectId> {
        let Json::Object(members) = json else {
            bail!("expected a JSON object, got `{json}`");
        };

        let id = self.insert(Object::new(stmt::record_from_json(members)));

        for (key, member) in members {
            match member {
                Json::Object(_) => {
                    let target = self.add_json(member)?;
                    self.set_one(id, key, Some(target));
                }
                Json::Array(items) => {
                    self.init_many(id, key);
                    for item in items {
                        let target = self.add_json(item)?;
                        self.push_many(id, key, target);
                    }
                }
                _ => {}
            }
        }

        Ok(id)
    }

    /// Renders the object and everything reachable from it.
    ///
    /// An object that is already being rendered further up the path is
    /// printed as `{"@ref": <index>}`, so cyclic graphs terminate.
    pub fn to_json(&self, id: ObjectId) -> Json {
        let mut path = vec![];
        self.render(id, &mut path)
    }

    pub fn to_json_list(&self, ids: &[ObjectId]) -> Json {
        Json::Array(ids.iter().map(|id| self.to_json(*id)).collect())
    }

    fn render(&self, id: ObjectId, path: &mut Vec<ObjectId>) -> Json {
        if path.contains(&id) {
            let mut reference = Map::new();
            reference.insert("@ref".to_string(), Json::from(id.index()));
            return Json::Object(reference);
        }

        path.push(id);

        let object = &self[id];
        let mut out = stmt::record_to_json(&object.values);

        for (name, related) in &object.relations {
            let rendered = match related {
                Related::One(None) => Json::Null,
                Related::One(Some(target)) => self.render(*target, path),
                Related::Many(targets) => Json::Array(
                    targets
                        .iter()
                        .map(|target| self.render(*target, path))
                        .collect(),
                ),
            };
            out.insert(name.clone(), rendered);
        }

        path.pop();
        Json::Object(out)
    }
}
