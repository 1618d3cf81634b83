mod json;

use crate::stmt::{Record, Value};

use indexmap::IndexMap;
use std::ops::{Index, IndexMut};

/// An arena of objects linked by relationship name.
///
/// Objects are addressed by [`ObjectId`], which is the identity key used by
/// every traversal ledger: two objects holding equal values are still distinct
/// nodes. Relations may form cycles, including an object referring to itself.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    objects: Vec<Object>,
}

/// Identifies an object within its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

/// A row or an instance, plus its relations to other objects in the graph.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Object {
    /// Scalar values, keyed by column name (rows) or property name (instances)
    pub values: Record,

    /// Related objects, keyed by relationship name
    pub relations: IndexMap<String, Related>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    /// A many-to-one (or one-to-one) target, `None` when explicitly absent
    One(Option<ObjectId>),

    /// One-to-many targets, in order
    Many(Vec<ObjectId>),
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    /// Adds an object with the given values and no relations.
    pub fn add(&mut self, values: Record) -> ObjectId {
        self.insert(Object {
            values,
            relations: IndexMap::new(),
        })
    }

    pub fn insert(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Sets a single-object relation, replacing any previous one.
    pub fn set_one(&mut self, id: ObjectId, name: &str, target: Option<ObjectId>) {
        self[id]
            .relations
            .insert(name.to_string(), Related::One(target));
    }

    /// Ensures a many relation exists, even if it stays empty.
    pub fn init_many(&mut self, id: ObjectId, name: &str) {
        let relations = &mut self[id].relations;
        if !matches!(relations.get(name), Some(Related::Many(_))) {
            relations.insert(name.to_string(), Related::Many(vec![]));
        }
    }

    /// Moves every object of `other` into this graph.
    ///
    /// Returns the new ids, indexed by each object's position in `other`.
    pub fn append(&mut self, other: Graph) -> Vec<ObjectId> {
        let offset = self.objects.len();
        let shift = |id: &mut ObjectId| id.0 += offset;

        for mut object in other.objects {
            for related in object.relations.values_mut() {
                match related {
                    Related::One(target) => target.iter_mut().for_each(shift),
                    Related::Many(targets) => targets.iter_mut().for_each(shift),
                }
            }
            self.objects.push(object);
        }

        (offset..self.objects.len()).map(ObjectId).collect()
    }

    /// Appends to a many relation, creating it if needed.
    pub fn push_many(&mut self, id: ObjectId, name: &str, target: ObjectId) {
        self.init_many(id, name);
        if let Some(Related::Many(targets)) = self[id].relations.get_mut(name) {
            targets.push(target);
        }
    }
}

impl Index<ObjectId> for Graph {
    type Output = Object;

    fn index(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }
}

impl IndexMut<ObjectId> for Graph {
    fn index_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0]
    }
}

impl ObjectId {
    /// Position of the object in its graph.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Object {
    pub fn new(values: Record) -> Object {
        Object {
            values,
            relations: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value, treating an absent key as null.
    pub fn value(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// The target of a single-object relation, if one is attached.
    pub fn one(&self, name: &str) -> Option<ObjectId> {
        match self.relations.get(name) {
            Some(Related::One(target)) => *target,
            _ => None,
        }
    }

    /// The targets of a many relation; empty when none is attached.
    pub fn many(&self, name: &str) -> &[ObjectId] {
        match self.relations.get(name) {
            Some(Related::Many(targets)) => targets,
            _ => &[],
        }
    }
}
