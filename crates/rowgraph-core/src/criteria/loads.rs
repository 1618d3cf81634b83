use super::{Criteria, CriteriaObject, GroupEntry};

use indexmap::IndexMap;

/// Which relationships a criteria tree loads, and how.
///
/// A relationship occurrence is either only filtered on, loaded through a
/// join (`@load`), or loaded with an additional query (`@loadSeparately`,
/// which wins when both are set). Loads nested inside a relationship that is
/// itself only filtered on are not collected: there is no parent object to
/// attach them to.
#[derive(Debug, Default, PartialEq)]
pub struct Loads<'a> {
    /// Join-loaded relationships, by name, with their own loads.
    pub joined: IndexMap<&'a str, Loads<'a>>,

    /// Separately-loaded relationships, by name, with their criteria.
    pub separate: IndexMap<&'a str, &'a CriteriaObject>,
}

impl Criteria {
    /// Derives the load tree rooted at this criteria.
    pub fn loads(&self) -> Loads<'_> {
        let mut loads = Loads::default();
        self.collect_loads(&mut loads);
        loads
    }

    fn collect_loads<'a>(&'a self, loads: &mut Loads<'a>) {
        match self {
            Criteria::Object(object) => object.collect_loads(loads),
            Criteria::Group(group) => {
                for entry in &group.entries {
                    if let GroupEntry::Criteria(criteria) = entry {
                        criteria.collect_loads(loads);
                    }
                }
            }
        }
    }
}

impl CriteriaObject {
    fn collect_loads<'a>(&'a self, loads: &mut Loads<'a>) {
        for (name, criteria) in &self.relationships {
            let Criteria::Object(object) = criteria else {
                continue;
            };

            if object.directives.load_separately {
                if !loads.joined.contains_key(name.as_str()) {
                    loads.separate.entry(name).or_insert(object);
                }
            } else if object.directives.load {
                loads.separate.shift_remove(name.as_str());
                let nested = loads.joined.entry(name).or_default();
                object.collect_loads(nested);
            }
        }
    }
}

impl Loads<'_> {
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.separate.is_empty()
    }
}
