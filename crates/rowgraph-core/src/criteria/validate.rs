use super::{
    AggregateIntent, ColumnFilter, Comparison, Criteria, CriteriaObject, FilterEntry, GroupEntry,
};
use crate::schema::{Schema, Table};

/// A problem found in criteria input.
///
/// `location` is a dotted path from the root: `""` is the root itself,
/// `.manyToOneObject1.column1` a nested key and `[2]` an array element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub location: String,
    pub message: String,
}

/// Parses and validates JSON criteria in one step.
pub fn validate_criteria(schema: &Schema, table: &Table, json: &serde_json::Value) -> Vec<Issue> {
    Criteria::parse(schema, table, json).validate()
}

impl Criteria {
    /// Reports every problem in the criteria tree.
    ///
    /// Compilation silently skips whatever is reported here.
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = vec![];
        self.validate_at("", &mut issues);
        issues
    }

    fn validate_at(&self, location: &str, issues: &mut Vec<Issue>) {
        match self {
            Criteria::Object(object) => object.validate_at(location, issues),
            Criteria::Group(group) => {
                for (i, entry) in group.entries.iter().enumerate() {
                    let location = format!("{location}[{i}]");
                    match entry {
                        GroupEntry::Connective(_) => {}
                        GroupEntry::Criteria(criteria) => criteria.validate_at(&location, issues),
                        GroupEntry::Invalid(json) => issues.push(Issue {
                            location,
                            message: format!("expected criteria or a connective, got `{json}`"),
                        }),
                    }
                }
            }
        }
    }
}

impl CriteriaObject {
    fn validate_at(&self, location: &str, issues: &mut Vec<Issue>) {
        for key in &self.unknown {
            issues.push(Issue {
                location: format!("{location}.{key}"),
                message: format!("column, relationship or directive `{key}` does not exist"),
            });
        }

        for malformed in &self.malformed {
            let location = if malformed.key.is_empty() {
                location.to_string()
            } else {
                format!("{location}.{}", malformed.key)
            };
            issues.push(Issue {
                location,
                message: malformed.message.clone(),
            });
        }

        if self.directives.load && self.directives.load_separately {
            issues.push(Issue {
                location: location.to_string(),
                message: "`@load` and `@loadSeparately` are mutually exclusive".to_string(),
            });
        }

        for (column, filter) in &self.columns {
            validate_filter(filter, &format!("{location}.{column}"), issues);
        }

        for (aggregate, intent) in &self.directives.aggregates {
            if let AggregateIntent::Filter(filter) = intent {
                let key = match aggregate {
                    super::Aggregate::Count => "@count",
                    super::Aggregate::Min => "@min",
                    super::Aggregate::Max => "@max",
                };
                validate_filter(filter, &format!("{location}.{key}"), issues);
            }
        }

        for (name, criteria) in &self.relationships {
            criteria.validate_at(&format!("{location}.{name}"), issues);
        }
    }
}

fn validate_filter(filter: &ColumnFilter, location: &str, issues: &mut Vec<Issue>) {
    match filter {
        ColumnFilter::Comparison(comparison) => {
            validate_comparison(comparison, location.to_string(), issues)
        }
        ColumnFilter::List(_) => {}
        ColumnFilter::Group(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                let location = format!("{location}[{i}]");
                match entry {
                    FilterEntry::Connective(_) => {}
                    FilterEntry::Comparison(comparison) => {
                        validate_comparison(comparison, location, issues)
                    }
                    FilterEntry::Invalid(json) => issues.push(Issue {
                        location,
                        message: format!("expected a comparison or a connective, got `{json}`"),
                    }),
                }
            }
        }
    }
}

fn validate_comparison(comparison: &Comparison, location: String, issues: &mut Vec<Issue>) {
    if let Some(message) = comparison.problem() {
        issues.push(Issue { location, message });
    }
}
