use super::{
    Aggregate, AggregateIntent, ColumnFilter, Comparison, Connective, Criteria, CriteriaObject,
    Direction, FilterEntry, Group, GroupEntry, Malformed, Operand, Operator, OrderBy,
};
use crate::{
    schema::{Schema, Table},
    stmt::Value,
};

use serde_json::{Map, Value as Json};

impl Criteria {
    /// Resolves JSON criteria against `table`.
    pub fn parse(schema: &Schema, table: &Table, json: &Json) -> Criteria {
        match json {
            Json::Array(items) => Criteria::Group(parse_group(schema, table, items)),
            Json::Object(members) => Criteria::Object(parse_object(schema, table, members)),
            _ => {
                let mut object = CriteriaObject::default();
                object.malformed.push(Malformed {
                    key: String::new(),
                    message: format!("expected an object or an array, got `{json}`"),
                });
                Criteria::Object(object)
            }
        }
    }
}

fn parse_group(schema: &Schema, table: &Table, items: &[Json]) -> Group {
    let entries = items
        .iter()
        .map(|item| match item {
            Json::String(token) => match Connective::from_token(token) {
                Some(connective) => GroupEntry::Connective(connective),
                None => GroupEntry::Invalid(item.clone()),
            },
            Json::Array(_) | Json::Object(_) => {
                GroupEntry::Criteria(Criteria::parse(schema, table, item))
            }
            _ => GroupEntry::Invalid(item.clone()),
        })
        .collect();

    Group { entries }
}

fn parse_object(schema: &Schema, table: &Table, members: &Map<String, Json>) -> CriteriaObject {
    let mut object = CriteriaObject::default();

    for (key, value) in members {
        if key.starts_with('@') {
            parse_directive(table, &mut object, key, value);
        } else if let Some(column) = table.find_column(key) {
            object
                .columns
                .insert(column.name.clone(), parse_column_filter(value));
        } else if let Some(rel) = table.find_relationship(key) {
            let other = schema.other_table(rel);
            object
                .relationships
                .insert(rel.name.clone(), Criteria::parse(schema, other, value));
        } else {
            object.unknown.push(key.clone());
        }
    }

    object
}

fn parse_directive(table: &Table, object: &mut CriteriaObject, key: &str, value: &Json) {
    let directives = &mut object.directives;

    let flag = |value: &Json| value.as_bool();
    let count = |value: &Json| value.as_u64();

    let accepted = match key {
        "@not" => flag(value).map(|v| directives.not = v).is_some(),
        "@load" => flag(value).map(|v| directives.load = v).is_some(),
        "@loadSeparately" => flag(value).map(|v| directives.load_separately = v).is_some(),
        "@limit" => count(value).map(|v| directives.limit = Some(v)).is_some(),
        "@offset" => count(value).map(|v| directives.offset = Some(v)).is_some(),
        "@orderBy" => {
            parse_order_by(table, value, &mut directives.order_by, &mut object.malformed);
            true
        }
        _ => match Aggregate::from_key(key) {
            Some(aggregate) => {
                let intent = match value {
                    Json::Bool(enabled) => AggregateIntent::Enabled(*enabled),
                    _ => AggregateIntent::Filter(parse_column_filter(value)),
                };
                directives.aggregates.push((aggregate, intent));
                true
            }
            None => {
                object.unknown.push(key.to_string());
                return;
            }
        },
    };

    if !accepted {
        let expected = match key {
            "@limit" | "@offset" => "a non-negative integer",
            _ => "a boolean",
        };

        object.malformed.push(Malformed {
            key: key.to_string(),
            message: format!("expected {expected}, got `{value}`"),
        });
    }
}

fn parse_order_by(
    table: &Table,
    value: &Json,
    out: &mut Vec<OrderBy>,
    malformed: &mut Vec<Malformed>,
) {
    let mut invalid = |message: String| {
        malformed.push(Malformed {
            key: "@orderBy".to_string(),
            message,
        })
    };

    let entries = match value {
        Json::Array(items) => items.as_slice(),
        _ => core::slice::from_ref(value),
    };

    for entry in entries {
        let (field, direction) = match entry {
            Json::String(field) => (field.as_str(), Some(Direction::Asc)),
            Json::Object(members) => {
                let Some(field) = members.get("field").and_then(Json::as_str) else {
                    invalid(format!("order entry `{entry}` has no field"));
                    continue;
                };

                let direction = match members.get("direction") {
                    None => Some(Direction::Asc),
                    Some(direction) => direction.as_str().and_then(Direction::parse),
                };

                (field, direction)
            }
            _ => {
                invalid(format!("invalid order entry `{entry}`"));
                continue;
            }
        };

        let Some(column) = table.find_column(field) else {
            invalid(format!("cannot order by unknown column `{field}`"));
            continue;
        };

        let Some(direction) = direction else {
            invalid(format!("invalid order direction in `{entry}`"));
            continue;
        };

        out.push(OrderBy {
            field: column.name.clone(),
            direction,
        });
    }
}

pub(super) fn parse_column_filter(value: &Json) -> ColumnFilter {
    match value {
        Json::Array(items) if items.iter().all(is_scalar) => {
            ColumnFilter::List(items.iter().filter_map(Value::from_json).collect())
        }
        Json::Array(items) => ColumnFilter::Group(
            items
                .iter()
                .map(|item| match item {
                    Json::String(token) => match Connective::from_token(token) {
                        Some(connective) => FilterEntry::Connective(connective),
                        None => FilterEntry::Comparison(Comparison::eq(token.as_str())),
                    },
                    Json::Object(members) => FilterEntry::Comparison(parse_comparison(members)),
                    Json::Array(_) => FilterEntry::Invalid(item.clone()),
                    _ => match Value::from_json(item) {
                        Some(value) => FilterEntry::Comparison(Comparison::eq(value)),
                        None => FilterEntry::Invalid(item.clone()),
                    },
                })
                .collect(),
        ),
        Json::Object(members) => ColumnFilter::Comparison(parse_comparison(members)),
        _ => match Value::from_json(value) {
            Some(value) => ColumnFilter::Comparison(Comparison::eq(value)),
            None => ColumnFilter::Comparison(Comparison {
                operator: Operator::Eq,
                operand: Operand::Invalid(value.clone()),
                negate: false,
            }),
        },
    }
}

fn parse_comparison(members: &Map<String, Json>) -> Comparison {
    let operator = match members.get("operator") {
        None => Operator::Eq,
        Some(Json::String(op)) => Operator::parse(op),
        Some(other) => Operator::Unsupported(other.to_string()),
    };

    let operand = match members.get("value") {
        None => Operand::Invalid(Json::Null),
        Some(Json::Array(items)) if items.iter().all(is_scalar) => {
            Operand::List(items.iter().filter_map(Value::from_json).collect())
        }
        Some(value) => match Value::from_json(value) {
            Some(value) => Operand::Value(value),
            None => Operand::Invalid(value.clone()),
        },
    };

    let negate = members
        .get("negate")
        .and_then(Json::as_bool)
        .unwrap_or(false);

    Comparison {
        operator,
        operand,
        negate,
    }
}

fn is_scalar(value: &Json) -> bool {
    !matches!(value, Json::Array(_) | Json::Object(_))
}
