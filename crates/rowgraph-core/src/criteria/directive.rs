/// Reserved `@` keys of a criteria object.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Directives {
    /// `@not`: negate the object's column comparisons.
    pub not: bool,

    /// `@load`: fetch the relationship through a join.
    pub load: bool,

    /// `@loadSeparately`: fetch the relationship with an additional query.
    pub load_separately: bool,

    /// `@orderBy`, resolved to column names.
    pub order_by: Vec<OrderBy>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,

    /// `@count`, `@min` and `@max`, in the order given.
    pub aggregates: Vec<(Aggregate, AggregateIntent)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column name
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateIntent {
    Enabled(bool),
    Filter(super::ColumnFilter),
}

/// A directive whose value could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformed {
    pub key: String,
    pub message: String,
}

impl Direction {
    pub fn parse(src: &str) -> Option<Direction> {
        if src.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if src.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

impl Aggregate {
    pub fn from_key(key: &str) -> Option<Aggregate> {
        match key {
            "@count" => Some(Aggregate::Count),
            "@min" => Some(Aggregate::Min),
            "@max" => Some(Aggregate::Max),
            _ => None,
        }
    }
}
