use super::Serializer;

use rowgraph_core::driver::Dialect;

pub(super) type Flavor = Dialect;

impl Serializer {
    pub fn new(dialect: Dialect) -> Serializer {
        Serializer { flavor: dialect }
    }

    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }
}
