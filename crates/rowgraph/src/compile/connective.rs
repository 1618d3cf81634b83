use rowgraph_core::criteria::Connective;
use rowgraph_sql::stmt::Expr;

/// Accumulates the terms of a group.
///
/// A connective applies to every following term until another one appears.
/// Terms bind with SQL precedence: `AND` tighter than `XOR`, `XOR` tighter
/// than `OR`.
#[derive(Debug, Default)]
pub(super) struct Terms {
    current: Connective,
    or: Vec<Expr>,
    xor: Vec<Expr>,
    and: Vec<Expr>,
}

impl Terms {
    pub(super) fn connective(&mut self, connective: Connective) {
        self.current = connective;
    }

    pub(super) fn push(&mut self, expr: Expr) {
        if !self.and.is_empty() {
            match self.current {
                Connective::And => {}
                Connective::Xor => self.close_and(),
                Connective::Or => {
                    self.close_and();
                    self.close_xor();
                }
            }
        }

        self.and.push(expr);
    }

    pub(super) fn finish(mut self) -> Option<Expr> {
        self.close_and();
        self.close_xor();
        Expr::or_from_vec(self.or)
    }

    fn close_and(&mut self) {
        if let Some(expr) = Expr::and_from_vec(std::mem::take(&mut self.and)) {
            self.xor.push(expr);
        }
    }

    fn close_xor(&mut self) {
        if let Some(expr) = Expr::xor_from_vec(std::mem::take(&mut self.xor)) {
            self.or.push(expr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str) -> Expr {
        Expr::is_null(Expr::bare_column(name), false)
    }

    #[test]
    fn defaults_to_or() {
        let mut terms = Terms::default();
        terms.push(term("a"));
        terms.push(term("b"));

        assert_eq!(terms.finish(), Some(Expr::Or(vec![term("a"), term("b")])));
    }

    #[test]
    fn connective_persists_and_binds_by_precedence() {
        // a OR b AND c AND d
        let mut terms = Terms::default();
        terms.push(term("a"));
        terms.push(term("b"));
        terms.connective(Connective::And);
        terms.push(term("c"));
        terms.push(term("d"));

        assert_eq!(
            terms.finish(),
            Some(Expr::Or(vec![
                term("a"),
                Expr::And(vec![term("b"), term("c"), term("d")]),
            ]))
        );
    }

    #[test]
    fn xor_sits_between_and_and_or() {
        // a AND b XOR c OR d
        let mut terms = Terms::default();
        terms.connective(Connective::And);
        terms.push(term("a"));
        terms.push(term("b"));
        terms.connective(Connective::Xor);
        terms.push(term("c"));
        terms.connective(Connective::Or);
        terms.push(term("d"));

        assert_eq!(
            terms.finish(),
            Some(Expr::Or(vec![
                Expr::Xor(vec![Expr::And(vec![term("a"), term("b")]), term("c")]),
                term("d"),
            ]))
        );
    }

    #[test]
    fn empty_group_has_no_predicate() {
        let mut terms = Terms::default();
        terms.connective(Connective::And);
        assert_eq!(terms.finish(), None);
    }
}
