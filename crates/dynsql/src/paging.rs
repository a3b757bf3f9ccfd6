//! Paging clauses.
//!
//! Every placeholder is minted from the pass-wide sequence, so two paging
//! clauses in one statement (union arms, a paged subquery inside a paged outer
//! query) never share a parameter key, even when their values are equal.

use crate::render::{Fragment, Render, RenderContext};

/// How the paging clause is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PagingStyle {
    /// `limit ? offset ?`
    #[default]
    LimitOffset,
    /// `offset ? rows fetch first ? rows only`
    FetchFirst,
}

/// Row limit and offset of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PagingModel {
    limit: Option<u64>,
    offset: Option<u64>,
    style: PagingStyle,
}

impl PagingModel {
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit,
            offset,
            style: PagingStyle::LimitOffset,
        }
    }

    /// `fetch_first` rows after skipping `offset` rows.
    pub fn fetch_first(fetch_first: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: fetch_first,
            offset,
            style: PagingStyle::FetchFirst,
        }
    }

    /// No paging at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn style(&self) -> PagingStyle {
        self.style
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}

impl Render for PagingModel {
    fn render_fragment(&self, ctx: &mut RenderContext<'_>) -> Fragment {
        match self.style {
            // Limit is minted before offset: positional dialects bind in text order.
            PagingStyle::LimitOffset => match (self.limit, self.offset) {
                (None, None) => Fragment::empty(),
                (Some(limit), None) => ctx.bind(limit).prefixed("limit"),
                (None, Some(offset)) => ctx.bind(offset).prefixed("offset"),
                (Some(limit), Some(offset)) => {
                    let limit = ctx.bind(limit).prefixed("limit");
                    limit.merge(ctx.bind(offset).prefixed("offset"))
                }
            },
            PagingStyle::FetchFirst => {
                let offset = match self.offset {
                    Some(offset) => ctx
                        .bind(offset)
                        .prefixed("offset")
                        .merge(Fragment::with_fragment("rows")),
                    None => Fragment::empty(),
                };
                let fetch = match self.limit {
                    Some(rows) => ctx
                        .bind(rows)
                        .prefixed("fetch first")
                        .merge(Fragment::with_fragment("rows only")),
                    None => Fragment::empty(),
                };
                offset.merge(fetch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NamedRenderingStrategy, PositionalRenderingStrategy};
    use crate::value::ParamValue;

    fn render(paging: PagingModel) -> Fragment {
        let mut ctx = RenderContext::new(&NamedRenderingStrategy);
        paging.render_fragment(&mut ctx)
    }

    #[test]
    fn no_limit_no_offset() {
        let f = render(PagingModel::none());
        assert!(!f.is_renderable());
        assert!(f.parameters().is_empty());
    }

    #[test]
    fn limit_only() {
        let f = render(PagingModel::new(Some(10), None));
        assert_eq!(f.text(), "limit :p1");
        assert_eq!(f.parameters()["p1"], ParamValue::UInt(10));
    }

    #[test]
    fn offset_only() {
        let f = render(PagingModel::new(None, Some(5)));
        assert_eq!(f.text(), "offset :p1");
        assert_eq!(f.parameters()["p1"], ParamValue::UInt(5));
    }

    #[test]
    fn limit_and_offset_mint_in_order() {
        let f = render(PagingModel::new(Some(10), Some(20)));
        assert_eq!(f.text(), "limit :p1 offset :p2");
        let values: Vec<_> = f.parameters().values().cloned().collect();
        assert_eq!(values, vec![ParamValue::UInt(10), ParamValue::UInt(20)]);
    }

    #[test]
    fn two_clauses_in_one_pass_never_collide() {
        let paging = PagingModel::new(Some(10), Some(20));
        let mut ctx = RenderContext::new(&PositionalRenderingStrategy);
        let first = paging.render_fragment(&mut ctx);
        let second = paging.render_fragment(&mut ctx);
        let merged = first.merge(second);
        assert_eq!(merged.text(), "limit ? offset ? limit ? offset ?");
        let keys: Vec<_> = merged.parameters().keys().cloned().collect();
        assert_eq!(keys, vec!["p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn fetch_first_mints_offset_first() {
        let f = render(PagingModel::fetch_first(Some(10), Some(30)));
        assert_eq!(f.text(), "offset :p1 rows fetch first :p2 rows only");
        assert_eq!(f.parameters()["p1"], ParamValue::UInt(30));
        assert_eq!(f.parameters()["p2"], ParamValue::UInt(10));

        let f = render(PagingModel::fetch_first(Some(10), None));
        assert_eq!(f.text(), "fetch first :p1 rows only");
    }
}
