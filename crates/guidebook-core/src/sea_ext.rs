use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder, Select,
    sea_query::{Func, SimpleExpr},
};

pub trait OrderByRandom {
    fn order_by_random(self) -> Self;
}

impl<E> OrderByRandom for Select<E>
where
    E: EntityTrait,
{
    fn order_by_random(mut self) -> Self {
        QueryOrder::query(&mut self)
            .order_by_expr(SimpleExpr::FunctionCall(Func::random()), Order::Desc);
        self
    }
}

/// Substring search across several text columns (`col LIKE '%needle%' OR ...`).
pub trait ContainsAny {
    fn filter_contains_any<C>(self, columns: &[C], needle: &str) -> Self
    where
        C: ColumnTrait;
}

impl<E> ContainsAny for Select<E>
where
    E: EntityTrait,
{
    fn filter_contains_any<C>(self, columns: &[C], needle: &str) -> Self
    where
        C: ColumnTrait,
    {
        let condition = columns
            .iter()
            .fold(Condition::any(), |cond, col| cond.add(col.contains(needle)));
        self.filter(condition)
    }
}
