pub mod builder;
pub mod explore;
pub mod fragment;
pub mod template;

pub use builder::{DatabaseQuery, QueryMode};
pub use explore::{explore, Exploration, JOIN_LIMIT, PATH_SEPARATOR};
pub use fragment::{
    Condition, JoinMode, QueryCondition, QueryConditionRaw, QueryField, QueryJoin, QueryOrder,
    QuerySet, SortDirection,
};
pub use template::render;
