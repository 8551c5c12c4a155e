//! Execution planning and the per-request primitives a runtime needs to walk
//! a plan: `@include`/`@skip` evaluation, response shaping and the plan
//! cache.

pub mod cache;
mod directives;
mod plan;
mod response;

pub use self::cache::Clock;
pub use self::cache::PlanCache;
pub use self::cache::SystemClock;
pub use self::directives::should_include;
pub use self::plan::plan_execution;
pub use self::plan::plan_operation;
pub use self::plan::PlanError;
pub use self::plan::PlanNode;
pub use self::response::exclude_unselected_fields;
pub use self::response::JsonMap;
pub use self::response::JsonValue;
pub use self::response::Nullable;

pub use serde_json_bytes;
