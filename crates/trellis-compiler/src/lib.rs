#![doc = include_str!("../README.md")]

pub mod collections;
pub mod executable;
pub mod execution;
pub mod schema;
pub mod validation;

pub use trellis_parser::ast;
pub use trellis_parser::Name;
pub use trellis_parser::Node;
pub use trellis_parser::ParseError;
pub use trellis_parser::Parser;

pub use self::executable::ExecutableDocument;
pub use self::schema::Schema;
pub use self::validation::validate_request;
