//! Custom request extractors.

mod path_id;
mod validated_json;

pub use path_id::IdPath;
pub use validated_json::{not_blank, ValidatedJson};
