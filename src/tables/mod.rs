//! Table assembly and structure summaries

mod assembler;
mod summary;

pub use assembler::{FlattenStats, TableAssembler};
pub use summary::{
    ColumnCollision, StructureSummary, column_collisions, question_types, questions_by_path,
    repeat_group_names,
};
