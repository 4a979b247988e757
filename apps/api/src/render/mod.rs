// PDF output: LaTeX compilation and object storage.

pub mod compiler;
pub mod handlers;
pub mod storage;
