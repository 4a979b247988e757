// Where resume records come from: request bodies, the record store, and
// uploaded documents.

pub mod document;
pub mod handlers;
pub mod store;
