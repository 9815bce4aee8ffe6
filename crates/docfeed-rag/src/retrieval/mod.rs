//! Query answering: embed, search, stream a grounded answer

pub mod answer;

pub use answer::QueryAnswerer;
