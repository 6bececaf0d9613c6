pub mod artifacts;
pub mod candidates;
pub mod directory;
pub mod recommendation;
pub mod sentiment;
pub mod serving;

#[cfg(test)]
pub(crate) mod testing;
