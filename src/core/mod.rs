pub mod errors;
pub mod execution;
pub mod inventory;
pub mod observer;
pub mod report;
pub mod site;
pub mod sync;
pub mod types;

#[cfg(test)]
mod tests;
