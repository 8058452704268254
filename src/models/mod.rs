pub mod gestionnaire;
pub mod report;

pub use gestionnaire::*;
pub use report::*;
