pub mod caller;
pub mod range;
pub mod transaction;

pub use caller::CallerId;
pub use range::DateRange;
pub use transaction::{LineItem, Transaction, UNCATEGORIZED};
