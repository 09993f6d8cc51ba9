//! Types that represent the core data model, such as `Expense` and `Amount`.
mod amount;
mod category;
pub(crate) mod date;
mod expense;
mod member;
mod payment;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryError};
pub use expense::{Expense, Expenses};
pub use member::Member;
pub use payment::PaymentMode;
