pub use crate::collections::{ArrayError, FlexArr, ReservePolicy};

pub use crate::flexarr;
