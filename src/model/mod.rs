pub mod inventory;
pub mod ledger;
