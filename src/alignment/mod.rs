pub mod disambiguation;
pub mod external;
pub mod ledger;
pub mod positional;
pub mod report;
pub mod tokenization;
pub mod window;
