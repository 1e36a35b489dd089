pub mod excel;
pub mod form_driver;

pub use excel::SheetTable;
pub use form_driver::FormDriver;
