pub mod pdf_loader;

pub use pdf_loader::list_boleto_files;
