pub mod boleto;
pub mod challenge;
pub mod correction;
pub mod loaders;

pub use boleto::{BoletoRecord, BOLETO_HEADERS};
pub use challenge::ChallengeRow;
pub use correction::CorrectionRow;
pub use loaders::list_boleto_files;
