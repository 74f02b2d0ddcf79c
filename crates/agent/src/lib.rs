pub mod llm;
pub mod prospect;

pub use llm::{HttpLlmClient, LlmClient, LlmError};
pub use prospect::{CompanySource, LlmCompanySource, MockCompanySource, ProspectError};
